use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::MyError, models::FriendRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendRequestAction {
    Accept,
    Reject,
}

impl FriendRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendRequestStatus::Pending => "pending",
            FriendRequestStatus::Accepted => "accepted",
            FriendRequestStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, FriendRequestStatus::Pending)
    }

    /// `pending -> accepted | rejected`. Terminal states never move.
    pub fn transition(self, action: FriendRequestAction) -> Result<Self, MyError> {
        if self.is_terminal() {
            return Err(MyError::validation(format!("friend request is already {}", self.as_str())));
        }
        match action {
            FriendRequestAction::Accept => Ok(FriendRequestStatus::Accepted),
            FriendRequestAction::Reject => Ok(FriendRequestStatus::Rejected),
        }
    }
}

impl TryFrom<String> for FriendRequestStatus {
    type Error = MyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(FriendRequestStatus::Pending),
            "accepted" => Ok(FriendRequestStatus::Accepted),
            "rejected" => Ok(FriendRequestStatus::Rejected),
            other => Err(MyError::validation(format!("unknown friend request status '{other}'"))),
        }
    }
}

fn between(request: &FriendRequest, a: Uuid, b: Uuid) -> bool {
    (request.from_user_id == a && request.to_user_id == b)
        || (request.from_user_id == b && request.to_user_id == a)
}

/// Friendship is symmetric: it does not matter who sent the accepted request.
pub fn are_friends(a: Uuid, b: Uuid, requests: &[FriendRequest]) -> bool {
    requests
        .iter()
        .any(|r| r.status == FriendRequestStatus::Accepted && between(r, a, b))
}

pub fn friend_ids(user_id: Uuid, requests: &[FriendRequest]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = requests
        .iter()
        .filter(|r| r.status == FriendRequestStatus::Accepted)
        .filter_map(|r| {
            if r.from_user_id == user_id {
                Some(r.to_user_id)
            } else if r.to_user_id == user_id {
                Some(r.from_user_id)
            } else {
                None
            }
        })
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

/// `existing` holds every request between the two users, in either direction.
/// Rejected requests do not block a new one.
pub fn check_new_request(from: Uuid, to: Uuid, existing: &[FriendRequest]) -> Result<(), MyError> {
    if from == to {
        return Err(MyError::validation("cannot send friend request to yourself"));
    }
    let relevant = existing.iter().filter(|r| between(r, from, to));
    for request in relevant {
        match request.status {
            FriendRequestStatus::Accepted => return Err(MyError::validation("already friends")),
            FriendRequestStatus::Pending => {
                return Err(MyError::validation("friend request already exists"))
            }
            FriendRequestStatus::Rejected => {}
        }
    }
    Ok(())
}

/// Applies `action` on behalf of `user_id`, who must be the addressee.
pub fn respond(
    user_id: Uuid,
    request: &FriendRequest,
    action: FriendRequestAction,
) -> Result<FriendRequestStatus, MyError> {
    if request.to_user_id != user_id {
        return Err(MyError::denied("only the addressee can answer a friend request"));
    }
    request.status.transition(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(from: Uuid, to: Uuid, status: FriendRequestStatus) -> FriendRequest {
        FriendRequest {
            id: Uuid::new_v4(),
            from_user_id: from,
            to_user_id: to,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pending_moves_to_either_terminal_state() {
        let pending = FriendRequestStatus::Pending;
        assert_eq!(pending.transition(FriendRequestAction::Accept), Ok(FriendRequestStatus::Accepted));
        assert_eq!(pending.transition(FriendRequestAction::Reject), Ok(FriendRequestStatus::Rejected));
    }

    #[test]
    fn terminal_states_are_final() {
        for status in [FriendRequestStatus::Accepted, FriendRequestStatus::Rejected] {
            assert!(status.is_terminal());
            for action in [FriendRequestAction::Accept, FriendRequestAction::Reject] {
                assert!(matches!(status.transition(action), Err(MyError::ValidationError(_))));
            }
        }
    }

    #[test]
    fn friendship_is_symmetric_and_needs_acceptance() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let accepted = vec![request(a, b, FriendRequestStatus::Accepted)];
        assert!(are_friends(a, b, &accepted));
        assert!(are_friends(b, a, &accepted));

        let pending = vec![request(a, b, FriendRequestStatus::Pending)];
        assert!(!are_friends(a, b, &pending));
        let rejected = vec![request(a, b, FriendRequestStatus::Rejected)];
        assert!(!are_friends(a, b, &rejected));
    }

    #[test]
    fn friend_ids_lists_the_other_side() {
        let me = Uuid::new_v4();
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let z = Uuid::new_v4();
        let requests = vec![
            request(me, x, FriendRequestStatus::Accepted),
            request(y, me, FriendRequestStatus::Accepted),
            request(me, z, FriendRequestStatus::Pending),
        ];
        let mut expected = vec![x, y];
        expected.sort();
        assert_eq!(friend_ids(me, &requests), expected);
    }

    #[test]
    fn new_request_rules() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(check_new_request(a, a, &[]).is_err());
        assert!(check_new_request(a, b, &[]).is_ok());
        assert_eq!(
            check_new_request(a, b, &[request(b, a, FriendRequestStatus::Pending)]),
            Err(MyError::validation("friend request already exists"))
        );
        assert_eq!(
            check_new_request(a, b, &[request(a, b, FriendRequestStatus::Accepted)]),
            Err(MyError::validation("already friends"))
        );
        assert!(check_new_request(a, b, &[request(a, b, FriendRequestStatus::Rejected)]).is_ok());
    }

    #[test]
    fn only_addressee_responds() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let pending = request(a, b, FriendRequestStatus::Pending);
        assert!(matches!(
            respond(a, &pending, FriendRequestAction::Accept),
            Err(MyError::PermissionDenied(_))
        ));
        assert_eq!(respond(b, &pending, FriendRequestAction::Accept), Ok(FriendRequestStatus::Accepted));
    }

    #[test]
    fn rejected_request_does_not_allow_sharing() {
        use crate::domain::sharing::authorize_share;

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut req = request(a, b, FriendRequestStatus::Pending);
        req.status = respond(b, &req, FriendRequestAction::Reject).unwrap();

        let friends = are_friends(a, b, &[req]);
        assert_eq!(
            authorize_share(a, a, b, "read", friends),
            Err(MyError::denied("not a friend"))
        );
    }
}
