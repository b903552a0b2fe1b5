use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

use crate::{errors::MyError, models::{EventRecipient, Gift}};

/// Decimal places shown to users. Aggregation itself is exact.
pub const DISPLAY_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientBudget {
    pub recipient_id: Uuid,
    pub budget_limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub over_budget: bool,
    pub gift_count: usize,
    pub purchased_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventBudget {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub over_budget: bool,
    pub recipients: Vec<RecipientBudget>,
}

/// Sum of every gift amount, purchased or not.
pub fn spent(gifts: &[Gift]) -> Decimal {
    gifts.iter().map(|gift| gift.amount).sum()
}

/// Negative when the recipient is over budget.
pub fn remaining(budget_limit: Decimal, gifts: &[Gift]) -> Decimal {
    budget_limit - spent(gifts)
}

pub fn summarize_recipient(recipient: &EventRecipient, gifts: &[Gift]) -> RecipientBudget {
    let remaining = remaining(recipient.budget_limit, gifts);
    let spent = recipient.budget_limit - remaining;
    RecipientBudget {
        recipient_id: recipient.id,
        budget_limit: recipient.budget_limit,
        spent,
        remaining,
        over_budget: remaining < Decimal::ZERO,
        gift_count: gifts.len(),
        purchased_count: gifts.iter().filter(|gift| gift.purchased).count(),
    }
}

pub fn summarize_event(recipients: Vec<RecipientBudget>) -> EventBudget {
    let total_budget: Decimal = recipients.iter().map(|r| r.budget_limit).sum();
    let total_spent: Decimal = recipients.iter().map(|r| r.spent).sum();
    let total_remaining = total_budget - total_spent;
    EventBudget {
        total_budget,
        total_spent,
        total_remaining,
        over_budget: total_remaining < Decimal::ZERO,
        recipients,
    }
}

pub fn display_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Amounts are stored as `NUMERIC(12, 2)`: at most 10 integer digits and cents.
pub const STORED_SCALE: u32 = 2;
const MAX_INTEGER_DIGITS: u32 = 10;

/// Budget limits and gift amounts are currency values: not negative, no finer
/// than a cent and small enough for the money columns.
pub fn validate_amount(field: &str, amount: Decimal) -> Result<Decimal, MyError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MyError::validation(format!("{field} must not be negative")));
    }
    if amount.normalize().scale() > STORED_SCALE {
        return Err(MyError::validation(format!(
            "{field} must not have more than {STORED_SCALE} decimal places"
        )));
    }
    if amount >= Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS)) {
        return Err(MyError::validation(format!(
            "{field} must be less than 10^{MAX_INTEGER_DIGITS}"
        )));
    }
    Ok(amount)
}

/// A missing required amount is a contract violation, never an implicit zero.
pub fn require_amount(field: &str, amount: Option<Decimal>) -> Result<Decimal, MyError> {
    match amount {
        Some(value) => validate_amount(field, value),
        None => Err(MyError::validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn recipient(budget: &str) -> EventRecipient {
        EventRecipient {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            budget_limit: d(budget),
            notes: None,
        }
    }

    fn gift(recipient: &EventRecipient, amount: &str, purchased: bool) -> Gift {
        Gift {
            id: Uuid::new_v4(),
            event_recipient_id: recipient.id,
            name: format!("gift {amount}"),
            description: None,
            amount: d(amount),
            purchased,
            url: None,
        }
    }

    #[test]
    fn spent_of_no_gifts_is_zero() {
        assert_eq!(spent(&[]), Decimal::ZERO);
        assert_eq!(remaining(d("40"), &[]), d("40"));
    }

    #[test]
    fn recipient_with_two_gifts() {
        let r1 = recipient("100");
        let gifts = vec![gift(&r1, "30", true), gift(&r1, "45", false)];
        let summary = summarize_recipient(&r1, &gifts);
        assert_eq!(summary.spent, d("75"));
        assert_eq!(summary.remaining, d("25"));
        assert!(!summary.over_budget);
        assert_eq!(summary.gift_count, 2);
        assert_eq!(summary.purchased_count, 1);
    }

    #[test]
    fn over_budget_is_negative_not_an_error() {
        let r2 = recipient("50");
        let gifts = vec![gift(&r2, "25", false), gift(&r2, "35", false)];
        let summary = summarize_recipient(&r2, &gifts);
        assert_eq!(summary.spent, d("60"));
        assert_eq!(summary.remaining, d("-10"));
        assert!(summary.over_budget);
    }

    #[test]
    fn event_totals_sum_recipients() {
        let r1 = recipient("100");
        let r2 = recipient("50");
        let r1_gifts = vec![gift(&r1, "30", false), gift(&r1, "45", false)];
        let r2_gifts = vec![gift(&r2, "60", true)];
        let totals = summarize_event(vec![
            summarize_recipient(&r1, &r1_gifts),
            summarize_recipient(&r2, &r2_gifts),
        ]);
        assert_eq!(totals.total_budget, d("150"));
        assert_eq!(totals.total_spent, d("135"));
        assert_eq!(totals.total_remaining, d("15"));
        assert!(!totals.over_budget);
    }

    #[test]
    fn event_totals_ignore_recipient_order() {
        let r1 = recipient("19.99");
        let r2 = recipient("0.10");
        let r3 = recipient("7.35");
        let g1 = vec![gift(&r1, "0.10", false), gift(&r1, "0.20", false)];
        let g2 = vec![gift(&r2, "12.01", true)];
        let g3 = vec![];
        let forward = summarize_event(vec![
            summarize_recipient(&r1, &g1),
            summarize_recipient(&r2, &g2),
            summarize_recipient(&r3, &g3),
        ]);
        let backward = summarize_event(vec![
            summarize_recipient(&r3, &g3),
            summarize_recipient(&r2, &g2),
            summarize_recipient(&r1, &g1),
        ]);
        assert_eq!(forward.total_budget, backward.total_budget);
        assert_eq!(forward.total_spent, backward.total_spent);
        assert_eq!(forward.total_remaining, backward.total_remaining);
        assert_eq!(forward.total_spent, d("12.31"));
    }

    #[test]
    fn summarizing_twice_gives_the_same_result() {
        let r1 = recipient("10");
        let gifts = vec![gift(&r1, "3.33", false)];
        assert_eq!(summarize_recipient(&r1, &gifts), summarize_recipient(&r1, &gifts));
    }

    #[test]
    fn decimal_sums_do_not_drift() {
        let r1 = recipient("0.3");
        let gifts = vec![gift(&r1, "0.1", false), gift(&r1, "0.2", false)];
        assert_eq!(remaining(r1.budget_limit, &gifts), Decimal::ZERO);
    }

    #[test]
    fn display_rounds_to_cents() {
        assert_eq!(display_amount(d("25")), "25.00");
        assert_eq!(display_amount(d("-10.005")), "-10.01");
        assert_eq!(display_amount(d("3.14159")), "3.14");
    }

    #[test]
    fn negative_and_missing_amounts_are_rejected() {
        assert!(validate_amount("amount", d("0")).is_ok());
        assert_eq!(
            validate_amount("amount", d("-1")),
            Err(MyError::validation("amount must not be negative"))
        );
        assert_eq!(
            require_amount("budget_limit", None),
            Err(MyError::validation("budget_limit is required"))
        );
        assert_eq!(require_amount("budget_limit", Some(d("12.50"))), Ok(d("12.50")));
    }

    #[test]
    fn amounts_must_fit_the_money_columns() {
        assert_eq!(
            validate_amount("amount", d("100000000000")),
            Err(MyError::validation("amount must be less than 10^10"))
        );
        assert!(validate_amount("amount", d("10000000000")).is_err());
        assert_eq!(validate_amount("amount", d("9999999999.99")), Ok(d("9999999999.99")));
    }

    #[test]
    fn sub_cent_amounts_are_rejected() {
        assert_eq!(
            validate_amount("amount", d("10.005")),
            Err(MyError::validation("amount must not have more than 2 decimal places"))
        );
        assert_eq!(validate_amount("amount", d("10.500")), Ok(d("10.500")));
    }
}
