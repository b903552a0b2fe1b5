use sha3::{Digest, Sha3_256};
use uuid::Uuid;

pub fn get_sha3_256_hash(data: &str) -> String {
    let mut hasher = Sha3_256::default();
    hasher.update(data.as_bytes());
    format!("{:X}", hasher.finalize())
}

pub fn new_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn hash_password(pwd: &str, salt: &str) -> String {
    get_sha3_256_hash(&format!("{salt}:{pwd}"))
}

pub fn verify_password(pwd: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(pwd, salt) == expected_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_password_different_salt_differs() {
        let a = hash_password("hunter2", &new_salt());
        let b = hash_password("hunter2", &new_salt());
        assert_ne!(a, b);
    }

    #[test]
    fn verify_accepts_only_the_right_password() {
        let salt = new_salt();
        let hash = hash_password("hunter2", &salt);
        assert!(verify_password("hunter2", &salt, &hash));
        assert!(!verify_password("hunter3", &salt, &hash));
    }

    #[test]
    fn sha3_of_empty_string() {
        assert_eq!(
            get_sha3_256_hash(""),
            "A7FFC6F8BF1ED76651C14756A061D662F580FF4DE43B49FA82D80A4B80F8434A"
        );
    }
}
