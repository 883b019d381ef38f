//! Password hashing and strength rules
//!
//! Passwords are stored as Argon2id PHC strings (salt and parameters are
//! embedded in the string), so verification needs nothing but the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{MoneyMateError, MoneyMateResult};

/// Minimum length of a new password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Shortest password accepted at login before hitting the store
pub const MIN_LOGIN_PASSWORD_LENGTH: usize = 6;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> MoneyMateResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| MoneyMateError::Auth(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored PHC string
///
/// A malformed stored hash is an error; a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, stored_hash: &str) -> MoneyMateResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| MoneyMateError::Auth(format!("Stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Which strength rules a password satisfies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordChecks {
    pub long_enough: bool,
    pub has_uppercase: bool,
    pub has_digit: bool,
    pub has_special: bool,
}

impl PasswordChecks {
    pub fn of(password: &str) -> Self {
        Self {
            long_enough: password.chars().count() >= MIN_PASSWORD_LENGTH,
            has_uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            has_digit: password.chars().any(|c| c.is_ascii_digit()),
            has_special: password.chars().any(|c| !c.is_alphanumeric() || c == '_'),
        }
    }

    /// Number of satisfied rules, 0..=4
    pub fn score(&self) -> u8 {
        [
            self.long_enough,
            self.has_uppercase,
            self.has_digit,
            self.has_special,
        ]
        .iter()
        .filter(|ok| **ok)
        .count() as u8
    }

    pub fn is_strong(&self) -> bool {
        self.score() == 4
    }

    /// Descriptions of the unmet rules
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.long_enough {
            missing.push("at least 8 characters");
        }
        if !self.has_uppercase {
            missing.push("an uppercase letter");
        }
        if !self.has_digit {
            missing.push("a digit");
        }
        if !self.has_special {
            missing.push("a special character");
        }
        missing
    }
}

/// Strength score of a password, 0 (weak) to 4 (strong)
pub fn password_strength(password: &str) -> u8 {
    PasswordChecks::of(password).score()
}

/// Label for a strength score
pub fn strength_label(score: u8) -> &'static str {
    match score {
        0 | 1 => "weak",
        2 => "fair",
        _ => "strong",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Secret#123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Secret#123", &hash).unwrap());
        assert!(!verify_password("secret#123", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Secret#123").unwrap();
        let b = hash_password("Secret#123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_stored_hash() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(MoneyMateError::Auth(_))
        ));
    }

    #[test]
    fn test_strength_scores() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abcdefgh"), 1);
        assert_eq!(password_strength("Abcdefgh"), 2);
        assert_eq!(password_strength("Abcdefg1"), 3);
        assert_eq!(password_strength("Abcdef1!"), 4);
        assert_eq!(password_strength("Ab1_"), 3);
    }

    #[test]
    fn test_missing_rules() {
        let checks = PasswordChecks::of("abc");
        assert!(!checks.is_strong());
        assert_eq!(
            checks.missing(),
            vec![
                "at least 8 characters",
                "an uppercase letter",
                "a digit",
                "a special character"
            ]
        );
        assert!(PasswordChecks::of("Abcdef1!").missing().is_empty());
    }

    #[test]
    fn test_labels() {
        assert_eq!(strength_label(1), "weak");
        assert_eq!(strength_label(2), "fair");
        assert_eq!(strength_label(4), "strong");
    }
}
