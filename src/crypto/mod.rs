//! Credential handling for MoneyMate
//!
//! Argon2id password hashing plus the password strength rules applied at
//! registration.

pub mod password;

pub use password::{
    hash_password, password_strength, strength_label, verify_password, PasswordChecks,
    MIN_LOGIN_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
