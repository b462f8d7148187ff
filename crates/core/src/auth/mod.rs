//! Authentication primitives.
//!
//! Password hashing with Argon2id. Token issuing/validation lives in
//! `qms-shared`; business-area access resolution lives in the db crate.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
