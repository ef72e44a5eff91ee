//! Cryptographic functions for FK's Bank
//!
//! Provides salted Argon2id password hashing and a zeroizing string type
//! for passwords held in memory.

pub mod password;
pub mod secure_memory;

pub use password::{hash_password, verify_password, HashingParams};
pub use secure_memory::SecureString;
