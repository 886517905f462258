// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and the registration password policy.
//!
//! Hashing uses argon2id with a fresh random salt per call and the library's
//! default cost parameters; output is a PHC-format string. Verification
//! parses the stored PHC string, so cost changes only affect new hashes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Hash a plaintext password into a PHC-format argon2 string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Never errors on mismatch or on an unparseable hash; both are simply a
/// failed verification.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Registration password policy.
///
/// Enforced before hashing, at registration only. Returns the specific
/// violation so the caller can surface a descriptive 400.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_produces_phc_string() {
        let hash = hash_password("Abcdef1").expect("hashing succeeds");
        assert_ne!(hash, "Abcdef1");
        assert!(hash.starts_with("$argon2"), "expected PHC format");
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("Abcdef1").unwrap();
        let b = hash_password("Abcdef1").unwrap();
        assert_ne!(a, b, "two hashes of the same password must differ");
    }

    #[test]
    fn verify_accepts_correct_password() {
        let hash = hash_password("Correct1Horse").unwrap();
        assert!(verify_password("Correct1Horse", &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("Correct1Horse").unwrap();
        assert!(!verify_password("Wrong1Horse", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash_without_panicking() {
        assert!(!verify_password("whatever", "not-a-phc-string"));
        assert!(!verify_password("whatever", ""));
    }

    #[test]
    fn policy_rejects_short_password() {
        assert_eq!(
            validate_password("Ab1"),
            Err("Password must be at least 6 characters long")
        );
    }

    #[test]
    fn policy_rejects_missing_uppercase() {
        assert_eq!(
            validate_password("abcdef1"),
            Err("Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn policy_rejects_missing_digit() {
        assert_eq!(
            validate_password("Abcdefg"),
            Err("Password must contain at least one number")
        );
    }

    #[test]
    fn policy_accepts_compliant_password() {
        assert_eq!(validate_password("Abcdef1"), Ok(()));
    }
}
