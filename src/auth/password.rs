use bcrypt::{hash, verify, DEFAULT_COST};
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

/// bcrypt work factor. Tests build with debug assertions and use the minimum
/// so the suite stays fast.
fn cost() -> u32 {
    if cfg!(debug_assertions) {
        4
    } else {
        DEFAULT_COST
    }
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash(password, cost()).map_err(|e| PasswordError(e.to_string()))
}

/// Stand-in hash for lookups that found no account
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_password("recipe-api-unusable-password").unwrap_or_default());

/// Verify against `stored`, or against `DUMMY_HASH` when there is none.
/// Always performs exactly one bcrypt verification; `None` never matches.
pub fn verify_password_or_dummy(password: &str, stored: Option<&str>) -> bool {
    match stored {
        Some(password_hash) => verify_password(password, password_hash),
        None => {
            let _ = verify_password(password, &DUMMY_HASH);
            false
        }
    }
}

/// A malformed stored hash counts as a mismatch rather than an error; the
/// caller reports both as invalid credentials.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original() {
        let h = hash_password("123456789").unwrap();
        assert_ne!(h, "123456789");
        assert!(verify_password("123456789", &h));
        assert!(!verify_password("wrong_pass", &h));
    }

    #[test]
    fn missing_account_still_pays_for_a_real_verification() {
        // The fallback must be a well-formed hash, otherwise bcrypt bails out early
        assert!(verify("anything", &DUMMY_HASH).is_ok());
        assert!(!verify_password_or_dummy("recipe-api-unusable-password", None));
        assert!(!verify_password_or_dummy("anything", None));
    }

    #[test]
    fn stored_hash_is_used_when_present() {
        let h = hash_password("testpass").unwrap();
        assert!(verify_password_or_dummy("testpass", Some(&h)));
        assert!(!verify_password_or_dummy("wrong_pass", Some(&h)));
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
