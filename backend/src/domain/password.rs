//! Argon2id password digests in PHC string form.
//!
//! Hashing and verification are CPU bound; async callers run them on the
//! blocking pool.

use std::fmt;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use uuid::Uuid;

/// Errors raised while producing or loading a digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordDigestError {
    /// The hasher rejected its input or parameters.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// A stored value is not a PHC string.
    #[error("stored password hash is malformed: {message}")]
    Malformed { message: String },
}

/// Salted Argon2id digest of a password.
///
/// # Examples
/// ```
/// use backend::domain::PasswordDigest;
///
/// let digest = PasswordDigest::hash("correct horse").unwrap();
/// assert!(digest.verify("correct horse"));
/// assert!(!digest.verify("battery staple"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash `password` with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, PasswordDigestError> {
        // A v4 UUID carries 122 random bits, enough for a 16 byte salt.
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(|err| {
            PasswordDigestError::Hash {
                message: err.to_string(),
            }
        })?;
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordDigestError::Hash {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Load a digest read back from storage.
    pub fn from_phc(phc: impl Into<String>) -> Result<Self, PasswordDigestError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|err| PasswordDigestError::Malformed {
            message: err.to_string(),
        })?;
        Ok(Self(phc))
    }

    /// Whether `password` matches this digest.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }

    /// PHC string stored in `users.password_hash`.
    #[must_use]
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}
