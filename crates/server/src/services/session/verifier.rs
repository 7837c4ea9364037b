//! Credential verification.
//!
//! The default [`AcceptAnyCredentials`] keeps the demo behavior of letting
//! anyone in. [`StaticCredentials`] checks argon2 hashes from configuration.

use std::collections::HashMap;
use std::sync::RwLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use inventrak_core::Email;
use secrecy::{ExposeSecret, SecretString};

use super::SessionError;
use crate::config::CredentialEntry;

/// Decides whether an email/password pair may sign in.
pub trait CredentialVerifier: Send + Sync {
    /// Check a password.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidCredentials` on a mismatch.
    fn verify(&self, email: &Email, password: &str) -> Result<(), SessionError>;

    /// Record a new account at signup.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyRegistered` if the account exists.
    fn register(&self, email: &Email, password: &str) -> Result<(), SessionError>;

    /// Replace an account's password.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PasswordHash` if hashing fails.
    fn set_password(&self, email: &Email, password: &str) -> Result<(), SessionError>;
}

/// Accepts every credential pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAnyCredentials;

impl CredentialVerifier for AcceptAnyCredentials {
    fn verify(&self, _email: &Email, _password: &str) -> Result<(), SessionError> {
        Ok(())
    }

    fn register(&self, _email: &Email, _password: &str) -> Result<(), SessionError> {
        Ok(())
    }

    fn set_password(&self, _email: &Email, _password: &str) -> Result<(), SessionError> {
        Ok(())
    }
}

/// Fixed set of accounts with argon2 password hashes.
pub struct StaticCredentials {
    hashes: RwLock<HashMap<String, SecretString>>,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("accounts", &self.read().len())
            .finish_non_exhaustive()
    }
}

impl StaticCredentials {
    #[must_use]
    pub fn new(entries: &[CredentialEntry]) -> Self {
        let hashes = entries
            .iter()
            .map(|entry| (entry.email.as_str().to_owned(), entry.password_hash.clone()))
            .collect();
        Self {
            hashes: RwLock::new(hashes),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, SecretString>> {
        self.hashes
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, SecretString>> {
        self.hashes
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, email: &Email, password: &str) -> Result<(), SessionError> {
        let hash = self
            .read()
            .get(email.as_str())
            .cloned()
            .ok_or(SessionError::InvalidCredentials)?;
        verify_password(password, hash.expose_secret())
    }

    fn register(&self, email: &Email, password: &str) -> Result<(), SessionError> {
        let hash = hash_password(password)?;
        let mut hashes = self.write();
        if hashes.contains_key(email.as_str()) {
            return Err(SessionError::AlreadyRegistered);
        }
        hashes.insert(email.as_str().to_owned(), SecretString::from(hash));
        Ok(())
    }

    fn set_password(&self, email: &Email, password: &str) -> Result<(), SessionError> {
        let hash = hash_password(password)?;
        self.write()
            .insert(email.as_str().to_owned(), SecretString::from(hash));
        Ok(())
    }
}

/// Hash a password with argon2id and a random salt, in PHC string format.
///
/// # Errors
///
/// Returns `SessionError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, SessionError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| SessionError::PasswordHash)
}

/// Verify a password against a PHC string.
fn verify_password(password: &str, hash: &str) -> Result<(), SessionError> {
    let parsed = PasswordHash::new(hash).map_err(|_| SessionError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| SessionError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    fn verifier() -> StaticCredentials {
        StaticCredentials::new(&[CredentialEntry {
            email: email("owner@example.com"),
            password_hash: SecretString::from(hash_password("correct horse").unwrap()),
        }])
    }

    #[test]
    fn test_accept_any() {
        assert!(AcceptAnyCredentials.verify(&email("a@b.c"), "x").is_ok());
    }

    #[test]
    fn test_static_verify() {
        let verifier = verifier();
        assert!(verifier.verify(&email("owner@example.com"), "correct horse").is_ok());
        assert!(matches!(
            verifier.verify(&email("owner@example.com"), "wrong"),
            Err(SessionError::InvalidCredentials)
        ));
        assert!(matches!(
            verifier.verify(&email("nobody@example.com"), "correct horse"),
            Err(SessionError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_static_register_and_change() {
        let verifier = verifier();
        verifier.register(&email("new@example.com"), "secret1").unwrap();
        assert!(verifier.verify(&email("new@example.com"), "secret1").is_ok());
        assert!(matches!(
            verifier.register(&email("owner@example.com"), "whatever"),
            Err(SessionError::AlreadyRegistered)
        ));

        verifier.set_password(&email("owner@example.com"), "battery staple").unwrap();
        assert!(verifier.verify(&email("owner@example.com"), "battery staple").is_ok());
        assert!(verifier.verify(&email("owner@example.com"), "correct horse").is_err());
    }

    #[test]
    fn test_debug_hides_hashes() {
        let debug = format!("{:?}", verifier());
        assert!(!debug.contains("argon2"));
    }
}
