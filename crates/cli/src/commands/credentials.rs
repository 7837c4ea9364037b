//! Credential entry generation.

use inventrak_core::Email;
use inventrak_server::services::session::hash_password;

use super::CommandError;

/// Build one `email=argon2-hash` entry for `INVENTRAK_CREDENTIALS`.
///
/// Entries are joined with `;` in the variable.
///
/// # Errors
///
/// Returns an error for an invalid email, an empty password, or a hashing
/// failure.
pub fn hash_entry(email: &str, password: &str) -> Result<String, CommandError> {
    let email = Email::parse(email)?;
    if password.is_empty() {
        return Err(CommandError::EmptyPassword);
    }
    let hash = hash_password(password)?;
    tracing::info!(email = %email, "Hashed credential");
    Ok(format!("{email}={hash}"))
}
