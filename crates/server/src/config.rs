//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `INVENTRAK_HOST` - Bind address (default: 127.0.0.1)
//! - `INVENTRAK_PORT` - Listen port (default: 3000)
//! - `INVENTRAK_SESSION_DIR` - Directory holding the session record (default: .inventrak)
//! - `INVENTRAK_AUTH_DELAY_MS` - Simulated login/signup latency (default: 1000)
//! - `INVENTRAK_URGENCY_CRITICAL_PCT` - Critical stock cut-off (default: 25)
//! - `INVENTRAK_URGENCY_URGENT_PCT` - Urgent stock cut-off (default: 50)
//! - `INVENTRAK_CREDENTIALS` - `email=argon2-hash;...` pairs; when set, only
//!   these accounts may sign in
//! - `INVENTRAK_LOG_JSON` - Emit JSON logs when `true` or `1`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use argon2::password_hash::PasswordHash;
use inventrak_core::Email;
use inventrak_core::alerts::UrgencyPolicy;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// One configured account: email plus argon2 PHC hash.
#[derive(Clone)]
pub struct CredentialEntry {
    pub email: Email,
    pub password_hash: SecretString,
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding `inventrak_user.json`
    pub session_dir: PathBuf,
    /// Simulated latency of login and signup
    pub auth_delay: Duration,
    /// Low-stock urgency cut-offs
    pub urgency: UrgencyPolicy,
    /// Accounts allowed to sign in; `None` accepts anyone
    pub credentials: Option<Vec<CredentialEntry>>,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            session_dir: PathBuf::from(".inventrak"),
            auth_delay: Duration::from_millis(1000),
            urgency: UrgencyPolicy::default(),
            credentials: None,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set to a value
    /// that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` on unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parsed("INVENTRAK_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?;
        let port = env.parsed("INVENTRAK_PORT", 3000_u16)?;
        let session_dir = PathBuf::from(env.or_default("INVENTRAK_SESSION_DIR", ".inventrak"));
        let auth_delay = Duration::from_millis(env.parsed("INVENTRAK_AUTH_DELAY_MS", 1000_u64)?);

        let critical = env.parsed(
            "INVENTRAK_URGENCY_CRITICAL_PCT",
            UrgencyPolicy::DEFAULT_CRITICAL_PCT,
        )?;
        let urgent = env.parsed("INVENTRAK_URGENCY_URGENT_PCT", UrgencyPolicy::DEFAULT_URGENT_PCT)?;
        let urgency = UrgencyPolicy::new(critical, urgent).map_err(|e| {
            ConfigError::InvalidEnvVar("INVENTRAK_URGENCY_CRITICAL_PCT".to_string(), e.to_string())
        })?;

        let credentials = env
            .optional("INVENTRAK_CREDENTIALS")
            .map(|raw| parse_credentials(&SecretString::from(raw)))
            .transpose()?;

        let log_json = env
            .optional("INVENTRAK_LOG_JSON")
            .is_some_and(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"));

        Ok(Self {
            host,
            port,
            session_dir,
            auth_delay,
            urgency,
            credentials,
            log_json,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed("SENTRY_SAMPLE_RATE", 1.0_f32)?,
            sentry_traces_sample_rate: env.parsed("SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Parse `email=hash;email=hash`. Hashes contain `=` themselves, so each
/// entry is split on the first one only.
fn parse_credentials(raw: &SecretString) -> Result<Vec<CredentialEntry>, ConfigError> {
    let invalid =
        |reason: String| ConfigError::InvalidEnvVar("INVENTRAK_CREDENTIALS".to_string(), reason);

    raw.expose_secret()
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (email, hash) = entry
                .split_once('=')
                .ok_or_else(|| invalid("expected email=hash".to_string()))?;
            let email = Email::parse(email).map_err(|e| invalid(e.to_string()))?;
            PasswordHash::new(hash.trim())
                .map_err(|e| invalid(format!("bad hash for {email}: {e}")))?;
            Ok(CredentialEntry {
                email,
                password_hash: SecretString::from(hash.trim().to_owned()),
            })
        })
        .collect()
}
