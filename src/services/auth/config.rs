//! Authentication scheme settings.
//!
//! Built once at startup (see `crate::config::Config`) and shared read-only
//! by every request through `TokenAuthenticator`.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthConfigError {
    #[error("signing secret must not be empty")]
    EmptySecret,
    #[error("'{0}' must not be empty")]
    Empty(&'static str),
}

/// Settings for the bearer scheme.
///
/// - `claims_issuer` / `subject` are compared verbatim with the token's `iss` / `sub`.
/// - `signing_secret` is the HMAC key shared with whoever mints tokens.
/// - `leeway_seconds` only applies when a token carries a numeric `exp`.
#[derive(Clone)]
pub struct AuthConfig {
    pub claims_issuer: String,
    pub subject: String,
    pub signing_secret: Vec<u8>,
    pub scheme_name: String,
    pub leeway_seconds: u64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthConfig")
            .field("claims_issuer", &self.claims_issuer)
            .field("subject", &self.subject)
            .field("signing_secret", &"<redacted>")
            .field("scheme_name", &self.scheme_name)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl AuthConfig {
    pub const DEFAULT_SCHEME_NAME: &'static str = "QuickStart";
    pub const DEFAULT_LEEWAY_SECONDS: u64 = 60;

    pub fn new(
        claims_issuer: impl Into<String>,
        subject: impl Into<String>,
        signing_secret: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            claims_issuer: claims_issuer.into(),
            subject: subject.into(),
            signing_secret: signing_secret.into(),
            scheme_name: Self::DEFAULT_SCHEME_NAME.to_string(),
            leeway_seconds: Self::DEFAULT_LEEWAY_SECONDS,
        }
    }

    pub fn with_scheme_name(mut self, scheme_name: impl Into<String>) -> Self {
        self.scheme_name = scheme_name.into();
        self
    }

    pub fn with_leeway_seconds(mut self, leeway_seconds: u64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }

    /// Fail fast on settings that would make every request fail (or every token pass).
    pub fn validate(&self) -> Result<(), AuthConfigError> {
        if self.signing_secret.is_empty() {
            return Err(AuthConfigError::EmptySecret);
        }
        if self.claims_issuer.trim().is_empty() {
            return Err(AuthConfigError::Empty("claims_issuer"));
        }
        if self.subject.trim().is_empty() {
            return Err(AuthConfigError::Empty("subject"));
        }
        if self.scheme_name.trim().is_empty() {
            return Err(AuthConfigError::Empty("scheme_name"));
        }
        Ok(())
    }
}
