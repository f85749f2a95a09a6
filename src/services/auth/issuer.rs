use std::collections::BTreeMap;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

use super::authenticator::REGISTERED_CLAIMS;
use super::config::{AuthConfig, AuthConfigError};

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("claim '{0}' is set by the issuer and cannot be overridden")]
    ReservedClaim(String),
    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/// Mints HS256 tokens that `TokenAuthenticator` accepts for the same settings.
///
/// Used by the `token-gen` tool and by tests; the API itself never issues tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    issuer: String,
    subject: String,
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        secret: &[u8],
    ) -> Result<Self, AuthConfigError> {
        if secret.is_empty() {
            return Err(AuthConfigError::EmptySecret);
        }

        Ok(Self {
            issuer: issuer.into(),
            subject: subject.into(),
            encoding_key: EncodingKey::from_secret(secret),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthConfigError> {
        Self::new(
            config.claims_issuer.clone(),
            config.subject.clone(),
            &config.signing_secret,
        )
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Issue a token valid for `ttl` (or without `exp` when `None`).
    pub fn issue(
        &self,
        extra_claims: &BTreeMap<String, String>,
        ttl: Option<chrono::Duration>,
    ) -> Result<String, IssueError> {
        self.issue_at(extra_claims, chrono::Utc::now().timestamp(), ttl)
    }

    /// Same as `issue`, with an explicit issue time (unix seconds).
    pub fn issue_at(
        &self,
        extra_claims: &BTreeMap<String, String>,
        issued_at: i64,
        ttl: Option<chrono::Duration>,
    ) -> Result<String, IssueError> {
        let mut payload = Map::new();

        for (name, value) in extra_claims {
            if REGISTERED_CLAIMS.contains(&name.as_str()) {
                return Err(IssueError::ReservedClaim(name.clone()));
            }
            payload.insert(name.clone(), Value::String(value.clone()));
        }

        payload.insert("iss".to_string(), Value::String(self.issuer.clone()));
        payload.insert("sub".to_string(), Value::String(self.subject.clone()));
        payload.insert("iat".to_string(), Value::from(issued_at));
        if let Some(ttl) = ttl {
            payload.insert("exp".to_string(), Value::from(issued_at + ttl.num_seconds()));
        }

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, &payload, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign token");
            IssueError::Sign(e)
        })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("subject", &self.subject)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_is_refused() {
        let err = TokenIssuer::new("QuickStart", "QuickStart", b"").unwrap_err();
        assert_eq!(err, AuthConfigError::EmptySecret);
    }

    #[test]
    fn registered_claims_cannot_be_overridden() {
        let issuer = TokenIssuer::new("QuickStart", "QuickStart", b"secret").unwrap();
        let mut extra = BTreeMap::new();
        extra.insert("iss".to_string(), "Someone else".to_string());

        let err = issuer.issue(&extra, None).unwrap_err();
        assert!(matches!(err, IssueError::ReservedClaim(name) if name == "iss"));
    }

    #[test]
    fn issued_token_has_three_segments_and_hs256_header() {
        let issuer = TokenIssuer::new("QuickStart", "QuickStart", b"secret").unwrap();
        let token = issuer
            .issue(&BTreeMap::new(), Some(chrono::Duration::minutes(5)))
            .unwrap();

        assert_eq!(token.split('.').count(), 3);
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }
}
