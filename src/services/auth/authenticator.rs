use std::collections::{BTreeMap, HashSet};

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::config::{AuthConfig, AuthConfigError};

const BEARER_PREFIX: &str = "Bearer ";

/// Payload members handled by the scheme itself; never copied into `Claims`
/// (except `iss` / `sub`, which are added explicitly once verified).
pub(crate) const REGISTERED_CLAIMS: &[&str] = &["iss", "sub", "exp", "iat", "nbf", "aud", "jti"];

/// Identity claims, keyed by claim name.
pub type Claims = BTreeMap<String, String>;

pub type AuthResult = Result<AuthenticatedIdentity, Rejection>;

/// Why a request was not authenticated.
///
/// Only the issuer/subject mismatches carry a message meant for the caller;
/// see [`Rejection::failure_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("missing authorization header")]
    NoHeader,
    #[error("authorization header is not a bearer credential")]
    MalformedScheme,
    #[error("token could not be verified")]
    InvalidToken,
    #[error("token payload has no usable '{0}' claim")]
    MalformedPayload(&'static str),
    #[error("Expected '{expected}' issuer, but got '{actual}'.")]
    IssuerMismatch { expected: String, actual: String },
    #[error("Expected '{expected}' subject, but got '{actual}'.")]
    SubjectMismatch { expected: String, actual: String },
}

impl Rejection {
    /// Stable identifier, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoHeader => "no_header",
            Self::MalformedScheme => "malformed_scheme",
            Self::InvalidToken => "invalid_token",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::IssuerMismatch { .. } => "issuer_mismatch",
            Self::SubjectMismatch { .. } => "subject_mismatch",
        }
    }

    /// Message that may be shown to the caller.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::IssuerMismatch { .. } | Self::SubjectMismatch { .. } => Some(self.to_string()),
            _ => None,
        }
    }
}

/// Result of a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    pub scheme_name: String,
    pub claims: Claims,
    // Unix seconds; `None` when the token carries no `exp`.
    pub expires_at: Option<i64>,
}

impl AuthenticatedIdentity {
    pub fn subject(&self) -> Option<&str> {
        self.claims.get("sub").map(String::as_str)
    }

    pub fn issuer(&self) -> Option<&str> {
        self.claims.get("iss").map(String::as_str)
    }
}

/// Decoded payload of a verified token. Lives for a single `authenticate` call.
#[derive(Debug)]
struct ParsedToken {
    issuer: String,
    subject: String,
    expiry: Option<i64>,
    extra_claims: Claims,
}

impl ParsedToken {
    fn from_payload(payload: Map<String, Value>, expiry: Option<i64>) -> Result<Self, Rejection> {
        let issuer = required_string(&payload, "iss")?;
        let subject = required_string(&payload, "sub")?;

        let mut extra_claims = Claims::new();
        for (name, value) in payload {
            if REGISTERED_CLAIMS.contains(&name.as_str()) {
                continue;
            }
            match value {
                Value::String(s) => {
                    extra_claims.insert(name, s);
                }
                Value::Number(n) => {
                    extra_claims.insert(name, n.to_string());
                }
                Value::Bool(b) => {
                    extra_claims.insert(name, b.to_string());
                }
                // null / arrays / objects have no single string form
                _ => debug!(claim = %name, "skipping non-scalar claim"),
            }
        }

        Ok(Self {
            issuer,
            subject,
            expiry,
            extra_claims,
        })
    }

    fn into_claims(self) -> Claims {
        let mut claims = self.extra_claims;
        claims.insert("iss".to_string(), self.issuer);
        claims.insert("sub".to_string(), self.subject);
        claims
    }
}

fn required_string(payload: &Map<String, Value>, name: &'static str) -> Result<String, Rejection> {
    match payload.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(Rejection::MalformedPayload(name)),
    }
}

/// `exp` / `nbf` as unix seconds. Absent or `null` means "not set";
/// anything but a non-negative integer is an invalid token.
fn timestamp_claim(payload: &Map<String, Value>, name: &str) -> Result<Option<i64>, Rejection> {
    match payload.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|v| i64::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                debug!(claim = name, "malformed time claim");
                Rejection::InvalidToken
            }),
    }
}

/// Enforce `exp` and `nbf` (both with leeway). Returns the expiry, if any.
fn check_time_claims(
    payload: &Map<String, Value>,
    now: i64,
    leeway_seconds: u64,
) -> Result<Option<i64>, Rejection> {
    let leeway = i64::try_from(leeway_seconds).unwrap_or(i64::MAX);
    let expiry = timestamp_claim(payload, "exp")?;
    let not_before = timestamp_claim(payload, "nbf")?;

    if let Some(exp) = expiry {
        if exp.saturating_add(leeway) < now {
            debug!(exp, now, "token expired");
            return Err(Rejection::InvalidToken);
        }
    }
    if let Some(nbf) = not_before {
        if nbf.saturating_sub(leeway) > now {
            debug!(nbf, now, "token not yet valid");
            return Err(Rejection::InvalidToken);
        }
    }

    Ok(expiry)
}

/// Pull `<token>` out of `Bearer <token>`.
fn bearer_token(header_value: Option<&str>) -> Result<&str, Rejection> {
    let value = match header_value {
        Some(v) if !v.is_empty() => v,
        _ => return Err(Rejection::NoHeader),
    };

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(Rejection::MalformedScheme)?;

    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(Rejection::MalformedScheme);
    }

    Ok(token)
}

/// HS256 bearer-token authenticator.
///
/// Holds no per-request state: one instance is shared by all requests.
/// Key material is not printable via Debug.
#[derive(Clone)]
pub struct TokenAuthenticator {
    config: AuthConfig,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("config", &self.config)
            .finish()
    }
}

impl TokenAuthenticator {
    pub fn new(config: AuthConfig) -> Result<Self, AuthConfigError> {
        config.validate()?;

        let decoding_key = DecodingKey::from_secret(&config.signing_secret);

        // jsonwebtoken only checks signature and algorithm. Time claims are checked in
        // `check_time_claims` (it refuses `"exp": null`, which issued tokens carry), and
        // iss/sub in `authenticate` so that mismatches keep their own rejection.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Ok(Self {
            config,
            decoding_key,
            validation,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn scheme_name(&self) -> &str {
        &self.config.scheme_name
    }

    /// Authenticate a raw `Authorization` header value.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// header present → `Bearer ` scheme → signature/decoding → `exp`/`nbf` → `iss`/`sub` present
    /// → issuer → subject.
    pub fn authenticate(&self, header_value: Option<&str>) -> AuthResult {
        self.authenticate_at(header_value, chrono::Utc::now().timestamp())
    }

    fn authenticate_at(&self, header_value: Option<&str>, now: i64) -> AuthResult {
        let token = bearer_token(header_value)?;
        let payload = self.verify(token)?;
        let expiry = check_time_claims(&payload, now, self.config.leeway_seconds)?;
        let parsed = ParsedToken::from_payload(payload, expiry)?;

        if parsed.issuer != self.config.claims_issuer {
            return Err(Rejection::IssuerMismatch {
                expected: self.config.claims_issuer.clone(),
                actual: parsed.issuer,
            });
        }

        if parsed.subject != self.config.subject {
            return Err(Rejection::SubjectMismatch {
                expected: self.config.subject.clone(),
                actual: parsed.subject,
            });
        }

        Ok(AuthenticatedIdentity {
            scheme_name: self.config.scheme_name.clone(),
            expires_at: parsed.expiry,
            claims: parsed.into_claims(),
        })
    }

    // Signature + algorithm, then the raw JSON payload.
    fn verify(&self, token: &str) -> Result<Map<String, Value>, Rejection> {
        jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token verification failed");
                Rejection::InvalidToken
            })
    }
}
