//! Factory: build the shared `TokenAuthenticator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthConfigError, TokenAuthenticator};

pub fn build_authenticator(config: &Config) -> Result<Arc<TokenAuthenticator>, AuthConfigError> {
    let auth = TokenAuthenticator::new(config.auth.clone())?;

    tracing::info!(
        scheme = %auth.scheme_name(),
        issuer = %auth.config().claims_issuer,
        subject = %auth.config().subject,
        "bearer authentication configured"
    );

    Ok(Arc::new(auth))
}
