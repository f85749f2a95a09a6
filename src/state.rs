/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cheap to clone: everything inside is behind Arc
 */
use std::sync::Arc;

use crate::services::auth::TokenAuthenticator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<TokenAuthenticator>,
}

impl AppState {
    pub fn new(auth: Arc<TokenAuthenticator>) -> Self {
        Self { auth }
    }
}
