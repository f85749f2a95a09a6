/*
 * Responsibility
 * - URL layout of v1
 * - Everything under /api/v1 requires a bearer token
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::me::me;
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new().route("/me", get(me));

    middleware::auth::access::apply(router, state)
}
