//! Bearer authentication for `/api/v1/*`: `Authorization` header → `TokenAuthenticator`
//! → `AuthCtx` in request extensions, or 401.
//!
//! Only issuer/subject mismatches put a message in the 401 body; every other
//! rejection answers a bare "unauthorized".

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::Rejection;
use crate::state::AppState;

/// Put bearer authentication in front of every route of `router`.
///
/// ```ignore
/// let v1 = Router::new().route("/me", get(me));
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 `from_fn` cannot take a State extractor; pass the state explicitly.
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // A header that is not visible ASCII cannot be `Bearer <token>`.
    let outcome = match req.headers().get(header::AUTHORIZATION).map(|v| v.to_str()) {
        None => state.auth.authenticate(None),
        Some(Ok(value)) => state.auth.authenticate(Some(value)),
        Some(Err(_)) => Err(Rejection::MalformedScheme),
    };

    let identity = match outcome {
        Ok(identity) => identity,
        Err(rejection) => {
            tracing::warn!(
                kind = rejection.kind(),
                error = %rejection,
                path = %req.uri().path(),
                "authentication rejected"
            );
            return Err(AppError::unauthorized(rejection.failure_message()));
        }
    };

    tracing::debug!(
        scheme = %identity.scheme_name,
        subject = identity.subject().unwrap_or_default(),
        "request authenticated"
    );

    // Handed to `AuthCtxExtractor`.
    req.extensions_mut().insert(AuthCtx::from(identity));

    Ok(next.run(req).await)
}
