/*
 * Responsibility
 * - Response DTO for GET /api/v1/me
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::v1::extractors::AuthCtx;
use crate::services::auth::Claims;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub scheme: String,
    pub subject: String,
    pub claims: Claims,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<AuthCtx> for MeResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            subject: ctx.subject().to_string(),
            expires_at: ctx
                .expires_at
                .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
            scheme: ctx.scheme_name,
            claims: ctx.claims,
        }
    }
}
