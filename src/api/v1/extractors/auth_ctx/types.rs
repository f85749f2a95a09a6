/*
 * Responsibility
 * - The authenticated context handlers see
 * - The middleware builds it from a successful authentication and stores it in
 *   request extensions; token handling stays in services::auth
 */

use crate::services::auth::{AuthenticatedIdentity, Claims};

/// Context attached to an authenticated request.
///
/// - `scheme_name` is the configured scheme that accepted the request
/// - `claims` always holds `iss` and `sub`, plus any scalar custom claims (roles etc.)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub scheme_name: String,
    pub claims: Claims,
    pub expires_at: Option<i64>,
}

impl AuthCtx {
    pub fn subject(&self) -> &str {
        self.claim("sub").unwrap_or_default()
    }

    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).map(String::as_str)
    }

    /// Role-style claim: the claim exists and its value equals its name (`"Admin": "Admin"`).
    pub fn has_role(&self, role: &str) -> bool {
        self.claim(role) == Some(role)
    }
}

impl From<AuthenticatedIdentity> for AuthCtx {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self {
            scheme_name: identity.scheme_name,
            claims: identity.claims,
            expires_at: identity.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> AuthCtx {
        let mut claims = Claims::new();
        claims.insert("iss".to_string(), "QuickStart".to_string());
        claims.insert("sub".to_string(), "QuickStart".to_string());
        claims.insert("Admin".to_string(), "Admin".to_string());
        claims.insert("tier".to_string(), "gold".to_string());

        AuthCtx::from(AuthenticatedIdentity {
            scheme_name: "QuickStart".to_string(),
            claims,
            expires_at: None,
        })
    }

    #[test]
    fn subject_comes_from_sub_claim() {
        assert_eq!(ctx().subject(), "QuickStart");
    }

    #[test]
    fn role_claims_match_by_name_and_value() {
        let ctx = ctx();
        assert!(ctx.has_role("Admin"));
        assert!(!ctx.has_role("tier"));
        assert!(!ctx.has_role("Reader"));
    }
}
