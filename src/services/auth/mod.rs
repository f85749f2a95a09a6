pub mod authenticator;
pub mod config;
pub mod factory;
pub mod issuer;

pub use authenticator::{AuthResult, AuthenticatedIdentity, Claims, Rejection, TokenAuthenticator};
pub use config::{AuthConfig, AuthConfigError};
pub use factory::build_authenticator;
pub use issuer::{IssueError, TokenIssuer};
