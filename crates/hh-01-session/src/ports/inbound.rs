//! Inbound Ports (Driving Ports / API)

use crate::domain::context::UserContext;
use crate::domain::errors::LoginError;
use crate::domain::token::SecurityToken;
use crate::service::TokenClaims;

/// Login service API consumed by server components.
pub trait LoginApi {
    /// Authenticates and returns a populated context.
    fn login(&self, login_name: &str, password: &str) -> Result<UserContext, LoginError>;

    /// Checks that a token was minted here and is still valid.
    fn validate_token(&self, token: &SecurityToken) -> Result<TokenClaims, LoginError>;
}
