//! Domain layer: tokens, roles, accounts and user contexts.

pub mod account;
pub mod context;
pub mod errors;
pub mod role;
pub mod token;

pub use account::UserAccount;
pub use context::{UserContext, RTV_COUNT};
pub use errors::{ContextError, LoginError, SessionError, TokenError};
pub use role::{UserRole, ROLE_COUNT};
pub use token::SecurityToken;
