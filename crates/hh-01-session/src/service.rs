//! # Login Service
//!
//! Authenticates account credentials, mints security tokens and builds the
//! user context for the new session.
//!
//! ## Token layout
//!
//! ```text
//! Nonce[16] | IssuedAt:u64 | ExpiresAt:u64 | HMAC-SHA256[32]
//! ```
//!
//! The MAC covers everything before it. Callers treat the token as opaque;
//! only this service looks inside.

use crate::config::SessionConfig;
use crate::domain::context::UserContext;
use crate::domain::errors::LoginError;
use crate::domain::token::SecurityToken;
use crate::ports::inbound::LoginApi;
use crate::ports::outbound::{AccountStore, HostEnvironment, TimeSource};
use crate::SUBSYSTEM;
use hmac::{Hmac, Mac};
use hub_telemetry::{log_event, log_session_event};
use sha2::Sha256;
use tracing::info;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const NONCE_LEN: usize = 16;
const MAC_LEN: usize = 32;
const BODY_LEN: usize = NONCE_LEN + 8 + 8;

/// Total length of a minted token.
pub const TOKEN_LEN: usize = BODY_LEN + MAC_LEN;

/// What a valid token asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub nonce: Uuid,
    pub issued_at: u64,
    pub expires_at: u64,
}

/// Login service over an account store, a clock and the host environment.
pub struct LoginService<S, T, E>
where
    S: AccountStore,
    T: TimeSource,
    E: HostEnvironment,
{
    config: SessionConfig,
    accounts: S,
    clock: T,
    host: E,
}

impl<S, T, E> LoginService<S, T, E>
where
    S: AccountStore,
    T: TimeSource,
    E: HostEnvironment,
{
    pub fn new(config: SessionConfig, accounts: S, clock: T, host: E) -> Self {
        info!("[hh-01] Initializing Login Service");
        info!("  RTV Prefix: {}", config.rtv_prefix);
        info!("  Token Lifetime: {}s", config.token_ttl_secs);
        Self {
            config,
            accounts,
            clock,
            host,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn accounts(&self) -> &S {
        &self.accounts
    }

    /// Mints a new signed token valid from now.
    pub fn mint_token(&self) -> Result<SecurityToken, LoginError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at.saturating_add(self.config.token_ttl_secs);

        let mut bytes = Vec::with_capacity(TOKEN_LEN);
        bytes.extend_from_slice(Uuid::new_v4().as_bytes());
        bytes.extend_from_slice(&issued_at.to_le_bytes());
        bytes.extend_from_slice(&expires_at.to_le_bytes());
        let mut mac = self.token_mac();
        mac.update(&bytes);
        bytes.extend_from_slice(&mac.finalize().into_bytes());

        let mut token = SecurityToken::new();
        token.set(&bytes, TOKEN_LEN)?;
        Ok(token)
    }

    fn token_mac(&self) -> HmacSha256 {
        match HmacSha256::new_from_slice(&self.config.hmac_secret) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC accepts keys of any length"),
        }
    }

    fn decode_claims(body: &[u8]) -> TokenClaims {
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&body[..NONCE_LEN]);
        let mut issued = [0u8; 8];
        issued.copy_from_slice(&body[NONCE_LEN..NONCE_LEN + 8]);
        let mut expires = [0u8; 8];
        expires.copy_from_slice(&body[NONCE_LEN + 8..BODY_LEN]);
        TokenClaims {
            nonce: Uuid::from_bytes(nonce),
            issued_at: u64::from_le_bytes(issued),
            expires_at: u64::from_le_bytes(expires),
        }
    }
}

impl<S, T, E> LoginApi for LoginService<S, T, E>
where
    S: AccountStore,
    T: TimeSource,
    E: HostEnvironment,
{
    fn login(&self, login_name: &str, password: &str) -> Result<UserContext, LoginError> {
        let Some(account) = self.accounts.find_account(login_name)? else {
            log_session_event!(warn, SUBSYSTEM, "Login rejected: unknown account", login_name);
            return Err(LoginError::UnknownAccount(login_name.to_owned()));
        };

        if !account.verify_password(password) {
            log_session_event!(warn, SUBSYSTEM, "Login rejected: bad password", login_name);
            return Err(LoginError::BadPassword(login_name.to_owned()));
        }

        let token = self.mint_token()?;
        let mut ctx = UserContext::new();
        ctx.set(&account, token);
        ctx.load_runtime_values_from_host(&self.host, &self.config.rtv_prefix);

        log_session_event!(
            info,
            SUBSYSTEM,
            "Login accepted",
            login_name,
            role = %account.role()
        );
        Ok(ctx)
    }

    fn validate_token(&self, token: &SecurityToken) -> Result<TokenClaims, LoginError> {
        let bytes = token.payload();
        if bytes.len() != TOKEN_LEN {
            return Err(LoginError::TokenForged("unexpected length"));
        }

        let (body, tag) = bytes.split_at(BODY_LEN);
        let mut mac = self.token_mac();
        mac.update(body);
        if mac.verify_slice(tag).is_err() {
            return Err(LoginError::TokenForged("signature mismatch"));
        }

        let claims = Self::decode_claims(body);
        let now = self.clock.now();
        if now >= claims.expires_at {
            log_event!(debug, SUBSYSTEM, "Token expired", nonce = %claims.nonce);
            return Err(LoginError::TokenExpired {
                expired_at: claims.expires_at,
                now,
            });
        }
        Ok(claims)
    }
}
