//! # User Context
//!
//! One authenticated session: who logged in, with which role, the token
//! they were issued, their default UI template and nine session-scoped
//! runtime values (RTVs).
//!
//! ## Invariants
//!
//! | Rule | Description |
//! |------|-------------|
//! | Bounded RTVs | Slots are addressed `0..=8`; other indices fail, never clamp |
//! | Role/name consistency | `display_name` always follows `role` |
//! | Clean reset | `reset` leaves nothing from the previous account behind |

use crate::domain::account::UserAccount;
use crate::domain::errors::ContextError;
use crate::domain::role::{read_role, write_role, UserRole};
use crate::domain::token::SecurityToken;
use crate::ports::outbound::HostEnvironment;
use shared_types::{
    read_header, read_trailer, write_header, write_trailer, BinInStream, BinOutStream,
    FormatError, Persistable,
};
use tracing::debug;

/// Number of runtime value slots.
pub const RTV_COUNT: usize = 9;

/// Per-session user context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    user_name: String,
    role: Option<UserRole>,
    display_name: String,
    token: SecurityToken,
    default_template: String,
    env_rtvs: [String; RTV_COUNT],
}

impl UserContext {
    /// Creates an empty context with no role.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the context for a successful login.
    pub fn logged_in(
        user_name: impl Into<String>,
        role: UserRole,
        token: SecurityToken,
        default_template: impl Into<String>,
    ) -> Self {
        let mut ctx = Self {
            user_name: user_name.into(),
            token,
            default_template: default_template.into(),
            ..Self::default()
        };
        ctx.assign_role(Some(role));
        ctx
    }

    /// Adopts the account's identity, role and template plus a fresh token.
    ///
    /// Runtime values are left as they are.
    pub fn set(&mut self, account: &UserAccount, token: SecurityToken) {
        self.user_name = account.login_name().to_owned();
        self.assign_role(Some(account.role()));
        self.default_template = account.default_template().to_owned();
        self.token = token;
    }

    /// Fills the runtime values from `{prefix}1` .. `{prefix}9`.
    ///
    /// A missing variable empties its slot, so repeated calls against the
    /// same environment give the same result.
    pub fn load_runtime_values_from_host(&mut self, host: &dyn HostEnvironment, prefix: &str) {
        for (index, slot) in self.env_rtvs.iter_mut().enumerate() {
            let name = format!("{prefix}{}", index + 1);
            match host.var(&name) {
                Some(value) => *slot = value,
                None => slot.clear(),
            }
        }
        debug!(
            user = %self.user_name,
            populated = self.env_rtvs.iter().filter(|v| !v.is_empty()).count(),
            "Loaded runtime values from host"
        );
    }

    /// Reads runtime value `index`.
    pub fn env_rtv_at(&self, index: usize) -> Result<&str, ContextError> {
        self.env_rtvs
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| ContextError::index(index))
    }

    /// Writes runtime value `index`.
    pub fn set_env_rtv_at(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), ContextError> {
        let slot = self
            .env_rtvs
            .get_mut(index)
            .ok_or_else(|| ContextError::index(index))?;
        *slot = value.into();
        Ok(())
    }

    /// Returns the context to the empty state.
    pub fn reset(&mut self) {
        self.user_name.clear();
        self.assign_role(None);
        self.token.reset();
        self.default_template.clear();
        self.env_rtvs.iter_mut().for_each(String::clear);
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Role, or `None` while unset.
    pub fn user_role(&self) -> Option<UserRole> {
        self.role
    }

    /// Role display name, empty while unset.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn security_token(&self) -> &SecurityToken {
        &self.token
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    pub fn env_rtvs(&self) -> &[String; RTV_COUNT] {
        &self.env_rtvs
    }

    pub fn is_logged_in(&self) -> bool {
        self.role.is_some() && !self.token.is_empty()
    }

    fn assign_role(&mut self, role: Option<UserRole>) {
        self.role = role;
        self.display_name = role.map(UserRole::display_name).unwrap_or_default().to_owned();
    }
}

/// Version 1 had no runtime values; they load empty.
impl Persistable for UserContext {
    const TYPE_NAME: &'static str = "UserContext";
    const FORMAT_VERSION: u16 = 2;

    fn encode(&self, out: &mut BinOutStream) -> Result<(), FormatError> {
        write_header::<Self>(out);
        out.write_str(&self.user_name)?;
        write_role(out, self.role);
        self.token.encode(out)?;
        out.write_str(&self.default_template)?;
        for value in &self.env_rtvs {
            out.write_str(value)?;
        }
        write_trailer(out);
        Ok(())
    }

    fn decode(input: &mut BinInStream<'_>) -> Result<Self, FormatError> {
        let version = read_header::<Self>(input)?;
        let mut ctx = Self {
            user_name: input.read_string()?,
            ..Self::default()
        };
        ctx.assign_role(read_role(input)?);
        ctx.token = SecurityToken::decode(input)?;
        ctx.default_template = input.read_string()?;
        if version >= 2 {
            for slot in ctx.env_rtvs.iter_mut() {
                *slot = input.read_string()?;
            }
        }
        read_trailer(input)?;
        Ok(ctx)
    }

    fn reset(&mut self) {
        UserContext::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::environment::MapEnvironment;

    fn admin_context() -> UserContext {
        let mut ctx = UserContext::logged_in(
            "admin",
            UserRole::SystemAdmin,
            SecurityToken::from_payload(&[0xA5; 24]),
            "/User/Admin/Main",
        );
        ctx.set_env_rtv_at(0, "living room").unwrap();
        ctx.set_env_rtv_at(8, "night").unwrap();
        ctx
    }

    #[test]
    fn test_empty_context_has_no_role() {
        let ctx = UserContext::new();
        assert_eq!(ctx.user_role(), None);
        assert_eq!(ctx.display_name(), "");
        assert!(ctx.security_token().is_empty());
        assert!(ctx.env_rtvs().iter().all(String::is_empty));
        assert!(!ctx.is_logged_in());
    }

    #[test]
    fn test_set_adopts_account_role_and_keeps_rtvs() {
        let mut ctx = UserContext::new();
        ctx.set_env_rtv_at(3, "keep me").unwrap();

        let account = UserAccount::new("erin", "pw", UserRole::PowerUser, "/User/Erin");
        ctx.set(&account, SecurityToken::from_payload(b"fresh"));

        assert_eq!(ctx.user_role(), Some(UserRole::PowerUser));
        assert_eq!(ctx.display_name(), "Power User");
        assert_eq!(ctx.user_name(), "erin");
        assert_eq!(ctx.default_template(), "/User/Erin");
        assert_eq!(ctx.security_token().payload(), b"fresh");
        assert_eq!(ctx.env_rtv_at(3).unwrap(), "keep me");
        assert!(ctx.is_logged_in());
    }

    #[test]
    fn test_rtv_set_then_get_all_slots() {
        let mut ctx = UserContext::new();
        for i in 0..RTV_COUNT {
            ctx.set_env_rtv_at(i, format!("value-{i}")).unwrap();
        }
        for i in 0..RTV_COUNT {
            assert_eq!(ctx.env_rtv_at(i).unwrap(), format!("value-{i}"));
        }
    }

    #[test]
    fn test_rtv_index_out_of_range() {
        let mut ctx = UserContext::new();
        for index in [9, 10, usize::MAX] {
            assert_eq!(
                ctx.env_rtv_at(index),
                Err(ContextError::IndexOutOfRange { index, max: 8 })
            );
            assert_eq!(
                ctx.set_env_rtv_at(index, "x"),
                Err(ContextError::IndexOutOfRange { index, max: 8 })
            );
        }
        assert!(ctx.env_rtvs().iter().all(String::is_empty));
    }

    #[test]
    fn test_load_from_host_fills_and_clears() {
        let host = MapEnvironment::from_pairs([("HH_EnvRTV1", "one"), ("HH_EnvRTV9", "nine")]);
        let mut ctx = UserContext::new();
        ctx.set_env_rtv_at(4, "stale").unwrap();

        ctx.load_runtime_values_from_host(&host, "HH_EnvRTV");

        assert_eq!(ctx.env_rtv_at(0).unwrap(), "one");
        assert_eq!(ctx.env_rtv_at(4).unwrap(), "");
        assert_eq!(ctx.env_rtv_at(8).unwrap(), "nine");
    }

    #[test]
    fn test_load_from_host_is_idempotent() {
        let host = MapEnvironment::from_pairs([("RTV2", "b"), ("RTV5", "e"), ("RTV10", "ignored")]);
        let mut ctx = UserContext::new();
        ctx.load_runtime_values_from_host(&host, "RTV");
        let first = ctx.env_rtvs().clone();
        ctx.load_runtime_values_from_host(&host, "RTV");
        assert_eq!(ctx.env_rtvs(), &first);
        assert_eq!(first[1], "b");
        assert_eq!(first[4], "e");
    }

    #[test]
    fn test_reset_matches_fresh_context() {
        let mut ctx = admin_context();
        ctx.reset();
        assert_eq!(ctx, UserContext::new());
    }

    #[test]
    fn test_persist_round_trip() {
        let ctx = admin_context();
        let bytes = ctx.to_bytes().unwrap();
        assert_eq!(UserContext::from_bytes(&bytes).unwrap(), ctx);
    }

    #[test]
    fn test_empty_context_round_trip_keeps_unset_role() {
        let bytes = UserContext::new().to_bytes().unwrap();
        let loaded = UserContext::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.user_role(), None);
    }

    #[test]
    fn test_version_one_stream_loads_with_empty_rtvs() {
        let token = SecurityToken::from_payload(&[1, 2, 3]);
        let mut out = BinOutStream::new();
        out.write_start_marker();
        out.write_u16(1);
        out.write_str("frank").unwrap();
        write_role(&mut out, Some(UserRole::NormalUser));
        token.encode(&mut out).unwrap();
        out.write_str("/User/Frank").unwrap();
        out.write_end_marker();

        let ctx = UserContext::from_bytes(out.as_bytes()).unwrap();
        assert_eq!(ctx.user_name(), "frank");
        assert_eq!(ctx.display_name(), "Normal User");
        assert_eq!(ctx.security_token(), &token);
        assert!(ctx.env_rtvs().iter().all(String::is_empty));
    }

    #[test]
    fn test_future_version_rejected() {
        let mut bytes = UserContext::new().to_bytes().unwrap();
        bytes[1..3].copy_from_slice(&3u16.to_le_bytes());
        assert!(matches!(
            UserContext::from_bytes(&bytes),
            Err(FormatError::BadVersion { type_name: "UserContext", version: 3, .. })
        ));
    }
}
