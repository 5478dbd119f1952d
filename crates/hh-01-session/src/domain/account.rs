//! # User Accounts
//!
//! The account record a login resolves against. Passwords are stored as a
//! salted HMAC-SHA256 and verified in constant time.

use crate::domain::role::{read_role, write_role, UserRole};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use shared_types::{
    read_header, read_trailer, write_header, write_trailer, BinInStream, BinOutStream,
    FormatError, Persistable,
};

type HmacSha256 = Hmac<Sha256>;

pub const SALT_LEN: usize = 16;
pub const PASSWORD_HASH_LEN: usize = 32;

/// Persisted account record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    login_name: String,
    role: UserRole,
    default_template: String,
    salt: [u8; SALT_LEN],
    password_hash: [u8; PASSWORD_HASH_LEN],
}

impl UserAccount {
    /// Creates an account with a fresh random salt.
    pub fn new(
        login_name: impl Into<String>,
        password: &str,
        role: UserRole,
        default_template: impl Into<String>,
    ) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self {
            login_name: login_name.into(),
            role,
            default_template: default_template.into(),
            salt,
            password_hash: hash_password(&salt, password),
        }
    }

    pub fn login_name(&self) -> &str {
        &self.login_name
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
    }

    /// Re-salts and stores a new password.
    pub fn change_password(&mut self, password: &str) {
        rand::thread_rng().fill_bytes(&mut self.salt);
        self.password_hash = hash_password(&self.salt, password);
    }

    /// Constant-time password check.
    pub fn verify_password(&self, password: &str) -> bool {
        let mut mac = password_mac(&self.salt);
        mac.update(password.as_bytes());
        mac.verify_slice(&self.password_hash).is_ok()
    }
}

fn password_mac(salt: &[u8; SALT_LEN]) -> HmacSha256 {
    match HmacSha256::new_from_slice(salt) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts keys of any length"),
    }
}

fn hash_password(salt: &[u8; SALT_LEN], password: &str) -> [u8; PASSWORD_HASH_LEN] {
    let mut mac = password_mac(salt);
    mac.update(password.as_bytes());
    let mut hash = [0u8; PASSWORD_HASH_LEN];
    hash.copy_from_slice(&mac.finalize().into_bytes());
    hash
}

impl Default for UserAccount {
    fn default() -> Self {
        Self {
            login_name: String::new(),
            role: UserRole::LimitedUser,
            default_template: String::new(),
            salt: [0; SALT_LEN],
            password_hash: [0; PASSWORD_HASH_LEN],
        }
    }
}

impl Persistable for UserAccount {
    const TYPE_NAME: &'static str = "UserAccount";
    const FORMAT_VERSION: u16 = 1;

    fn encode(&self, out: &mut BinOutStream) -> Result<(), FormatError> {
        write_header::<Self>(out);
        out.write_str(&self.login_name)?;
        write_role(out, Some(self.role));
        out.write_str(&self.default_template)?;
        out.write_raw(&self.salt);
        out.write_raw(&self.password_hash);
        write_trailer(out);
        Ok(())
    }

    fn decode(input: &mut BinInStream<'_>) -> Result<Self, FormatError> {
        read_header::<Self>(input)?;
        let login_name = input.read_string()?;
        let role = read_role(input)?.ok_or(FormatError::InvalidValue {
            field: "account role",
            value: u64::from(crate::domain::role::ROLE_COUNT),
        })?;
        let default_template = input.read_string()?;
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(input.read_raw(SALT_LEN)?);
        let mut password_hash = [0u8; PASSWORD_HASH_LEN];
        password_hash.copy_from_slice(input.read_raw(PASSWORD_HASH_LEN)?);
        read_trailer(input)?;
        Ok(Self {
            login_name,
            role,
            default_template,
            salt,
            password_hash,
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
