use crate::domain::account::UserAccount;
use crate::ports::outbound::AccountStore;
use parking_lot::RwLock;
use shared_types::{FormatError, Persistable};
use std::collections::HashMap;

/// In-memory account store.
///
/// Records are held in their persisted envelope form, the same bytes a
/// configuration repository would hold.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    records: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with `accounts`.
    pub fn with_accounts(
        accounts: impl IntoIterator<Item = UserAccount>,
    ) -> Result<Self, FormatError> {
        let store = Self::new();
        for account in accounts {
            store.store_account(&account)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountStore for InMemoryAccountStore {
    fn find_account(&self, login_name: &str) -> Result<Option<UserAccount>, FormatError> {
        self.records
            .read()
            .get(login_name)
            .map(|bytes| UserAccount::from_bytes(bytes))
            .transpose()
    }

    fn store_account(&self, account: &UserAccount) -> Result<(), FormatError> {
        let bytes = account.to_bytes()?;
        self.records
            .write()
            .insert(account.login_name().to_owned(), bytes);
        Ok(())
    }

    fn remove_account(&self, login_name: &str) -> bool {
        self.records.write().remove(login_name).is_some()
    }
}
