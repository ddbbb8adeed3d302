//! In-memory account store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::account::{Account, AccountStore};
use crate::error::{StoreError, StoreResult};
use crate::ids::OwnerId;

/// In-memory account store
///
/// Uniqueness of username and email is checked under the write lock, so
/// two racing registrations cannot both succeed.
#[derive(Default)]
pub struct InMemoryAccountStore {
    /// id -> account
    accounts: RwLock<HashMap<OwnerId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts
    pub fn len(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find<F>(&self, pred: F) -> StoreResult<Option<Account>>
    where
        F: Fn(&Account) -> bool,
    {
        let accounts = self.accounts.read().map_err(|_| StoreError::poisoned())?;
        Ok(accounts.values().find(|a| pred(a)).cloned())
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<Account>> {
        self.find(|a| a.username == username || a.email == email)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.find(|a| a.email == email)
    }

    async fn insert(&self, account: Account) -> StoreResult<()> {
        let mut accounts = self.accounts.write().map_err(|_| StoreError::poisoned())?;

        let taken = accounts.values().any(|a| {
            a.id == account.id || a.username == account.username || a.email == account.email
        });
        if taken {
            return Err(StoreError::Conflict(format!(
                "account {} / {}",
                account.username, account.email
            )));
        }

        accounts.insert(account.id.clone(), account);
        Ok(())
    }
}
