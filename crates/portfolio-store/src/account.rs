//! Accounts: the owners every other record hangs off

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::ids::OwnerId;

/// Two-value role flag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

/// A registered account
///
/// Holds the password only as a PHC hash string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: OwnerId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// New account with a fresh id and the default role
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: OwnerId::generate(),
            username,
            email,
            password_hash,
            role: Role::default(),
            created_at: Utc::now(),
        }
    }
}

/// Account persistence with globally unique username and email
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Any account holding either this username or this email
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Store a new account
    ///
    /// Returns `StoreError::Conflict` if the username or email is taken.
    async fn insert(&self, account: Account) -> StoreResult<()>;
}
