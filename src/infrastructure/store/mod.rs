use crate::core::errors::LedgerError;
use crate::core::models::Settlement;
use async_trait::async_trait;

pub mod http;
pub mod in_memory;
pub mod records;

use records::{ExpenseRecord, NewExpenseRecord, NewUserRecord, UserRecord};

/// Remote collection of users and expenses.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, LedgerError>;
    async fn find_user_by_auth_id(&self, auth_id: &str) -> Result<Option<UserRecord>, LedgerError>;
    /// Fails with `AlreadyRegistered` instead of creating a second user for the same auth id.
    async fn create_user(&self, user: NewUserRecord) -> Result<UserRecord, LedgerError>;
    async fn fetch_expenses(&self) -> Result<Vec<ExpenseRecord>, LedgerError>;
    async fn create_expense(&self, expense: NewExpenseRecord) -> Result<ExpenseRecord, LedgerError>;
    async fn fetch_settlements(&self) -> Result<Vec<Settlement>, LedgerError>;
}
