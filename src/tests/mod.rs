mod http_store_tests;

use crate::api;
use crate::core::errors::LedgerError;
use crate::core::models::{Expense, Settlement, User};
use crate::core::repository::ExpenseRepository;
use crate::core::services::LedgerClient;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::store::LedgerStore;
use crate::infrastructure::store::in_memory::InMemoryLedgerStore;
use crate::infrastructure::store::records::{ExpenseRecord, NewExpenseRecord, NewUserRecord, UserRecord};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

pub fn create_test_client() -> LedgerClient<InMemoryLedgerStore, InMemoryLogging> {
    LedgerClient::new(InMemoryLedgerStore::new(), InMemoryLogging::new())
}

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        auth_id: format!("auth-{}", id),
        name: id.to_uppercase(),
    }
}

pub fn expense(id: &str, amount: Decimal, paid_by: &str, shared_with: &[&str]) -> Expense {
    Expense {
        id: id.to_string(),
        title: format!("Expense {}", id),
        amount,
        description: None,
        paid_by: paid_by.to_string(),
        shared_with: shared_with.iter().map(|s| s.to_string()).collect(),
        created_at: Utc::now(),
    }
}

pub fn settlement(from: &str, to: &str, amount: Decimal) -> Settlement {
    Settlement {
        from: from.to_string(),
        to: to.to_string(),
        amount,
    }
}

/// Starts the ledger store app on an ephemeral port and returns its base URL.
pub async fn spawn_store() -> String {
    let repository = Arc::new(ExpenseRepository::new(InMemoryLedgerStore::new()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api::app(repository)).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Store whose every call fails as if the network were down.
pub struct DownStore;

fn down() -> LedgerError {
    LedgerError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl LedgerStore for DownStore {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, LedgerError> {
        Err(down())
    }
    async fn find_user_by_auth_id(&self, _auth_id: &str) -> Result<Option<UserRecord>, LedgerError> {
        Err(down())
    }
    async fn create_user(&self, _user: NewUserRecord) -> Result<UserRecord, LedgerError> {
        Err(down())
    }
    async fn fetch_expenses(&self) -> Result<Vec<ExpenseRecord>, LedgerError> {
        Err(down())
    }
    async fn create_expense(&self, _expense: NewExpenseRecord) -> Result<ExpenseRecord, LedgerError> {
        Err(down())
    }
    async fn fetch_settlements(&self) -> Result<Vec<Settlement>, LedgerError> {
        Err(down())
    }
}
