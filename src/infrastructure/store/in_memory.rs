use crate::core::engine;
use crate::core::errors::LedgerError;
use crate::core::models::Settlement;
use crate::core::repository::{normalize_expense, normalize_user};
use crate::infrastructure::store::LedgerStore;
use crate::infrastructure::store::records::{ExpenseRecord, NewExpenseRecord, NewUserRecord, UserRecord};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct InMemoryLedgerStore {
    users: Mutex<HashMap<String, UserRecord>>,
    auth_ids: Mutex<HashMap<String, String>>, // auth_id -> user_id
    expenses: Mutex<Vec<ExpenseRecord>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        InMemoryLedgerStore {
            users: Mutex::new(HashMap::new()),
            auth_ids: Mutex::new(HashMap::new()),
            expenses: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, LedgerError> {
        Ok(self.users.lock().await.values().cloned().collect())
    }

    async fn find_user_by_auth_id(&self, auth_id: &str) -> Result<Option<UserRecord>, LedgerError> {
        let user_id = self.auth_ids.lock().await.get(auth_id).cloned();
        Ok(match user_id {
            Some(id) => self.users.lock().await.get(&id).cloned(),
            None => None,
        })
    }

    async fn create_user(&self, user: NewUserRecord) -> Result<UserRecord, LedgerError> {
        // Held across the insert so two registrations cannot both pass the check.
        let mut auth_ids = self.auth_ids.lock().await;
        if auth_ids.contains_key(&user.auth_id) {
            return Err(LedgerError::AlreadyRegistered(user.auth_id));
        }

        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            auth_id: user.auth_id,
            name: user.name,
        };
        auth_ids.insert(record.auth_id.clone(), record.id.clone());
        self.users.lock().await.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn fetch_expenses(&self) -> Result<Vec<ExpenseRecord>, LedgerError> {
        Ok(self.expenses.lock().await.clone())
    }

    async fn create_expense(&self, expense: NewExpenseRecord) -> Result<ExpenseRecord, LedgerError> {
        if expense.amount <= Decimal::ZERO {
            return Err(LedgerError::validation(
                "amount",
                "Invalid Amount",
                "Amount must be greater than 0",
            ));
        }
        if expense.shared_with.is_empty() {
            return Err(LedgerError::validation(
                "sharedWith",
                "Invalid sharedWith",
                "An expense must be shared with at least one user",
            ));
        }
        {
            let users = self.users.lock().await;
            if let Some(unknown) = std::iter::once(&expense.paid_by)
                .chain(expense.shared_with.iter())
                .find(|id| !users.contains_key(id.as_str()))
            {
                return Err(LedgerError::UserNotFound(unknown.clone()));
            }
        }

        let record = ExpenseRecord {
            id: Uuid::new_v4().to_string(),
            title: expense.title,
            amount: expense.amount,
            description: expense.description,
            paid_by: expense.paid_by,
            shared_with: expense.shared_with,
            created_at: Utc::now(),
        };
        self.expenses.lock().await.push(record.clone());
        Ok(record)
    }

    async fn fetch_settlements(&self) -> Result<Vec<Settlement>, LedgerError> {
        let users: Vec<_> = self.fetch_users().await?.into_iter().filter_map(normalize_user).collect();
        let expenses: Vec<_> = self
            .fetch_expenses()
            .await?
            .into_iter()
            .filter_map(normalize_expense)
            .collect();
        Ok(engine::plan(&users, &expenses)?.settlements)
    }
}
