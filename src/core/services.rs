use crate::core::constants::{
    EXPENSE_ADDED, SETTLEMENTS_COMPUTED, SUMMARY_QUERIED, USER_REGISTERED, USER_RESOLVED,
};
use crate::core::engine;
use crate::core::errors::Result;
use crate::core::models::{
    AppLog, Balances, Expense, ExpenseDraft, LedgerSnapshot, LedgerSummary, Registration, Settlement, User,
};
use crate::core::repository::ExpenseRepository;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::store::LedgerStore;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::warn;

/// Entry point for the presentation layer. Every read fetches the ledger
/// again; the last fetched snapshot is kept only so views can render it
/// without another round trip.
pub struct LedgerClient<S: LedgerStore, L: LoggingService> {
    repository: ExpenseRepository<S>,
    logging: L,
    snapshot: RwLock<Option<LedgerSnapshot>>,
}

impl<S: LedgerStore, L: LoggingService> LedgerClient<S, L> {
    pub fn new(store: S, logging: L) -> Self {
        LedgerClient {
            repository: ExpenseRepository::new(store),
            logging,
            snapshot: RwLock::new(None),
        }
    }

    pub fn repository(&self) -> &ExpenseRepository<S> {
        &self.repository
    }

    pub async fn resolve_or_register_user(&self, auth_id: &str, display_name: &str) -> Result<Registration> {
        let registration = self.repository.resolve_or_register_user(auth_id, display_name).await?;
        let action = if registration.is_created() {
            USER_REGISTERED
        } else {
            USER_RESOLVED
        };
        let user = registration.user();
        self.logging
            .log_action(action, json!({ "user_id": user.id, "name": user.name }), Some(user.id.as_str()))
            .await?;
        Ok(registration)
    }

    /// Fetches users and expenses together and keeps the result as the latest snapshot.
    pub async fn refresh(&self) -> Result<LedgerSnapshot> {
        let (users, expenses) = futures::try_join!(self.repository.list_users(), self.repository.list_expenses())?;
        let snapshot = LedgerSnapshot {
            users,
            expenses,
            fetched_at: Utc::now(),
        };
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// `None` before the first fetch and after every write.
    pub async fn last_snapshot(&self) -> Option<LedgerSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// The user roster, or an empty one when the store cannot be reached.
    pub async fn known_users(&self) -> Vec<User> {
        match self.repository.list_users().await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "user roster unavailable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Totals for one user over a fresh snapshot.
    ///
    /// `current_user_share` adds up the per-expense shares exactly as the
    /// balances debit them, each already rounded to the cent by
    /// [`engine::share_of`]. Over many expenses it can differ by a few cents
    /// from the unrounded sum of `amount / members`.
    pub async fn get_summary(&self, current_user_id: &str) -> Result<LedgerSummary> {
        let snapshot = self.refresh().await?;
        let balances = engine::compute_balances(&snapshot.users, &snapshot.expenses)?;

        let total_expenses: Decimal = snapshot.expenses.iter().map(|e| e.amount).sum();
        let current_user_share: Decimal = snapshot
            .expenses
            .iter()
            .filter(|e| e.is_shared_with(current_user_id))
            .map(engine::share_of)
            .sum();
        let current_user_balance = balances.get(current_user_id).copied().unwrap_or_default();

        self.logging
            .log_action(SUMMARY_QUERIED, json!({ "user_id": current_user_id }), Some(current_user_id))
            .await?;

        Ok(LedgerSummary {
            total_expenses,
            current_user_share,
            current_user_balance,
        })
    }

    pub async fn get_balances(&self) -> Result<Balances> {
        let snapshot = self.refresh().await?;
        engine::compute_balances(&snapshot.users, &snapshot.expenses)
    }

    /// Records an expense on behalf of `current_user`, who becomes the payer
    /// when the draft names none. The held snapshot is dropped afterwards;
    /// callers re-read to see the new expense.
    pub async fn add_expense(&self, current_user: &User, mut draft: ExpenseDraft) -> Result<Expense> {
        if draft.paid_by.trim().is_empty() {
            draft.paid_by = current_user.id.clone();
        }

        let expense = self.repository.record_expense(draft).await?;
        *self.snapshot.write().await = None;

        self.logging
            .log_action(
                EXPENSE_ADDED,
                json!({
                    "expense_id": expense.id,
                    "title": expense.title,
                    "amount": expense.amount.to_string(),
                    "paid_by": expense.paid_by,
                    "shared_with": expense.shared_with
                }),
                Some(current_user.id.as_str()),
            )
            .await?;
        Ok(expense)
    }

    /// Settlements computed locally over a fresh snapshot.
    pub async fn get_settlements(&self) -> Result<Vec<Settlement>> {
        let snapshot = self.refresh().await?;
        let plan = engine::plan(&snapshot.users, &snapshot.expenses)?;

        self.logging
            .log_action(
                SETTLEMENTS_COMPUTED,
                json!({ "expenses": snapshot.expenses.len(), "settlements": plan.settlements.len() }),
                None,
            )
            .await?;
        Ok(plan.settlements)
    }

    /// Settlements as computed by the ledger store itself.
    pub async fn get_store_settlements(&self) -> Result<Vec<Settlement>> {
        self.repository.store().fetch_settlements().await
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>> {
        self.logging.get_logs().await
    }

    /// Audit entries attributed to one user, oldest first.
    pub async fn get_user_activity(&self, user_id: &str) -> Result<Vec<AppLog>> {
        self.logging.get_logs_for_user(user_id).await
    }
}
