pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::LedgerError;
pub use crate::core::models::{Expense, ExpenseDraft, LedgerSummary, Registration, Settlement, User};
pub use crate::core::repository::ExpenseRepository;
pub use crate::core::services::LedgerClient;
pub use crate::infrastructure::logging::in_memory::InMemoryLogging;
pub use crate::infrastructure::store::LedgerStore;
pub use crate::infrastructure::store::http::HttpLedgerStore;
pub use crate::infrastructure::store::in_memory::InMemoryLedgerStore;

#[cfg(test)]
mod tests;
