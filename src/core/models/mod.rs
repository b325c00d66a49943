pub mod audit;
pub mod expense;
pub mod settlement;
pub mod summary;
pub mod user;

pub use audit::AppLog;
pub use expense::{Expense, ExpenseDraft};
pub use settlement::{Balances, Settlement, SettlementPlan};
pub use summary::{LedgerSnapshot, LedgerSummary};
pub use user::{Registration, User};
