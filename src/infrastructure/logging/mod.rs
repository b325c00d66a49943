pub mod in_memory;

use crate::core::errors::LedgerError;
use crate::core::models::AppLog;
use async_trait::async_trait;

/// Audit trail of actions taken through the ledger client.
#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), LedgerError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, LedgerError>;
    async fn get_logs_for_user(&self, user_id: &str) -> Result<Vec<AppLog>, LedgerError>;
}
