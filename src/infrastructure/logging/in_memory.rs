use crate::core::errors::LedgerError;
use crate::core::models::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Audit trail kept in process memory, in the order actions happened.
#[derive(Clone, Default)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::default()
    }
}

// Audit details are always a JSON object keyed by field name.
fn into_details(details: Value) -> Result<Map<String, Value>, LedgerError> {
    match details {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(LedgerError::LoggingError(format!(
            "audit details must be a JSON object, got {}",
            other
        ))),
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(&self, action: &str, details: Value, user_id: Option<&str>) -> Result<(), LedgerError> {
        let entry = AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id: user_id.map(str::to_string),
            details: into_details(details)?.into_iter().collect(),
            timestamp: Utc::now(),
        };
        tracing::debug!(action = %entry.action, user_id = ?entry.user_id, "audit entry recorded");
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, LedgerError> {
        Ok(self.entries.read().await.clone())
    }

    async fn get_logs_for_user(&self, user_id: &str) -> Result<Vec<AppLog>, LedgerError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|entry| entry.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}
