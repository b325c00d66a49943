use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 90.0)]
    pub amount: Decimal,
    pub description: Option<String>,
    pub paid_by: String,
    pub shared_with: Vec<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn is_shared_with(&self, user_id: &str) -> bool {
        self.shared_with.iter().any(|id| id == user_id)
    }
}

/// Unvalidated expense input as collected from a form. The amount stays a
/// string until the repository parses it.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: String,
    #[serde(default)]
    pub description: Option<String>,
    pub paid_by: String,
    #[serde(default)]
    pub shared_with: Vec<String>,
    /// Split among every registered user; `shared_with` is ignored.
    #[serde(default)]
    pub share_with_everyone: bool,
}
