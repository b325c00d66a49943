//! Wire shapes exchanged with the ledger store.
//!
//! One contract for every endpoint: JSON with camelCase keys, list endpoints
//! answer with a bare array. `_id` and `clerkUserId` are accepted as aliases
//! because document-database backends emit them.

use crate::core::errors::{FieldError, LedgerError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "clerkUserId")]
    pub auth_id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRecord {
    #[serde(alias = "clerkUserId")]
    pub auth_id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub paid_by: String,
    #[serde(default)]
    pub shared_with: Vec<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseRecord {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub paid_by: String,
    pub shared_with: Vec<String>,
}

/// Error body returned by the store on non-2xx responses.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Set on 422 answers: how far the balances are from summing to zero.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub residual: Option<Decimal>,
}

impl ErrorBody {
    pub fn into_field_error(self) -> FieldError {
        let field = self.field.unwrap_or_else(|| "request".to_string());
        FieldError::new(&field, "Rejected by ledger store", self.error)
    }

    /// Residual of an inconsistent ledger; zero when the store did not say.
    pub fn into_inconsistent_ledger(self) -> LedgerError {
        LedgerError::InconsistentLedger {
            residual: self.residual.unwrap_or_default(),
        }
    }
}
