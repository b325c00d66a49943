use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Net position per user id, positive when the user is owed money.
/// Ordered by user id so iteration doubles as the tie-break order.
pub type Balances = BTreeMap<String, Decimal>;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 30.0)]
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementPlan {
    pub balances: Balances,
    pub settlements: Vec<Settlement>,
}
