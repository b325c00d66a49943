use crate::core::constants::{MAX_AMOUNT, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_TITLE_LEN};
use crate::core::errors::{LedgerError, Result};
use crate::core::models::{Expense, ExpenseDraft, Registration, User};
use crate::infrastructure::store::LedgerStore;
use crate::infrastructure::store::records::{ExpenseRecord, NewExpenseRecord, NewUserRecord, UserRecord};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{info, warn};

/// Typed view over a [`LedgerStore`]: every record coming out of the store
/// goes through [`normalize_user`] or [`normalize_expense`], every write is
/// validated before it goes in.
pub struct ExpenseRepository<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> ExpenseRepository<S> {
    pub fn new(store: S) -> Self {
        ExpenseRepository { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let records = self.store.fetch_users().await?;
        Ok(records.into_iter().filter_map(normalize_user).collect())
    }

    /// All expenses, in whatever order the store returns them.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let records = self.store.fetch_expenses().await?;
        Ok(records.into_iter().filter_map(normalize_expense).collect())
    }

    pub async fn record_expense(&self, draft: ExpenseDraft) -> Result<Expense> {
        let title = validate_text("title", &draft.title, MAX_TITLE_LEN)?;
        let amount = parse_amount(&draft.amount)?;
        let description = match draft.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                if text.chars().count() > MAX_DESCRIPTION_LEN {
                    return Err(LedgerError::validation(
                        "description",
                        "Description Too Long",
                        format!("description cannot exceed {} characters", MAX_DESCRIPTION_LEN),
                    ));
                }
                Some(text.to_string())
            }
            _ => None,
        };

        let paid_by = draft.paid_by.trim().to_string();
        let mut shared_with = dedupe_ids(draft.shared_with);
        if shared_with.is_empty() && !draft.share_with_everyone {
            return Err(LedgerError::validation(
                "sharedWith",
                "Invalid sharedWith",
                "An expense must be shared with at least one user",
            ));
        }

        let users = self.list_users().await?;
        if draft.share_with_everyone {
            shared_with = users.iter().map(|u| u.id.clone()).collect();
            shared_with.sort();
        }
        let known: HashSet<&str> = users.iter().map(|u| u.id.as_str()).collect();
        if !known.contains(paid_by.as_str()) {
            return Err(LedgerError::validation(
                "paidBy",
                "Unknown payer",
                format!("User {} does not exist", paid_by),
            ));
        }
        if let Some(unknown) = shared_with.iter().find(|id| !known.contains(id.as_str())) {
            return Err(LedgerError::validation(
                "sharedWith",
                "Unknown member",
                format!("User {} does not exist", unknown),
            ));
        }

        let record = self
            .store
            .create_expense(NewExpenseRecord {
                title,
                amount,
                description,
                paid_by,
                shared_with,
            })
            .await?;
        info!(expense_id = %record.id, amount = %record.amount, "expense recorded");

        normalize_expense(record)
            .ok_or_else(|| LedgerError::Unavailable("store returned a malformed expense".to_string()))
    }

    /// Returns the user registered under `auth_id`, creating it on first
    /// sight. An existing user is returned untouched even if `display_name`
    /// differs.
    pub async fn resolve_or_register_user(&self, auth_id: &str, display_name: &str) -> Result<Registration> {
        let auth_id = auth_id.trim();
        if auth_id.is_empty() {
            return Err(LedgerError::validation("authId", "Invalid authId", "authId cannot be empty"));
        }

        if let Some(record) = self.store.find_user_by_auth_id(auth_id).await? {
            return expect_user(record).map(Registration::Found);
        }

        let name = validate_text("name", display_name, MAX_NAME_LEN)?;
        let created = self
            .store
            .create_user(NewUserRecord {
                auth_id: auth_id.to_string(),
                name,
            })
            .await;

        match created {
            Ok(record) => {
                info!(user_id = %record.id, "user registered");
                expect_user(record).map(Registration::Created)
            }
            // Someone registered the same identity between our lookup and the insert.
            Err(LedgerError::AlreadyRegistered(_)) => {
                let record = self.store.find_user_by_auth_id(auth_id).await?.ok_or_else(|| {
                    LedgerError::Unavailable(format!("user for {} vanished after registration", auth_id))
                })?;
                expect_user(record).map(Registration::Found)
            }
            Err(e) => Err(e),
        }
    }
}

/// Turns a stored user into a [`User`], or `None` when it lacks an id.
pub fn normalize_user(record: UserRecord) -> Option<User> {
    let id = record.id.trim();
    let auth_id = record.auth_id.trim();
    if id.is_empty() || auth_id.is_empty() {
        warn!(?record, "dropping user record without id");
        return None;
    }
    Some(User {
        id: id.to_string(),
        auth_id: auth_id.to_string(),
        name: record.name.trim().to_string(),
    })
}

/// Turns a stored expense into an [`Expense`].
///
/// Strings are trimmed, an empty description becomes `None` and repeated
/// members are collapsed. Records are dropped when the amount is outside
/// what [`parse_amount`] would accept, when there is no payer, or when there
/// is nobody to share with.
pub fn normalize_expense(record: ExpenseRecord) -> Option<Expense> {
    let shared_with = dedupe_ids(record.shared_with);
    let paid_by = record.paid_by.trim();

    if !is_storable_amount(record.amount) || shared_with.is_empty() || paid_by.is_empty() {
        warn!(expense_id = %record.id, amount = %record.amount, "dropping malformed expense record");
        return None;
    }

    Some(Expense {
        id: record.id.trim().to_string(),
        title: record.title.trim().to_string(),
        amount: record.amount,
        description: record
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        paid_by: paid_by.to_string(),
        shared_with,
        created_at: record.created_at,
    })
}

/// Parses a user-entered amount: positive, at most two decimal places.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| LedgerError::validation("amount", "Invalid Amount", "Amount must be a number"))?;

    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(
            "amount",
            "Invalid Amount",
            "Amount must be greater than 0",
        ));
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(LedgerError::validation(
            "amount",
            "Amount Too Large",
            format!("Amount cannot exceed {}", MAX_AMOUNT),
        ));
    }
    if amount.normalize().scale() > 2 {
        return Err(LedgerError::validation(
            "amount",
            "Invalid Amount",
            "Amount cannot have more than 2 decimal places",
        ));
    }
    Ok(amount)
}

// Positive, capped at MAX_AMOUNT, whole cents. Keeps ledger sums far from
// Decimal's range.
fn is_storable_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount <= Decimal::from(MAX_AMOUNT) && amount.normalize().scale() <= 2
}

fn validate_text(field: &str, value: &str, max_length: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LedgerError::validation(
            field,
            format!("Invalid {}", field),
            format!("{} cannot be empty", field),
        ));
    }
    if value.chars().count() > max_length {
        return Err(LedgerError::validation(
            field,
            format!("{} Too Long", field),
            format!("{} cannot exceed {} characters", field, max_length),
        ));
    }
    if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
        return Err(LedgerError::validation(
            field,
            format!("Invalid {}", field),
            format!("{} contains invalid characters", field),
        ));
    }
    Ok(value.to_string())
}

fn expect_user(record: UserRecord) -> Result<User> {
    normalize_user(record).ok_or_else(|| LedgerError::Unavailable("store returned a malformed user".to_string()))
}

// Keeps first-seen order, drops blanks and repeats.
fn dedupe_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect()
}
