//! Balance and settlement computation over a snapshot of the ledger.
//!
//! Everything here is pure: the same users and expenses always produce the
//! same balances and the same settlement list, in the same order.

use crate::core::errors::{LedgerError, Result};
use crate::core::models::{Balances, Expense, Settlement, SettlementPlan, User};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Smallest currency unit. Balances closer to zero than this count as settled.
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// One member's portion of an expense, rounded to the cent.
pub fn share_of(expense: &Expense) -> Decimal {
    let members = Decimal::from(expense.shared_with.len().max(1));
    (expense.amount / members).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Net balance of every user.
///
/// The payer is credited the amount and every member of `shared_with` is
/// debited their rounded share. Whatever the rounding leaves over is taken
/// back from the payer, so each expense nets to exactly zero.
pub fn compute_balances(users: &[User], expenses: &[Expense]) -> Result<Balances> {
    let mut balances = Balances::new();
    if expenses.is_empty() {
        return Ok(balances);
    }

    for user in users {
        balances.insert(user.id.clone(), Decimal::ZERO);
    }

    for expense in expenses {
        if expense.shared_with.is_empty() {
            return Err(LedgerError::validation(
                "sharedWith",
                "Invalid sharedWith",
                format!("Expense {} is not shared with anyone", expense.id),
            ));
        }

        let share = share_of(expense);
        let residual = expense.amount - share * Decimal::from(expense.shared_with.len());

        *balances.entry(expense.paid_by.clone()).or_default() += expense.amount - residual;
        for member in &expense.shared_with {
            *balances.entry(member.clone()).or_default() -= share;
        }
    }

    Ok(balances)
}

pub fn check_conservation(balances: &Balances) -> Result<()> {
    let residual: Decimal = balances.values().copied().sum();
    if residual.abs() > CENT {
        return Err(LedgerError::InconsistentLedger { residual });
    }
    Ok(())
}

/// Greedy largest-first matching of debtors to creditors.
///
/// Each round pairs the largest creditor with the largest debtor and moves
/// the smaller of the two amounts, which zeroes at least one of them. With
/// `n` non-zero balances this never emits more than `n - 1` transfers.
pub fn settle(balances: &Balances) -> Result<Vec<Settlement>> {
    check_conservation(balances)?;

    let mut creditors: Vec<(&str, Decimal)> = balances
        .iter()
        .filter(|(_, balance)| **balance >= CENT)
        .map(|(id, balance)| (id.as_str(), *balance))
        .collect();
    let mut debtors: Vec<(&str, Decimal)> = balances
        .iter()
        .filter(|(_, balance)| **balance <= -CENT)
        .map(|(id, balance)| (id.as_str(), -*balance))
        .collect();

    let mut settlements = Vec::new();
    while let (Some(ci), Some(di)) = (largest(&creditors), largest(&debtors)) {
        let transfer = creditors[ci].1.min(debtors[di].1);
        debug!(from = debtors[di].0, to = creditors[ci].0, %transfer, "settlement round");

        settlements.push(Settlement {
            from: debtors[di].0.to_string(),
            to: creditors[ci].0.to_string(),
            amount: transfer,
        });

        creditors[ci].1 -= transfer;
        debtors[di].1 -= transfer;

        if creditors[ci].1 < CENT {
            creditors.remove(ci);
        }
        if debtors[di].1 < CENT {
            debtors.remove(di);
        }
    }

    Ok(settlements)
}

pub fn plan(users: &[User], expenses: &[Expense]) -> Result<SettlementPlan> {
    let balances = compute_balances(users, expenses)?;
    let settlements = settle(&balances)?;
    Ok(SettlementPlan { balances, settlements })
}

// Largest amount wins; on a tie the lower user id does.
fn largest(parties: &[(&str, Decimal)]) -> Option<usize> {
    parties
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(index, _)| index)
}
