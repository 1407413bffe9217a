//! Balance reconciliation for the economy ledger.
//!
//! Replays the transactions recorded since the last baseline and compares
//! the implied balance with the stored one. Every well-formed recording path
//! updates both together, so a mismatch means the balance was mutated behind
//! the ledger's back.

use rust_decimal::Decimal;

use kanban_types::{MoneyTransaction, TransactionType};

use crate::LedgerAnomaly;

/// The result of a reconciliation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileResult {
    /// The stored balance matches the log.
    Balanced,
    /// The stored balance disagrees with the log.
    Anomaly(LedgerAnomaly),
}

/// Compute the balance implied by `baseline` plus `entries`.
///
/// Returns `None` on overflow.
pub fn implied_balance(baseline: Decimal, entries: &[MoneyTransaction]) -> Option<Decimal> {
    entries.iter().try_fold(baseline, |acc, entry| match entry.kind {
        TransactionType::Income => acc.checked_add(entry.amount),
        TransactionType::Expense => acc.checked_sub(entry.amount),
    })
}

/// Verify that `actual` equals `baseline` plus the net of `entries`.
pub fn verify_balance(
    baseline: Decimal,
    entries: &[MoneyTransaction],
    actual: Decimal,
) -> ReconcileResult {
    let Some(expected) = implied_balance(baseline, entries) else {
        return ReconcileResult::Anomaly(LedgerAnomaly {
            expected: Decimal::ZERO,
            actual,
            message: String::from("overflow while replaying the transaction log"),
        });
    };

    if expected == actual {
        ReconcileResult::Balanced
    } else {
        ReconcileResult::Anomaly(LedgerAnomaly {
            expected,
            actual,
            message: format!("balance mismatch: log implies {expected}, stored {actual}"),
        })
    }
}
