//! Economy ledger for the Kanban workflow simulation.
//!
//! The game has a single money balance. Every change to it goes through the
//! [`EconomyLedger`], which appends an immutable [`MoneyTransaction`] and
//! adjusts the balance in the same step. The one exception is
//! [`EconomyLedger::set_money`], a facilitator override that re-baselines the
//! balance without recording a transaction.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`EconomyLedger`] struct: append-only log plus balance.
//! - [`transaction`] -- The [`TransactionBuilder`] for validated entries.
//! - [`reconcile`] -- Balance reconciliation against the log.
//!
//! # Reconciliation
//!
//! Since the last baseline (construction, reset or `set_money`):
//!
//! ```text
//! balance == baseline + sum(income) - sum(expense)
//! ```
//!
//! # Usage
//!
//! ```
//! use kanban_ledger::{EconomyLedger, ReconcileResult};
//! use rust_decimal::Decimal;
//!
//! let mut ledger = EconomyLedger::new(Decimal::new(10_000, 0));
//! ledger.record_income(1, Decimal::new(2_500, 0), "Feature completed").ok();
//! ledger.record_expense(2, Decimal::new(500, 0), "Hiring bonus").ok();
//!
//! assert_eq!(ledger.balance(), Decimal::new(12_000, 0));
//! assert_eq!(ledger.reconcile(), ReconcileResult::Balanced);
//! ```
//!
//! [`MoneyTransaction`]: kanban_types::MoneyTransaction

pub mod ledger;
pub mod reconcile;
pub mod transaction;

pub use ledger::{DEFAULT_INCOME_DESCRIPTION, EconomyLedger};
pub use reconcile::ReconcileResult;
pub use transaction::TransactionBuilder;

use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording ledger entries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Amount must be non-zero.
    #[error("transaction amount must be non-zero")]
    ZeroAmount,

    /// Amount must not be negative; direction is carried by the entry type.
    #[error("transaction amount must be positive, got {amount}")]
    NegativeAmount {
        /// The invalid amount.
        amount: Decimal,
    },

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The balance computation overflowed.
    #[error("balance overflow while applying {amount}")]
    Overflow {
        /// The amount being applied.
        amount: Decimal,
    },

    /// An internal error that should not occur in normal operation.
    #[error("internal ledger error: {0}")]
    InternalError(&'static str),
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A mismatch between the stored balance and the transaction log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// Balance the log implies.
    pub expected: Decimal,
    /// Balance actually stored.
    pub actual: Decimal,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
