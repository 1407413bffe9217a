//! The economy ledger: money balance plus an append-only transaction log.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified; only [`reset`] clears them.
//! - **Single balance**: there is one game-wide money pool.
//! - **Precision**: all amounts use [`Decimal`] -- no floating point.
//!
//! [`reset`]: EconomyLedger::reset

use rust_decimal::Decimal;
use tracing::debug;

use kanban_types::{MoneyTransaction, TransactionType};

use crate::reconcile::{ReconcileResult, verify_balance};
use crate::{LedgerError, TransactionBuilder};

/// Description used by [`EconomyLedger::add_money`] when none is given.
pub const DEFAULT_INCOME_DESCRIPTION: &str = "Feature completed";

/// The game's money balance and every transaction that moved it.
#[derive(Debug, Clone)]
pub struct EconomyLedger {
    /// All entries, in insertion order.
    entries: Vec<MoneyTransaction>,
    /// Current balance.
    balance: Decimal,
    /// Balance at the last re-baseline.
    baseline: Decimal,
    /// Number of entries that predate the last re-baseline.
    baseline_index: usize,
}

impl EconomyLedger {
    /// Create a ledger holding `starting_money` and no transactions.
    pub const fn new(starting_money: Decimal) -> Self {
        Self {
            entries: Vec::new(),
            balance: starting_money,
            baseline: starting_money,
            baseline_index: 0,
        }
    }

    /// Current balance.
    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// Every recorded transaction, oldest first.
    pub fn transactions(&self) -> &[MoneyTransaction] {
        &self.entries
    }

    /// Number of recorded transactions.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no transaction has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record money received.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the amount is not strictly positive or the
    /// balance would overflow.
    pub fn record_income(
        &mut self,
        day: u64,
        amount: Decimal,
        description: &str,
    ) -> Result<&MoneyTransaction, LedgerError> {
        self.record(day, TransactionType::Income, amount, description)
    }

    /// Record money spent. The balance may go negative.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the amount is not strictly positive or the
    /// balance would overflow.
    pub fn record_expense(
        &mut self,
        day: u64,
        amount: Decimal,
        description: &str,
    ) -> Result<&MoneyTransaction, LedgerError> {
        self.record(day, TransactionType::Expense, amount, description)
    }

    /// Apply a signed adjustment: positive amounts are recorded as income,
    /// negative amounts as an expense of the absolute value.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAmount`] for a zero adjustment.
    pub fn add_money(
        &mut self,
        day: u64,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<&MoneyTransaction, LedgerError> {
        let description = description.unwrap_or(DEFAULT_INCOME_DESCRIPTION);
        if amount.is_sign_negative() && !amount.is_zero() {
            self.record_expense(day, amount.abs(), description)
        } else {
            self.record_income(day, amount, description)
        }
    }

    /// Overwrite the balance without recording a transaction.
    ///
    /// Reconciliation restarts from the new balance.
    pub fn set_money(&mut self, amount: Decimal) {
        debug!(old = %self.balance, new = %amount, "Balance overridden");
        self.balance = amount;
        self.baseline = amount;
        self.baseline_index = self.entries.len();
    }

    /// Drop every transaction and restore `starting_money`.
    pub fn reset(&mut self, starting_money: Decimal) {
        *self = Self::new(starting_money);
    }

    /// Sum of every amount of the given direction.
    pub fn total(&self, kind: TransactionType) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
    }

    /// Check the balance against the log since the last baseline.
    pub fn reconcile(&self) -> ReconcileResult {
        let since = self.entries.get(self.baseline_index..).unwrap_or_default();
        verify_balance(self.baseline, since, self.balance)
    }

    fn record(
        &mut self,
        day: u64,
        kind: TransactionType,
        amount: Decimal,
        description: &str,
    ) -> Result<&MoneyTransaction, LedgerError> {
        let entry = TransactionBuilder::new(day, kind)
            .amount(amount)
            .description(description.to_owned())
            .build()?;

        let balance = match kind {
            TransactionType::Income => self.balance.checked_add(amount),
            TransactionType::Expense => self.balance.checked_sub(amount),
        }
        .ok_or(LedgerError::Overflow { amount })?;

        debug!(day, ?kind, %amount, %balance, "Transaction recorded");
        self.balance = balance;
        self.entries.push(entry);

        self.entries.last().ok_or(LedgerError::InternalError(
            "failed to retrieve entry after append",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn income_increases_balance() {
        let mut ledger = EconomyLedger::new(money(10_000));
        assert!(ledger.record_income(1, money(500), "Delivery").is_ok());
        assert_eq!(ledger.balance(), money(10_500));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn expense_may_go_negative() {
        let mut ledger = EconomyLedger::new(money(100));
        assert!(ledger.record_expense(1, money(300), "Overtime").is_ok());
        assert_eq!(ledger.balance(), money(-200));
        assert_eq!(ledger.reconcile(), ReconcileResult::Balanced);
    }

    #[test]
    fn rejected_entry_leaves_balance_untouched() {
        let mut ledger = EconomyLedger::new(money(100));
        assert!(ledger.record_income(1, Decimal::ZERO, "nothing").is_err());
        assert_eq!(ledger.balance(), money(100));
        assert!(ledger.is_empty());
    }

    #[test]
    fn add_money_uses_default_description() {
        let mut ledger = EconomyLedger::new(Decimal::ZERO);
        let description = ledger
            .add_money(2, money(40), None)
            .ok()
            .map(|e| e.description.clone());
        assert_eq!(description.as_deref(), Some(DEFAULT_INCOME_DESCRIPTION));
    }

    #[test]
    fn add_money_negative_is_expense() {
        let mut ledger = EconomyLedger::new(money(100));
        let kind = ledger
            .add_money(2, money(-40), Some("Penalty"))
            .ok()
            .map(|e| (e.kind, e.amount));
        assert_eq!(kind, Some((TransactionType::Expense, money(40))));
        assert_eq!(ledger.balance(), money(60));
    }

    #[test]
    fn add_money_zero_rejected() {
        let mut ledger = EconomyLedger::new(money(100));
        let err = ledger.add_money(1, Decimal::ZERO, None).err();
        assert!(matches!(err, Some(LedgerError::ZeroAmount)));
    }

    #[test]
    fn set_money_rebaselines_without_transaction() {
        let mut ledger = EconomyLedger::new(money(100));
        assert!(ledger.record_income(1, money(50), "Delivery").is_ok());
        ledger.set_money(money(5));
        assert_eq!(ledger.balance(), money(5));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.reconcile(), ReconcileResult::Balanced);

        assert!(ledger.record_income(2, money(10), "Delivery").is_ok());
        assert_eq!(ledger.balance(), money(15));
        assert_eq!(ledger.reconcile(), ReconcileResult::Balanced);
    }

    #[test]
    fn reset_clears_log() {
        let mut ledger = EconomyLedger::new(money(100));
        assert!(ledger.record_income(1, money(50), "Delivery").is_ok());
        ledger.reset(money(10_000));
        assert!(ledger.is_empty());
        assert_eq!(ledger.balance(), money(10_000));
    }

    #[test]
    fn totals_by_direction() {
        let mut ledger = EconomyLedger::new(Decimal::ZERO);
        assert!(ledger.record_income(1, money(50), "a").is_ok());
        assert!(ledger.record_income(1, money(25), "b").is_ok());
        assert!(ledger.record_expense(1, money(5), "c").is_ok());
        assert_eq!(ledger.total(TransactionType::Income), money(75));
        assert_eq!(ledger.total(TransactionType::Expense), money(5));
    }
}
