//! Transaction builder and validation for the economy ledger.
//!
//! Provides a [`TransactionBuilder`] that rejects zero and negative amounts
//! and requires a description before producing a [`MoneyTransaction`].

use chrono::Utc;
use rust_decimal::Decimal;

use kanban_types::{MoneyTransaction, TransactionId, TransactionType};

use crate::LedgerError;

// ---------------------------------------------------------------------------
// Transaction builder
// ---------------------------------------------------------------------------

/// Builder for constructing validated [`MoneyTransaction`] values.
///
/// # Examples
///
/// ```
/// use kanban_ledger::TransactionBuilder;
/// use kanban_types::TransactionType;
/// use rust_decimal::Decimal;
///
/// let entry = TransactionBuilder::new(3, TransactionType::Income)
///     .amount(Decimal::new(1_500, 0))
///     .description("Feature completed: Login".to_owned())
///     .build();
///
/// assert!(entry.is_ok());
/// ```
#[derive(Debug)]
pub struct TransactionBuilder {
    day: u64,
    kind: TransactionType,
    amount: Option<Decimal>,
    description: Option<String>,
}

impl TransactionBuilder {
    /// Start building a transaction for the given day and direction.
    pub const fn new(day: u64, kind: TransactionType) -> Self {
        Self {
            day,
            kind,
            amount: None,
            description: None,
        }
    }

    /// Set the amount. Must be strictly positive.
    #[must_use]
    pub const fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the human-readable description.
    #[must_use]
    pub fn description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    /// Validate inputs and produce a [`MoneyTransaction`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MissingField`] if the amount or description is
    /// missing, [`LedgerError::ZeroAmount`] for a zero amount and
    /// [`LedgerError::NegativeAmount`] for a negative one.
    pub fn build(self) -> Result<MoneyTransaction, LedgerError> {
        let amount = self.amount.ok_or(LedgerError::MissingField("amount"))?;
        let description = self
            .description
            .ok_or(LedgerError::MissingField("description"))?;

        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if amount.is_sign_negative() {
            return Err(LedgerError::NegativeAmount { amount });
        }

        Ok(MoneyTransaction {
            id: TransactionId::new(),
            day: self.day,
            kind: self.kind,
            amount,
            description,
            created_at: Utc::now(),
        })
    }
}
