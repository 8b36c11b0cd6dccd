use serde::{Deserialize, Serialize};

use super::{Amount, Transaction, TransactionId, TransactionType};

/// The whole collection of transactions, in insertion order.
/// This is exactly the document persisted by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    /// Next free identifier: one past the highest id in use, starting at 1.
    /// Must be computed on a freshly loaded ledger right before appending.
    pub fn next_id(&self) -> TransactionId {
        self.transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Sum of amounts for one transaction type.
    /// Saturates at `Decimal::MAX` for hand-edited files holding absurd amounts.
    pub fn total(&self, transaction_type: TransactionType) -> Amount {
        self.transactions
            .iter()
            .filter(|t| t.transaction_type() == transaction_type)
            .fold(Amount::ZERO, |total, t| total.saturating_add(t.amount))
    }
}

impl IntoIterator for Ledger {
    type Item = Transaction;
    type IntoIter = std::vec::IntoIter<Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.into_iter()
    }
}
