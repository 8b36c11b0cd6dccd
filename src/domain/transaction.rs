use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Amount;

pub type TransactionId = u64;

/// Label applied when the caller does not name a category or source.
pub const DEFAULT_LABEL: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in (salary, gifts, refunds)
    Income,
    /// Money going out (groceries, rent, subscriptions)
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Name of the label field for this type ("category" or "source")
    pub fn label_name(&self) -> &'static str {
        match self {
            TransactionType::Income => "source",
            TransactionType::Expense => "category",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The type of a transaction together with its label.
/// Serialized inline as `"type": "expense", "category": ...` or
/// `"type": "income", "source": ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kind {
    #[serde(alias = "Expense")]
    Expense { category: String },
    #[serde(alias = "Income")]
    Income { source: String },
}

impl Kind {
    pub fn new(transaction_type: TransactionType, label: impl Into<String>) -> Self {
        match transaction_type {
            TransactionType::Expense => Kind::Expense {
                category: label.into(),
            },
            TransactionType::Income => Kind::Income {
                source: label.into(),
            },
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Kind::Expense { .. } => TransactionType::Expense,
            Kind::Income { .. } => TransactionType::Income,
        }
    }

    /// The category for expenses, the source for income.
    pub fn label(&self) -> &str {
        match self {
            Kind::Expense { category } => category,
            Kind::Income { source } => source,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Kind::Expense { category } => Some(category),
            Kind::Income { .. } => None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Kind::Income { source } => Some(source),
            Kind::Expense { .. } => None,
        }
    }
}

/// A single income or expense record.
/// Transactions are append-only: once persisted they are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(flatten)]
    pub kind: Kind,
    pub description: String,
    /// Always positive
    pub amount: Amount,
    /// Calendar date the transaction applies to
    pub date: NaiveDate,
}

impl Transaction {
    /// Create a transaction dated today. The id must be assigned from the
    /// freshly loaded ledger (see `Ledger::next_id`).
    pub fn new(
        id: TransactionId,
        kind: Kind,
        description: impl Into<String>,
        amount: Amount,
    ) -> Self {
        assert!(amount > Amount::ZERO, "Transaction amount must be positive");
        Self {
            id,
            kind,
            description: description.into(),
            amount,
            date: Local::now().date_naive(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }

    pub fn label(&self) -> &str {
        self.kind.label()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn coffee() -> Transaction {
        Transaction::new(1, Kind::new(TransactionType::Expense, "Food"), "Coffee", dec!(5.50))
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn test_create_transaction() {
        let tx = coffee();

        assert_eq!(tx.id, 1);
        assert_eq!(tx.transaction_type(), TransactionType::Expense);
        assert_eq!(tx.label(), "Food");
        assert_eq!(tx.kind.category(), Some("Food"));
        assert_eq!(tx.kind.source(), None);
    }

    #[test]
    fn test_new_transaction_is_dated_today() {
        let tx = Transaction::new(3, Kind::new(TransactionType::Income, "Job"), "Salary", dec!(1));
        assert_eq!(tx.date, Local::now().date_naive());
    }

    #[test]
    #[should_panic(expected = "Transaction amount must be positive")]
    fn test_transaction_requires_positive_amount() {
        Transaction::new(1, Kind::new(TransactionType::Expense, "Food"), "Bad", dec!(0));
    }

    #[test]
    fn test_expense_json_layout() {
        let value = serde_json::to_value(coffee()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "type": "expense",
                "category": "Food",
                "description": "Coffee",
                "amount": 5.5,
                "date": "2024-03-01"
            })
        );
    }

    #[test]
    fn test_income_reads_source_field() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id": 7, "type": "income", "description": "Salary",
                "amount": 1000, "source": "Job", "date": "2024-01-31"}"#,
        )
        .unwrap();

        assert_eq!(tx.id, 7);
        assert_eq!(tx.kind, Kind::Income { source: "Job".into() });
        assert_eq!(tx.amount, dec!(1000));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_capitalized_type_tag_is_accepted() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id": 2, "type": "Expense", "description": "Bus",
                "amount": 2.5, "category": "Travel", "date": "2024-01-02"}"#,
        )
        .unwrap();

        assert_eq!(tx.transaction_type(), TransactionType::Expense);
        assert_eq!(tx.label(), "Travel");
    }

    #[test]
    fn test_transaction_type_names() {
        assert_eq!(TransactionType::Expense.to_string(), "expense");
        assert_eq!(TransactionType::Income.as_str(), "income");
        assert_eq!(TransactionType::Expense.label_name(), "category");
        assert_eq!(TransactionType::Income.label_name(), "source");
    }
}
