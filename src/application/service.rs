use std::path::PathBuf;

use chrono::NaiveDate;
use log::{debug, info};

use crate::domain::{DEFAULT_LABEL, Kind, Ledger, Transaction, TransactionType};
use crate::storage::Store;

use super::validation::{parse_date, validate};
use super::{AppError, IntegrityReport, Summary, ValidationError, build_integrity_report, summarize};

/// Number of transactions `list` shows when no limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, tests, scripts).
///
/// The service keeps no state between calls: every operation loads the
/// ledger fresh from the store and mutations save it back in full.
pub struct LedgerService {
    store: Store,
}

/// Filter for listing transactions
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    /// Keep only the most recent `limit` matches
    pub limit: usize,
    /// Expense category to match (case-insensitive)
    pub category: Option<String>,
    /// Income source to match (case-insensitive)
    pub source: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`
    pub from_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    pub to_date: Option<String>,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            category: None,
            source: None,
            from_date: None,
            to_date: None,
        }
    }
}

/// Outcome of a listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// The ledger holds no transactions at all
    EmptyLedger,
    /// Transactions left after filtering and truncation (possibly none)
    Filtered(Vec<Transaction>),
}

impl Listing {
    pub fn transactions(&self) -> &[Transaction] {
        match self {
            Listing::EmptyLedger => &[],
            Listing::Filtered(transactions) => transactions,
        }
    }
}

impl LedgerService {
    /// Create a new ledger service with the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Open the ledger stored at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Store::new(path))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ========================
    // Recording
    // ========================

    /// Record an expense. The category defaults to "General".
    pub fn add_expense(
        &self,
        description: &str,
        amount: &str,
        category: Option<&str>,
        date: Option<&str>,
    ) -> Result<Transaction, AppError> {
        self.add(
            TransactionType::Expense,
            description,
            amount,
            category.unwrap_or(DEFAULT_LABEL),
            date,
        )
    }

    /// Record an income. The source defaults to "General".
    pub fn add_income(
        &self,
        description: &str,
        amount: &str,
        source: Option<&str>,
        date: Option<&str>,
    ) -> Result<Transaction, AppError> {
        self.add(
            TransactionType::Income,
            description,
            amount,
            source.unwrap_or(DEFAULT_LABEL),
            date,
        )
    }

    /// Validate, assign the next id and append a transaction.
    /// Invalid input never touches the data file.
    pub fn add(
        &self,
        transaction_type: TransactionType,
        description: &str,
        amount: &str,
        label: &str,
        date: Option<&str>,
    ) -> Result<Transaction, AppError> {
        let input = validate(transaction_type, description, amount, label)?;
        let date = date
            .map(|d| parse_date(d).ok_or_else(|| ValidationError::InvalidDate(d.to_string())))
            .transpose()?;

        let mut ledger = self.store.load();

        let mut transaction = Transaction::new(
            ledger.next_id(),
            Kind::new(transaction_type, input.label),
            input.description,
            input.amount,
        );
        if let Some(date) = date {
            transaction = transaction.with_date(date);
        }

        ledger.push(transaction.clone());
        self.store.save(&ledger).map_err(AppError::Persistence)?;

        info!(
            "Recorded {} #{} ({})",
            transaction.transaction_type(),
            transaction.id,
            transaction.amount
        );
        Ok(transaction)
    }

    // ========================
    // Queries
    // ========================

    /// All transactions in stored order.
    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.store.load().transactions
    }

    /// Income and expense totals plus per-label breakdowns.
    pub fn summarize(&self) -> Summary {
        summarize(&self.store.load())
    }

    /// List transactions matching `filter`, keeping the most recent `filter.limit`.
    ///
    /// A category filter drops all income and a source filter drops all
    /// expenses; when both are given a transaction is kept if either matches.
    pub fn list(&self, filter: &TransactionFilter) -> Result<Listing, AppError> {
        let from_date = parse_filter_date(filter.from_date.as_deref())?;
        let to_date = parse_filter_date(filter.to_date.as_deref())?;

        let ledger = self.store.load();
        if ledger.is_empty() {
            return Ok(Listing::EmptyLedger);
        }

        let category = filter.category.as_deref().map(str::to_lowercase);
        let source = filter.source.as_deref().map(str::to_lowercase);

        let mut matched: Vec<Transaction> = ledger
            .into_iter()
            .filter(|t| matches_label(t, category.as_deref(), source.as_deref()))
            .filter(|t| from_date.is_none_or(|from| t.date >= from))
            .filter(|t| to_date.is_none_or(|to| t.date <= to))
            .collect();

        let skip = matched.len().saturating_sub(filter.limit);
        matched.drain(..skip);

        debug!("Listing {} transactions", matched.len());
        Ok(Listing::Filtered(matched))
    }

    /// Strictly load the data file and check it for consistency problems.
    pub fn check_integrity(&self) -> Result<IntegrityReport, AppError> {
        let ledger: Ledger = self.store.try_load().map_err(AppError::CorruptData)?;
        Ok(build_integrity_report(&ledger))
    }
}

fn parse_filter_date(input: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    input
        .map(|d| parse_date(d).ok_or_else(|| AppError::DateFormat(d.to_string())))
        .transpose()
}

fn matches_label(transaction: &Transaction, category: Option<&str>, source: Option<&str>) -> bool {
    let category_matches = |wanted: &str| {
        transaction
            .kind
            .category()
            .is_some_and(|c| c.to_lowercase() == wanted)
    };
    let source_matches = |wanted: &str| {
        transaction
            .kind
            .source()
            .is_some_and(|s| s.to_lowercase() == wanted)
    };

    match (category, source) {
        (None, None) => true,
        (Some(c), None) => category_matches(c),
        (None, Some(s)) => source_matches(s),
        (Some(c), Some(s)) => category_matches(c) || source_matches(s),
    }
}
