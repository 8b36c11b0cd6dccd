use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Amount, Ledger, TransactionId, TransactionType, max_amount};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_income: Amount,
    pub total_expense: Amount,
    pub net_balance: Amount,
    /// Expense totals per category, in order of first appearance
    pub by_category: Vec<LabelTotal>,
    /// Income totals per source, in order of first appearance
    pub by_source: Vec<LabelTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelTotal {
    pub label: String,
    pub total: Amount,
    pub count: usize,
}

impl Summary {
    pub fn category_total(&self, category: &str) -> Option<Amount> {
        find_total(&self.by_category, category)
    }

    pub fn source_total(&self, source: &str) -> Option<Amount> {
        find_total(&self.by_source, source)
    }
}

fn find_total(totals: &[LabelTotal], label: &str) -> Option<Amount> {
    totals.iter().find(|t| t.label == label).map(|t| t.total)
}

/// Aggregate income and expense totals for the whole ledger.
pub fn summarize(ledger: &Ledger) -> Summary {
    let total_income = ledger.total(TransactionType::Income);
    let total_expense = ledger.total(TransactionType::Expense);

    Summary {
        total_income,
        total_expense,
        net_balance: total_income.saturating_sub(total_expense),
        by_category: totals_by_label(ledger, TransactionType::Expense),
        by_source: totals_by_label(ledger, TransactionType::Income),
    }
}

fn totals_by_label(ledger: &Ledger, transaction_type: TransactionType) -> Vec<LabelTotal> {
    let mut totals: Vec<LabelTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for transaction in ledger
        .iter()
        .filter(|t| t.transaction_type() == transaction_type)
    {
        let label = transaction.label();
        match index.get(label) {
            Some(&i) => {
                totals[i].total = totals[i].total.saturating_add(transaction.amount);
                totals[i].count += 1;
            }
            None => {
                index.insert(label, totals.len());
                totals.push(LabelTotal {
                    label: label.to_string(),
                    total: transaction.amount,
                    count: 1,
                });
            }
        }
    }

    totals
}

/// Result of checking the data file for consistency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub transaction_count: usize,
    pub next_id: TransactionId,
    /// Ids used by more than one transaction
    pub duplicate_ids: Vec<TransactionId>,
    /// Transactions whose amount is zero or negative (hand-edited files)
    pub non_positive_amounts: Vec<TransactionId>,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn build_integrity_report(ledger: &Ledger) -> IntegrityReport {
    let mut seen: HashMap<TransactionId, usize> = HashMap::new();
    for transaction in ledger.iter() {
        *seen.entry(transaction.id).or_insert(0) += 1;
    }
    let mut duplicate_ids: Vec<TransactionId> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect();
    duplicate_ids.sort_unstable();

    let non_positive_amounts: Vec<TransactionId> = ledger
        .iter()
        .filter(|t| t.amount <= Amount::ZERO)
        .map(|t| t.id)
        .collect();

    let mut issues = Vec::new();
    for id in &duplicate_ids {
        issues.push(format!("Transaction id {} is used more than once", id));
    }
    for id in &non_positive_amounts {
        issues.push(format!("Transaction {} has a non-positive amount", id));
    }
    for transaction in ledger.iter().filter(|t| t.amount >= max_amount()) {
        issues.push(format!(
            "Transaction {} has an amount above the supported maximum",
            transaction.id
        ));
    }
    if ledger.iter().any(|t| t.id == 0) {
        issues.push("Transaction id 0 is not a valid identifier".to_string());
    }

    IntegrityReport {
        transaction_count: ledger.len(),
        next_id: ledger.next_id(),
        duplicate_ids,
        non_positive_amounts,
        issues,
    }
}
