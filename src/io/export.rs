use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::LedgerService;
use crate::domain::Transaction;

/// Full ledger snapshot written by `export --format json`.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export every transaction to CSV format
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.all_transactions();
        write_transactions_csv(&transactions, writer)
    }

    /// Export every transaction as a JSON snapshot
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            transactions: self.service.all_transactions(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

/// Write transactions as CSV rows, one per transaction, with a header.
pub fn write_transactions_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["id", "date", "type", "description", "amount", "category", "source"])?;

    for transaction in transactions {
        csv_writer.write_record([
            transaction.id.to_string(),
            transaction.date.to_string(),
            transaction.transaction_type().to_string(),
            transaction.description.clone(),
            transaction.amount.to_string(),
            transaction.kind.category().unwrap_or_default().to_string(),
            transaction.kind.source().unwrap_or_default().to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(transactions.len())
}
