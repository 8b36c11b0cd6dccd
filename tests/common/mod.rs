// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use pocketbook::application::LedgerService;
use tempfile::TempDir;

/// Helper to create a test service backed by a data file in a temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(data_file(&temp_dir));
    Ok((service, temp_dir))
}

/// Data file location used by `test_service`
pub fn data_file(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("data").join("transactions.json")
}

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: a small household ledger spread over two months
pub struct StandardTransactions;

impl StandardTransactions {
    /// Records, in order:
    /// 1 income  Salary    3000   Job        2024-01-01
    /// 2 expense Rent      1200   Housing    2024-01-02
    /// 3 expense Groceries  85.40 Food       2024-01-10
    /// 4 income  Lunch     12.00  Gift       2024-01-15
    /// 5 expense Dinner     42.10 Food       2024-02-03
    /// 6 income  Invoice    640   Freelance  2024-02-20
    pub fn create(service: &LedgerService) -> Result<()> {
        service.add_income("Salary", "3000", Some("Job"), Some("2024-01-01"))?;
        service.add_expense("Rent", "1200", Some("Housing"), Some("2024-01-02"))?;
        service.add_expense("Groceries", "85.40", Some("Food"), Some("2024-01-10"))?;
        service.add_income("Lunch", "12.00", Some("Gift"), Some("2024-01-15"))?;
        service.add_expense("Dinner", "42.10", Some("Food"), Some("2024-02-03"))?;
        service.add_income("Invoice", "640", Some("Freelance"), Some("2024-02-20"))?;
        Ok(())
    }
}
