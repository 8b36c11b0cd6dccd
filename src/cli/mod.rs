use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{
    DEFAULT_LIST_LIMIT, LedgerService, Listing, Summary, TransactionFilter,
};
use crate::domain::{Amount, Transaction, format_amount};
use crate::storage::Store;

/// Pocketbook - Personal Income & Expense Tracker
///
/// Transactions live in a single JSON file. The file is not locked: running
/// two commands that write at the same time can lose one of the writes.
#[derive(Parser)]
#[command(name = "pocketbook")]
#[command(about = "A local-first income and expense tracker")]
#[command(version)]
pub struct Cli {
    /// Data file path (defaults to data/transactions.json next to the executable)
    #[arg(short, long, global = true, env = "POCKETBOOK_FILE")]
    pub file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record an expense
    AddExpense {
        /// What the money was spent on
        description: String,

        /// Amount spent (e.g., "5.50" or "12")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Expense category (e.g., "Food", "Rent")
        #[arg(short, long)]
        category: Option<String>,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record an income
    AddIncome {
        /// Where the money came from
        description: String,

        /// Amount received (e.g., "1000" or "49.99")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Income source (e.g., "Job", "Freelance")
        #[arg(short, long)]
        source: Option<String>,

        /// Date of the income (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show total income, expenses and balance
    Summary {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List recent transactions
    List {
        /// Number of most recent transactions to show
        #[arg(long = "last", default_value_t = DEFAULT_LIST_LIMIT)]
        last: usize,

        /// Filter expenses by category
        #[arg(long)]
        category: Option<String>,

        /// Filter income by source
        #[arg(long)]
        source: Option<String>,

        /// Filter from date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<String>,

        /// Filter to date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to_date: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export all transactions to CSV or JSON
    Export {
        /// Format: csv, json
        #[arg(short = 'F', long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify the data file
    Check,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_logging(self.verbose);

        let path = self.file.unwrap_or_else(Store::default_path);
        let service = LedgerService::open(path);

        match self.command {
            Commands::AddExpense {
                description,
                amount,
                category,
                date,
            } => {
                let tx = service.add_expense(
                    &description,
                    &amount,
                    category.as_deref(),
                    date.as_deref(),
                )?;
                println!(
                    "Added expense: {} ${} [{}] on {} (#{})",
                    tx.description,
                    format_amount(tx.amount),
                    tx.label(),
                    tx.date,
                    tx.id
                );
            }

            Commands::AddIncome {
                description,
                amount,
                source,
                date,
            } => {
                let tx = service.add_income(
                    &description,
                    &amount,
                    source.as_deref(),
                    date.as_deref(),
                )?;
                println!(
                    "Added income: {} ${} [{}] on {} (#{})",
                    tx.description,
                    format_amount(tx.amount),
                    tx.label(),
                    tx.date,
                    tx.id
                );
            }

            Commands::Summary { format } => {
                run_summary_command(&service, &format)?;
            }

            Commands::List {
                last,
                category,
                source,
                from_date,
                to_date,
                format,
            } => {
                let filter = TransactionFilter {
                    limit: last,
                    category,
                    source,
                    from_date,
                    to_date,
                };
                run_list_command(&service, &filter, &format)?;
            }

            Commands::Export { format, output } => {
                run_export_command(&service, &format, output)?;
            }

            Commands::Check => {
                run_check_command(&service)?;
            }
        }

        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

fn run_summary_command(service: &LedgerService, format: &str) -> Result<()> {
    let summary = service.summarize();

    match format {
        "table" => print_summary(&summary),
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json", format),
    }
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("{:<16} {:>14}", "Total Income:", dollars(summary.total_income));
    println!("{:<16} {:>14}", "Total Expenses:", dollars(summary.total_expense));
    println!("{}", "-".repeat(31));
    println!("{:<16} {:>14}", "Net Balance:", dollars(summary.net_balance));

    if !summary.by_category.is_empty() {
        println!();
        println!("Expenses by category:");
        for entry in &summary.by_category {
            println!(
                "  {:<20} {:>14}  ({})",
                truncate(&entry.label, 20),
                dollars(entry.total),
                entry.count
            );
        }
    }

    if !summary.by_source.is_empty() {
        println!();
        println!("Income by source:");
        for entry in &summary.by_source {
            println!(
                "  {:<20} {:>14}  ({})",
                truncate(&entry.label, 20),
                dollars(entry.total),
                entry.count
            );
        }
    }
}

fn run_list_command(service: &LedgerService, filter: &TransactionFilter, format: &str) -> Result<()> {
    if !matches!(format, "table" | "json" | "csv") {
        anyhow::bail!("Invalid format '{}'. Valid formats: table, json, csv", format);
    }

    let listing = service.list(filter)?;

    match format {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(listing.transactions())?
        ),
        "csv" => {
            crate::io::write_transactions_csv(listing.transactions(), std::io::stdout())?;
        }
        _ => match listing {
            Listing::EmptyLedger => println!("No transactions found."),
            Listing::Filtered(transactions) if transactions.is_empty() => {
                println!("No matching transactions.")
            }
            Listing::Filtered(transactions) => print_transactions(&transactions),
        },
    }
    Ok(())
}

fn print_transactions(transactions: &[Transaction]) {
    println!(
        "{:<5} {:<10} {:<8} {:<24} {:>14} CATEGORY/SOURCE",
        "ID", "DATE", "TYPE", "DESCRIPTION", "AMOUNT"
    );
    println!("{}", "-".repeat(80));

    for tx in transactions {
        println!(
            "{:<5} {:<10} {:<8} {:<24} {:>14} {}",
            tx.id,
            tx.date,
            tx.transaction_type(),
            truncate(&tx.description, 24),
            dollars(tx.amount),
            truncate(tx.label(), 16)
        );
    }
}

fn run_export_command(service: &LedgerService, format: &str, output: Option<PathBuf>) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        "csv" => {
            let count = exporter.export_transactions_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "json" => {
            let snapshot = exporter.export_json(writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", snapshot.transactions.len());
            }
        }
        _ => {
            anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
        }
    }

    Ok(())
}

fn run_check_command(service: &LedgerService) -> Result<()> {
    println!("Checking {}...\n", service.store().path().display());

    let report = service.check_integrity()?;

    println!("Transactions: {}", report.transaction_count);
    println!("Next id:      {}", report.next_id);
    println!();

    if report.is_healthy() {
        println!("Data file is consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        anyhow::bail!("Data file check failed");
    }

    Ok(())
}

fn dollars(amount: Amount) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(abs) => format!("-${}", abs),
        None => format!("${}", formatted),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_dollars() {
        assert_eq!(dollars(dec!(994.5)), "$994.50");
        assert_eq!(dollars(dec!(-15.5)), "-$15.50");
        assert_eq!(dollars(dec!(1234567)), "$1,234,567.00");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Coffee", 24), "Coffee");
        assert_eq!(truncate("A very long description indeed", 10), "A very ...");
        assert_eq!(truncate("café au lait", 7), "café...");
    }

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::try_parse_from([
            "pocketbook",
            "--file",
            "ledger.json",
            "list",
            "--last",
            "3",
            "--category",
            "Food",
            "--from-date",
            "2024-01-01",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("ledger.json")));
        match cli.command {
            Commands::List {
                last,
                category,
                source,
                from_date,
                ..
            } => {
                assert_eq!(last, 3);
                assert_eq!(category.as_deref(), Some("Food"));
                assert_eq!(source, None);
                assert_eq!(from_date.as_deref(), Some("2024-01-01"));
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_negative_amount_reaches_validation() {
        let cli = Cli::try_parse_from(["pocketbook", "add-expense", "X", "-5", "--category", "Food"])
            .unwrap();

        match cli.command {
            Commands::AddExpense { amount, .. } => assert_eq!(amount, "-5"),
            _ => panic!("expected add-expense command"),
        }
    }
}
