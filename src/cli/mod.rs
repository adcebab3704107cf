//! Command-line surface over [`Ledger`].

pub mod interactive;

use std::{io::Write, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::{
    csv::{self as table, LineEnding},
    Ledger, Record, SearchQuery, Summary, UpdateRequest, UpdateResult,
};

/// Personal finance wallet backed by a CSV file
#[derive(Parser)]
#[command(name = "wallet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the CSV ledger (must already contain a header line)
    #[arg(short, long, env = "WALLET_FILE")]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the balance together with total income and expenses
    Balance,

    /// Append a new income or expense record
    Add {
        date: String,
        /// `Income` or `Expense`
        category: String,
        amount: String,
        description: String,
    },

    /// Edit every record on a date
    Edit {
        date: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Find records by date, category or amount
    Search {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        amount: Option<String>,
    },

    /// Menu-driven session (the default without a subcommand)
    Interactive,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let ledger = Ledger::new(cli.file);
    let mut out = std::io::stdout().lock();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Balance => {
            let summary = ledger
                .summarize()
                .with_context(|| format!("failed to summarize {}", ledger.path().display()))?;
            write_summary(&mut out, &summary)?;
        }
        Commands::Add {
            date,
            category,
            amount,
            description,
        } => {
            ledger
                .append(&Record::new(date, category, amount, description))
                .with_context(|| format!("failed to append to {}", ledger.path().display()))?;
            writeln!(out, "New record added.")?;
        }
        Commands::Edit {
            date,
            category,
            amount,
            description,
        } => {
            let request = UpdateRequest {
                date,
                category,
                amount,
                description,
            };
            let result = ledger
                .update(&request)
                .with_context(|| format!("failed to update {}", ledger.path().display()))?;
            write_update(&mut out, &result)?;
        }
        Commands::Search {
            date,
            category,
            amount,
        } => {
            let query = SearchQuery {
                date,
                category,
                amount,
            };
            let found = ledger
                .search(&query)
                .with_context(|| format!("failed to search {}", ledger.path().display()))?;
            write_records(&mut out, &found)?;
        }
        Commands::Interactive => {
            interactive::run(&ledger, out)?;
        }
    }

    Ok(())
}

pub(crate) fn write_summary(out: &mut impl Write, summary: &Summary) -> std::io::Result<()> {
    writeln!(out, "Balance: {}", summary.balance)?;
    writeln!(out, "Income: {}", summary.income)?;
    writeln!(out, "Expenses: {}", summary.expenses)
}

pub(crate) fn write_update(out: &mut impl Write, result: &UpdateResult) -> std::io::Result<()> {
    if result.updated {
        writeln!(out, "Updated {} record(s).", result.matched)
    } else {
        writeln!(out, "No record found for that date.")
    }
}

pub(crate) fn write_records(out: &mut impl Write, records: &[Record]) -> anyhow::Result<()> {
    if records.is_empty() {
        writeln!(out, "No records found.")?;
    }
    for record in records {
        out.write_all(&table::encode(record, LineEnding::Lf)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edit_with_optional_fields() {
        let cli = Cli::try_parse_from([
            "wallet",
            "--file",
            "finances.csv",
            "edit",
            "2024-06-01",
            "--amount",
            "1750",
        ])
        .unwrap();

        assert_eq!(cli.file, PathBuf::from("finances.csv"));
        assert!(matches!(
            cli.command,
            Some(Commands::Edit { amount: Some(ref amount), category: None, .. }) if amount == "1750"
        ));
    }

    #[test]
    fn writes_records_as_csv() {
        let mut out = Vec::new();

        write_records(
            &mut out,
            &[Record::new("2024-06-02", "Income", "20000", "Salary")],
        )
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "2024-06-02,Income,20000,Salary\n");
    }

    #[test]
    fn writes_not_found_messages() {
        let mut out = Vec::new();

        write_records(&mut out, &[]).unwrap();
        write_update(&mut out, &UpdateResult::default()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No records found.\nNo record found for that date.\n"
        );
    }
}
