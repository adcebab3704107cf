use itertools::{Either, Itertools};

use super::{
    error::{Error, Result},
    record::Category,
};

/// A parsed amount together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub line: u64,
    pub kind: Category,
    pub amount: i64,
}

impl Entry {
    /// Parse the amount cell of a data row.
    pub fn parse(line: u64, kind: Category, amount: &str) -> Result<Self> {
        let amount: i64 = amount.trim().parse().map_err(|err| Error::MalformedRecord {
            line,
            reason: format!("invalid amount {amount:?}: {err}"),
        })?;

        if amount < 0 {
            return Err(Error::MalformedRecord {
                line,
                reason: format!("negative amount {amount}"),
            });
        }

        Ok(Self { line, kind, amount })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub balance: i64,
    pub income: i64,
    pub expenses: i64,
}

impl Summary {
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self> {
        let (expenses, income): (Vec<_>, Vec<_>) =
            entries.into_iter().partition_map(|entry| match entry.kind {
                Category::Expense => Either::Left(entry),
                Category::Income => Either::Right(entry),
            });

        let income = total(&income)?;
        let expenses = total(&expenses)?;

        // Both totals are non-negative, so the difference fits.
        Ok(Summary {
            balance: income - expenses,
            income,
            expenses,
        })
    }
}

fn total(entries: &[Entry]) -> Result<i64> {
    entries.iter().try_fold(0i64, |sum, entry| {
        sum.checked_add(entry.amount)
            .ok_or(Error::AmountOverflow { line: entry.line })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(line: u64, kind: Category, amount: i64) -> Entry {
        Entry { line, kind, amount }
    }

    #[test]
    fn splits_income_and_expenses() {
        let summary = Summary::from_entries([
            entry(2, Category::Expense, 1500),
            entry(3, Category::Income, 20000),
            entry(4, Category::Expense, 1000),
        ])
        .unwrap();

        assert_eq!(
            summary,
            Summary {
                balance: 17500,
                income: 20000,
                expenses: 2500,
            }
        );
    }

    #[test]
    fn empty_ledger_is_zero() {
        assert_eq!(Summary::from_entries([]).unwrap(), Summary::default());
    }

    #[test]
    fn balance_can_go_negative() {
        let summary = Summary::from_entries([entry(2, Category::Expense, 300)]).unwrap();

        assert_eq!(summary.balance, -300);
        assert_eq!(summary.balance, summary.income - summary.expenses);
    }

    #[test]
    fn overflow_reports_offending_line() {
        let err = Summary::from_entries([
            entry(2, Category::Income, i64::MAX),
            entry(7, Category::Income, 1),
        ])
        .unwrap_err();

        assert!(matches!(err, Error::AmountOverflow { line: 7 }));
    }

    #[test]
    fn parse_trims_whitespace() {
        let parsed = Entry::parse(2, Category::Income, " 1500 ").unwrap();

        assert_eq!(parsed.amount, 1500);
    }

    #[test]
    fn parse_rejects_garbage_and_negatives() {
        assert!(matches!(
            Entry::parse(5, Category::Income, "12abc"),
            Err(Error::MalformedRecord { line: 5, .. })
        ));
        assert!(matches!(
            Entry::parse(6, Category::Expense, "-3"),
            Err(Error::MalformedRecord { line: 6, .. })
        ));
    }
}
