use std::{
    fs,
    path::{Path, PathBuf},
};

use csv::StringRecord;
use log::{debug, trace};

use crate::{
    csv::{self as table, LineEnding},
    domain::{
        error::Error,
        query::{SearchQuery, UpdateRequest, UpdateResult},
        record::Record,
        summary::{Entry, Summary},
    },
    error::Result,
    fs as atomic,
};

/// A CSV file of [`Record`]s.
///
/// Nothing is cached: every operation reads the whole file and releases it before returning.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Balance, income and expenses over every data row.
    ///
    /// Rows with category `Expense` are expenses, every other category counts as income.
    /// Fails on the first row that is too short or whose amount is not a non-negative integer.
    pub fn summarize(&self) -> Result<Summary> {
        let content = fs::read(&self.path)?;
        let parsed = table::read(&content)?;

        let entries = parsed
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let line = parsed.line_of(index);
                if row.len() < 3 {
                    return Err(Error::MalformedRecord {
                        line,
                        reason: format!("expected at least 3 fields, found {}", row.len()),
                    });
                }

                let record = Record::from_fields(row);
                Entry::parse(line, record.kind(), &record.amount)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let summary = Summary::from_entries(entries)?;
        debug!(
            "summarized {} rows of {}: {summary:?}",
            parsed.rows.len(),
            self.path.display()
        );

        Ok(summary)
    }

    /// Append one record at the end of the file, leaving existing rows untouched.
    pub fn append(&self, record: &Record) -> Result<()> {
        let content = fs::read(&self.path)?;
        // Refuse to turn a record into the header of an empty file.
        table::read(&content)?;

        let ending = LineEnding::detect(&content);
        let mut line = Vec::new();
        if !table::is_terminated(&content) {
            line.extend_from_slice(ending.as_bytes());
        }
        line.extend(table::encode(record, ending)?);

        atomic::append(&self.path, &line)?;
        debug!("appended {record:?} to {}", self.path.display());

        Ok(())
    }

    /// Overwrite the supplied fields of every record dated `request.date`.
    ///
    /// The file is rewritten only when a record actually changes.
    pub fn update(&self, request: &UpdateRequest) -> Result<UpdateResult> {
        let content = fs::read(&self.path)?;
        let ending = LineEnding::detect(&content);
        let mut parsed = table::read(&content)?;

        let mut result = UpdateResult::default();
        let mut changed = false;

        for row in parsed.rows.iter_mut() {
            let mut record = Record::from_fields(&*row);
            if !request.matches(&record) {
                continue;
            }

            result.matched += 1;
            if request.apply(&mut record) {
                trace!("updating row {row:?} to {record:?}");
                *row = rebuild(&record, row);
                changed = true;
            }
        }
        result.updated = result.matched > 0;

        if changed {
            atomic::replace(&self.path, &table::write(&parsed, ending)?)?;
        }
        debug!(
            "update of {} matched {} rows, rewrote file: {changed}",
            request.date, result.matched
        );

        Ok(result)
    }

    /// Records matching any supplied criterion of `query`, in file order, each at most once.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<Record>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let content = fs::read(&self.path)?;
        let parsed = table::read(&content)?;
        let found: Vec<_> = parsed
            .rows
            .iter()
            .map(Record::from_fields)
            .filter(|record| query.matches(record))
            .collect();

        debug!("search {query:?} found {} records", found.len());

        Ok(found)
    }
}

/// Row for an updated record, keeping any cells past the fourth as they were.
fn rebuild(record: &Record, original: &StringRecord) -> StringRecord {
    record
        .fields()
        .into_iter()
        .chain(original.iter().skip(4))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn ledger_with(content: &str) -> (TempDir, Ledger) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("finances.csv");
        fs::write(&path, content).unwrap();
        (dir, Ledger::new(path))
    }

    #[test]
    fn summarize_reports_short_rows_with_line() {
        let (_dir, ledger) =
            ledger_with("date,category,amount,description\n2024-06-01,Income,5,a\n2024-06-02,Expense\n");

        let err = ledger.summarize().unwrap_err();

        assert!(matches!(
            err,
            crate::error::Error::BusinessError(Error::MalformedRecord { line: 3, .. })
        ));
    }

    #[test]
    fn summarize_reports_line_in_carriage_return_files() {
        let (_dir, ledger) = ledger_with(
            "date,category,amount,description\r2024-06-01,Income,5,a\r2024-06-02,Expense,3,b\r2024-06-03,Expense,oops,c\r",
        );

        let err = ledger.summarize().unwrap_err();

        assert!(matches!(
            err,
            crate::error::Error::BusinessError(Error::MalformedRecord { line: 4, .. })
        ));
    }

    #[test]
    fn append_adds_missing_terminator_first() {
        let (_dir, ledger) = ledger_with("date,category,amount,description");

        ledger
            .append(&Record::new("2024-06-05", "Income", "100", "Gift"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "date,category,amount,description\n2024-06-05,Income,100,Gift\n"
        );
    }

    #[test]
    fn append_reuses_bare_carriage_returns() {
        let (_dir, ledger) = ledger_with("date,category,amount,description\r2024-06-01,Expense,1,a\r");

        ledger
            .append(&Record::new("2024-06-05", "Income", "100", "Gift"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "date,category,amount,description\r2024-06-01,Expense,1,a\r2024-06-05,Income,100,Gift\r"
        );
    }

    #[test]
    fn append_refuses_empty_file() {
        let (_dir, ledger) = ledger_with("");

        let err = ledger
            .append(&Record::new("2024-06-05", "Income", "100", "Gift"))
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::Error::BusinessError(Error::MissingHeader)
        ));
        assert_eq!(fs::read_to_string(ledger.path()).unwrap(), "");
    }

    #[test]
    fn update_pads_short_rows_and_keeps_extra_cells() {
        let (_dir, ledger) = ledger_with(
            "date,category,amount,description\n2024-06-01,Expense\n2024-06-02,Income,5,x,note\n",
        );

        ledger
            .update(&UpdateRequest::new("2024-06-01").description("Bread"))
            .unwrap();
        ledger
            .update(&UpdateRequest::new("2024-06-02").amount("7"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "date,category,amount,description\n2024-06-01,Expense,,Bread\n2024-06-02,Income,7,x,note\n"
        );
    }

    #[test]
    fn update_never_matches_header() {
        let (_dir, ledger) = ledger_with("date,category,amount,description\n2024-06-01,Expense,1,a\n");

        let result = ledger
            .update(&UpdateRequest::new("date").category("Income"))
            .unwrap();

        assert!(!result.updated);
        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "date,category,amount,description\n2024-06-01,Expense,1,a\n"
        );
    }

    #[test]
    fn update_without_changes_leaves_file_alone() {
        let (_dir, ledger) = ledger_with("date,category,amount,description\r\n2024-06-01,Expense,1,a");

        let result = ledger
            .update(&UpdateRequest::new("2024-06-01").amount("1"))
            .unwrap();

        assert_eq!(
            result,
            UpdateResult {
                updated: true,
                matched: 1,
            }
        );
        assert_eq!(
            fs::read_to_string(ledger.path()).unwrap(),
            "date,category,amount,description\r\n2024-06-01,Expense,1,a"
        );
    }

    #[test]
    fn search_pads_short_rows() {
        let (_dir, ledger) = ledger_with("date,category,amount,description\n2024-06-01,Expense\n");

        let found = ledger
            .search(&SearchQuery::new().category("Expense"))
            .unwrap();

        assert_eq!(found, vec![Record::new("2024-06-01", "Expense", "", "")]);
    }
}
