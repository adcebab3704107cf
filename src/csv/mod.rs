use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::{
    domain::{error::Error, record::Record},
    error::Result,
};

/// Line terminator used by an existing ledger file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// Bare carriage return, as written by some spreadsheet exports.
    Cr,
}

impl LineEnding {
    /// Detect the terminator from the first line break in `content`.
    pub fn detect(content: &[u8]) -> Self {
        let Some(pos) = content.iter().position(|&b| matches!(b, b'\r' | b'\n')) else {
            return Self::default();
        };

        match (content[pos], content.get(pos + 1)) {
            (b'\r', Some(b'\n')) => Self::CrLf,
            (b'\r', _) => Self::Cr,
            _ => Self::Lf,
        }
    }

    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Lf => b"\n",
            Self::CrLf => b"\r\n",
            Self::Cr => b"\r",
        }
    }

    fn terminator(self) -> Terminator {
        match self {
            Self::Lf => Terminator::Any(b'\n'),
            Self::CrLf => Terminator::CRLF,
            Self::Cr => Terminator::Any(b'\r'),
        }
    }
}

/// Whether `content` already ends with a line break, so an appended row starts on its own line.
pub fn is_terminated(content: &[u8]) -> bool {
    matches!(content.last().copied(), Some(b'\r' | b'\n'))
}

/// A ledger file split into its header and raw data rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub header: StringRecord,
    pub rows: Vec<StringRecord>,
    lines: Vec<u64>,
}

impl Table {
    /// 1-based line number of the data row at `index`.
    pub fn line_of(&self, index: usize) -> u64 {
        self.lines
            .get(index)
            .copied()
            .unwrap_or(index as u64 + 2)
    }
}

/// Number of line breaks in `bytes`, counting `\r\n`, `\n` and a bare `\r` once each.
fn count_breaks(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .enumerate()
        .filter(|&(i, &b)| b == b'\n' || (b == b'\r' && bytes.get(i + 1) != Some(&b'\n')))
        .count() as u64
}

/// Line numbers of `rows` within `content`.
///
/// The reader's own line counter ignores bare `\r` terminators, so lines are counted from the
/// byte offset at which each row starts.
fn line_numbers(content: &[u8], rows: &[StringRecord]) -> Vec<u64> {
    let mut line = 1;
    let mut cursor = 0;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let Some(start) = row.position().map(|pos| pos.byte() as usize) else {
                return index as u64 + 2;
            };
            let start = start.clamp(cursor, content.len());
            line += count_breaks(&content[cursor..start]);
            cursor = start;
            line
        })
        .collect()
}

/// Parse a ledger file.
///
/// The first non-blank line is the header. Rows are kept raw and may have any number of cells,
/// so a later rewrite reproduces rows this crate does not understand.
pub fn read(content: &[u8]) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let header = reader.headers()?.clone();
    if header.is_empty() {
        return Err(Error::MissingHeader.into());
    }

    let rows = reader.into_records().collect::<csv::Result<Vec<_>>>()?;
    let lines = line_numbers(content, &rows);

    Ok(Table {
        header,
        rows,
        lines,
    })
}

/// Encode a single record as one terminated CSV line.
pub fn encode(record: &Record, ending: LineEnding) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(ending.terminator())
        .from_writer(Vec::new());

    writer.serialize(record)?;

    Ok(writer.into_inner().map_err(|err| err.into_error())?)
}

/// Encode a whole table, header first.
pub fn write(table: &Table, ending: LineEnding) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(ending.terminator())
        .from_writer(Vec::new());

    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    Ok(writer.into_inner().map_err(|err| err.into_error())?)
}
