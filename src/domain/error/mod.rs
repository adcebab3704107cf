use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
    #[error("ledger file has no header line")]
    MissingHeader,
    #[error("totals overflow at line {line}")]
    AmountOverflow { line: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
