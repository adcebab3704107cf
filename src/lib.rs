//! Personal finance ledger kept in a CSV file of `date,category,amount,description` rows.

pub mod cli;
pub mod csv;
pub mod domain;
pub mod error;
pub mod fs;
pub mod ledger;

pub use domain::{
    query::{SearchQuery, UpdateRequest, UpdateResult},
    record::Record,
    summary::Summary,
};
pub use error::{Error, Result};
pub use ledger::Ledger;
