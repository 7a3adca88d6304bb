//! Importing transactions in bulk from CSV files.
//!
//! The CSV files must have a header row with the columns `title`, `type`,
//! `value` and `category`, in any order.

mod csv;
mod import;
mod import_endpoint;

pub use self::csv::{CsvTransaction, parse_csv_file};
pub use import::import_transactions;
pub use import_endpoint::import_transactions_endpoint;
