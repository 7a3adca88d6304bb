//! Aggregates transaction values into a balance.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionType};

/// The sums of all incomes and outcomes, and the difference between them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Balance {
    /// The sum of all income transaction values.
    pub income: f64,
    /// The sum of all outcome transaction values.
    pub outcome: f64,
    /// `income - outcome`.
    pub total: f64,
}

/// Compute the balance over every transaction in the database.
///
/// Values are summed as whole cents, so a total such as `0.1 + 0.2` comes out
/// as exactly `0.3`. Types with no transactions contribute zero.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_balance(connection: &Connection) -> Result<Balance, Error> {
    let income = sum_cents(TransactionType::Income, connection)?;
    let outcome = sum_cents(TransactionType::Outcome, connection)?;

    Ok(Balance {
        income: from_cents(income),
        outcome: from_cents(outcome),
        total: from_cents(income - outcome),
    })
}

/// Round an amount of money to a whole number of cents.
pub(crate) fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

fn sum_cents(transaction_type: TransactionType, connection: &Connection) -> Result<i64, Error> {
    connection
        .prepare_cached(
            "SELECT COALESCE(SUM(CAST(ROUND(value * 100) AS INTEGER)), 0)
            FROM \"transaction\" WHERE type = ?1",
        )?
        .query_row([transaction_type], |row| row.get(0))
        .map_err(|error| error.into())
}
