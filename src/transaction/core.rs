//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    Error,
    category::{Category, map_category_row_with_offset},
    database_id::{CategoryId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. paying rent.
    Outcome,
}

impl TransactionType {
    /// The name used for the type in the database and over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Outcome => "outcome",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    /// Parse a transaction type, the match is exact and case sensitive.
    ///
    /// # Errors
    /// Returns [Error::InvalidType] if `s` is not "income" or "outcome".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "outcome" => Ok(TransactionType::Outcome),
            other => Err(Error::InvalidType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An income or outcome, i.e. an event where money was either earned or spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub title: String,
    /// The amount of money earned or spent, never negative.
    pub value: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction belongs to.
    ///
    /// Only imported transactions may be missing a category.
    pub category_id: Option<CategoryId>,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(title: &str, value: f64, transaction_type: TransactionType) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            value,
            transaction_type,
            category_id: None,
        }
    }
}

/// A builder for transactions that have not been saved to the database yet.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A text description of what the transaction was for.
    pub title: String,
    /// The amount of money earned or spent.
    pub value: f64,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The category of the transaction, e.g. "Groceries", "Salary".
    pub category_id: Option<CategoryId>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

/// A transaction together with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionWithCategory {
    /// The transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The transaction's category, if it has one.
    pub category: Option<Category>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const INSERT_TRANSACTION_QUERY: &str = "INSERT INTO \"transaction\"
        (id, title, value, type, category_id, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
     RETURNING id, title, value, type, category_id, created_at, updated_at";

/// Create a new transaction in the database from a builder.
///
/// No balance or category checks are done here, see
/// [crate::transaction::create_transaction] for the validated version.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the category ID does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(INSERT_TRANSACTION_QUERY)?
        .query_row(
            (
                Uuid::new_v4(),
                builder.title,
                builder.value,
                builder.transaction_type,
                builder.category_id,
                now,
                now,
            ),
            map_transaction_row,
        )
        .map_err(map_insert_error)
}

/// Create many transactions in the database, reusing one prepared statement.
///
/// The caller is responsible for wrapping the call in a database transaction
/// if the insert should be all-or-nothing.
pub fn insert_transactions(
    builders: Vec<TransactionBuilder>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let now = OffsetDateTime::now_utc();
    let mut statement = connection.prepare(INSERT_TRANSACTION_QUERY)?;

    builders
        .into_iter()
        .map(|builder| {
            statement
                .query_row(
                    (
                        Uuid::new_v4(),
                        builder.title,
                        builder.value,
                        builder.transaction_type,
                        builder.category_id,
                        now,
                        now,
                    ),
                    map_transaction_row,
                )
                .map_err(map_insert_error)
        })
        .collect()
}

fn map_insert_error(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::NotFound,
        error => error.into(),
    }
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, value, type, category_id, created_at, updated_at
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all transactions with their categories, oldest first.
pub fn get_all_transactions(
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.title, t.value, t.type, t.category_id, t.created_at, t.updated_at,
                    c.id, c.title, c.created_at, c.updated_at
             FROM \"transaction\" t
             LEFT JOIN category c ON c.id = t.category_id
             ORDER BY t.created_at ASC, t.rowid ASC",
        )?
        .query_map([], |row| {
            let transaction = map_transaction_row(row)?;
            let category = match row.get::<_, Option<CategoryId>>(7)? {
                Some(_) => Some(map_category_row_with_offset(row, 7)?),
                None => None,
            };

            Ok(TransactionWithCategory {
                transaction,
                category,
            })
        })?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

type RowsAffected = usize;

/// Delete the transaction with `id`, returning the number of deleted rows.
pub fn delete_transaction_by_id(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id BLOB PRIMARY KEY,
            title TEXT NOT NULL,
            value REAL NOT NULL CHECK (value >= 0),
            type TEXT NOT NULL CHECK (type IN ('income', 'outcome')),
            category_id BLOB,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_type ON \"transaction\"(type);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let value = row.get(2)?;
    let transaction_type = row.get(3)?;
    let category_id = row.get(4)?;
    let created_at = row.get(5)?;
    let updated_at = row.get(6)?;

    Ok(Transaction {
        id,
        title,
        value,
        transaction_type,
        category_id,
        created_at,
        updated_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod transaction_type_tests {
    use crate::{Error, transaction::TransactionType};

    #[test]
    fn parses_income_and_outcome() {
        assert_eq!(
            "income".parse::<TransactionType>(),
            Ok(TransactionType::Income)
        );
        assert_eq!(
            "outcome".parse::<TransactionType>(),
            Ok(TransactionType::Outcome)
        );
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(
            "Income".parse::<TransactionType>(),
            Err(Error::InvalidType("Income".to_owned()))
        );
    }

    #[test]
    fn serializes_as_lowercase() {
        let json = serde_json::to_string(&TransactionType::Outcome).unwrap();

        assert_eq!(json, "\"outcome\"");
    }
}
