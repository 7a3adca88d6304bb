//! Validated creation of a single transaction.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    balance::{get_balance, to_cents},
    category::{CategoryTitle, find_or_create_category},
    transaction::{Transaction, TransactionType, core::insert_transaction},
};

/// The data needed to create a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// A text description of what the transaction was for.
    pub title: String,
    /// The amount of money earned or spent.
    pub value: f64,
    /// Either "income" or "outcome".
    ///
    /// Kept as a string so that unsupported types are reported as
    /// [Error::InvalidType] rather than a deserialization failure.
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The title of the category, created if it does not exist.
    pub category: String,
}

/// Validate `request` and save it as a new transaction.
///
/// The balance check, category lookup and insert run inside a single
/// `IMMEDIATE` database transaction so no other writer can change the balance
/// between the check and the insert.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidType] if the type is not "income" or "outcome",
/// - [Error::InvalidValue] if the value is negative or not finite,
/// - [Error::EmptyCategoryTitle] if the category title is blank,
/// - [Error::InsufficientBalance] if an outcome is not strictly less than the current total,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    request: CreateTransactionRequest,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction_type: TransactionType = request.transaction_type.parse()?;

    if !request.value.is_finite() || request.value < 0.0 {
        return Err(Error::InvalidValue(request.value));
    }

    let category_title = CategoryTitle::new(&request.category)?;

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let balance = get_balance(&sql_transaction)?;

    if transaction_type == TransactionType::Outcome
        && to_cents(balance.total) <= to_cents(request.value)
    {
        tracing::debug!(
            "rejected outcome of {} with a total balance of {}",
            request.value,
            balance.total
        );
        return Err(Error::InsufficientBalance);
    }

    let category = find_or_create_category(category_title, &sql_transaction)?;

    let transaction = insert_transaction(
        Transaction::build(&request.title, request.value, transaction_type)
            .category_id(Some(category.id)),
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    tracing::info!(
        "created {} transaction {} in category \"{}\"",
        transaction.transaction_type,
        transaction.id,
        category.title
    );

    Ok(transaction)
}
