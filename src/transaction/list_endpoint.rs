use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    balance::{Balance, get_balance},
    transaction::{TransactionWithCategory, get_all_transactions},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct TransactionListState {
    /// The database connection for reading transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Every transaction along with the balance they add up to.
#[derive(Debug, Serialize)]
pub struct TransactionList {
    /// All transactions, oldest first.
    pub transactions: Vec<TransactionWithCategory>,
    /// The balance over `transactions`.
    pub balance: Balance,
}

/// A route handler that lists all transactions and the current balance.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionListState>,
) -> Result<Json<TransactionList>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let transactions = get_all_transactions(&connection)?;
    let balance = get_balance(&connection)?;

    Ok(Json(TransactionList {
        transactions,
        balance,
    }))
}
