use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    balance::{Balance, get_balance},
};

/// The state needed to compute the balance.
#[derive(Debug, Clone)]
pub struct BalanceState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the current balance.
pub async fn get_balance_endpoint(
    State(state): State<BalanceState>,
) -> Result<Json<Balance>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_balance(&connection).map(Json)
}
