//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    transaction::{CreateTransactionRequest, Transaction, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with the created transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    let transaction = create_transaction(request, &connection)
        .inspect_err(|error| tracing::debug!("could not create transaction: {error}"))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::get_test_app_state,
        transaction::{Transaction, TransactionType, create_transaction_endpoint},
    };

    fn get_test_server() -> (TestServer, tempfile::TempDir) {
        let (state, upload_dir) = get_test_app_state();
        let app = Router::new()
            .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
            .with_state(state);

        (
            TestServer::try_new(app).expect("Could not create test server."),
            upload_dir,
        )
    }

    #[tokio::test]
    async fn create_transaction_succeeds() {
        let (server, _upload_dir) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "title": "Salary",
                "value": 3000,
                "type": "income",
                "category": "Salary",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.title, "Salary");
        assert_eq!(transaction.value, 3000.0);
        assert_eq!(transaction.transaction_type, TransactionType::Income);
    }

    #[tokio::test]
    async fn invalid_type_is_bad_request() {
        let (server, _upload_dir) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "title": "Transfer",
                "value": 10,
                "type": "transfer",
                "category": "Other",
            }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn overdraw_is_bad_request() {
        let (server, _upload_dir) = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "title": "Rent",
                "value": 10,
                "type": "outcome",
                "category": "Housing",
            }))
            .await;

        response.assert_status_bad_request();
    }
}
