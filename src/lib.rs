//! A personal finance ledger: income and outcome transactions grouped by
//! category, a running balance, and bulk imports from CSV files.
//!
//! The core operations are plain functions over a [rusqlite::Connection]:
//! - [get_balance] sums incomes and outcomes,
//! - [create_transaction] validates a transaction against the balance and
//!   finds or creates its category,
//! - [delete_transaction] removes a transaction by ID,
//! - [import_transactions] saves the rows of a CSV file, creating any missing
//!   categories.
//!
//! This library also provides a JSON REST API over these operations, see
//! [build_router].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod balance;
mod categories_endpoint;
mod category;
mod config;
mod csv_import;
mod database_id;
mod db;
pub mod endpoints;
mod error;
mod logging;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use balance::{Balance, get_balance};
pub use category::{
    Category, CategoryTitle, count_categories, find_or_create_category, get_all_categories,
};
pub use config::{Args, ServerConfig};
pub use csv_import::import_transactions;
pub use database_id::{CategoryId, TransactionId};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    CreateTransactionRequest, Transaction, TransactionType, TransactionWithCategory,
    count_transactions, create_transaction, delete_transaction, get_all_transactions,
    get_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
