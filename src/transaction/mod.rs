//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and deleting transactions
//! - The validated create and delete operations and their route handlers

mod core;
mod create;
mod create_endpoint;
mod delete;
mod delete_endpoint;
mod list_endpoint;

pub use core::{
    Transaction, TransactionType, TransactionWithCategory, count_transactions,
    create_transaction_table, get_all_transactions, get_transaction, insert_transactions,
};
pub use create::{CreateTransactionRequest, create_transaction};
pub use create_endpoint::create_transaction_endpoint;
pub use delete::delete_transaction;
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::get_transactions_endpoint;
