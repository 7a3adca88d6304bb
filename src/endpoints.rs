//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}',
//! use [format_endpoint].

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to delete a single transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to import transactions from a CSV file.
pub const IMPORT: &str = "/api/transactions/import";
/// The route to get the current balance.
pub const BALANCE: &str = "/api/balance";
/// The route to list categories.
pub const CATEGORIES: &str = "/api/categories";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// # Examples
/// ```
/// use finance_ledger::endpoints::format_endpoint;
///
/// assert_eq!(format_endpoint("/api/transactions/{transaction_id}", "abc"), "/api/transactions/abc");
/// ```
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            format!("{}{}{}", &endpoint_path[..start], id, &endpoint_path[end + 1..])
        }
        _ => endpoint_path.to_owned(),
    }
}
