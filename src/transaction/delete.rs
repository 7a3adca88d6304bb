//! Deleting a transaction by a client provided identifier.

use rusqlite::Connection;

use crate::{
    Error,
    database_id::parse_id,
    transaction::core::delete_transaction_by_id,
};

/// Delete the transaction identified by `raw_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidIdentifier] if `raw_id` is not a valid UUID,
/// - [Error::NotFound] if there is no transaction with that ID,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(raw_id: &str, connection: &Connection) -> Result<(), Error> {
    let id = parse_id(raw_id)?;

    if delete_transaction_by_id(id, connection)? == 0 {
        return Err(Error::NotFound);
    }

    tracing::info!("deleted transaction {id}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use uuid::Uuid;

    use crate::{
        Error,
        db::initialize,
        transaction::core::{
            Transaction, TransactionType, count_transactions, get_transaction,
            insert_transaction,
        },
    };

    use super::delete_transaction;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn malformed_id_is_rejected() {
        let conn = get_test_connection();

        let result = delete_transaction("not-a-uuid", &conn);

        assert_eq!(
            result,
            Err(Error::InvalidIdentifier("not-a-uuid".to_owned()))
        );
    }

    #[test]
    fn missing_id_is_not_found() {
        let conn = get_test_connection();

        let result = delete_transaction(&Uuid::new_v4().to_string(), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn deletes_exactly_one_transaction() {
        let conn = get_test_connection();
        let target = insert_transaction(
            Transaction::build("Target", 1.0, TransactionType::Income),
            &conn,
        )
        .unwrap();
        let other = insert_transaction(
            Transaction::build("Other", 1.0, TransactionType::Income),
            &conn,
        )
        .unwrap();

        delete_transaction(&target.id.to_string(), &conn).expect("Could not delete");

        assert_eq!(get_transaction(target.id, &conn), Err(Error::NotFound));
        assert_eq!(get_transaction(other.id, &conn), Ok(other));
        assert_eq!(count_transactions(&conn), Ok(1));
    }
}
