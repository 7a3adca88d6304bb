//! Saving the rows of a CSV file as transactions, creating any missing categories.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    category::{CategoryTitle, create_categories, get_categories_by_titles},
    csv_import::{CsvTransaction, parse_csv_file},
    database_id::CategoryId,
    transaction::{Transaction, insert_transactions},
};

/// Import the transactions in the CSV file at `file_path` and delete the file.
///
/// Every valid row is read before anything is written. Categories referenced
/// by the rows that do not exist yet are created, then all the transactions
/// are inserted. Both steps run in one database transaction, so either
/// everything is saved or nothing is.
///
/// The file is deleted only after the import has been committed. If the
/// import fails the file is left in place.
///
/// # Errors
/// This function will return a:
/// - [Error::FileError] if the file cannot be read,
/// - [Error::InvalidCSV] if the file is not a valid transactions CSV,
/// - or [Error::SqlError] if the transactions could not be saved.
pub fn import_transactions(
    file_path: &Path,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let rows = parse_csv_file(file_path)?;

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let (transactions, created_category_count) = save_rows(rows, &sql_transaction)?;

    sql_transaction.commit()?;

    tracing::info!(
        "Imported {} transactions and created {} categories from {}",
        transactions.len(),
        created_category_count,
        file_path.display()
    );

    // The import has already been committed, failing here would invite the
    // client to import the same file twice.
    if let Err(error) = fs::remove_file(file_path) {
        tracing::error!(
            "Could not remove imported file {}: {error}",
            file_path.display()
        );
    }

    Ok(transactions)
}

fn save_rows(
    rows: Vec<CsvTransaction>,
    connection: &Connection,
) -> Result<(Vec<Transaction>, usize), Error> {
    let (category_ids, created_category_count) = reconcile_categories(&rows, connection)?;

    let builders = rows
        .into_iter()
        .map(|row| {
            let category_id = row
                .category
                .as_ref()
                .and_then(|title| category_ids.get(title).copied());

            if category_id.is_none() {
                tracing::debug!("Importing \"{}\" without a category", row.title);
            }

            Transaction::build(&row.title, row.value, row.transaction_type).category_id(category_id)
        })
        .collect();

    let transactions = insert_transactions(builders, connection)?;

    Ok((transactions, created_category_count))
}

/// Map every category title referenced by `rows` to a category ID, creating
/// the categories that do not exist yet.
///
/// Returns the mapping and the number of categories that were created.
fn reconcile_categories(
    rows: &[CsvTransaction],
    connection: &Connection,
) -> Result<(HashMap<CategoryTitle, CategoryId>, usize), Error> {
    let referenced_titles: Vec<CategoryTitle> = rows
        .iter()
        .filter_map(|row| row.category.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let existing_categories = get_categories_by_titles(&referenced_titles, connection)?;
    let existing_titles: HashSet<&CategoryTitle> = existing_categories
        .iter()
        .map(|category| &category.title)
        .collect();

    let titles_to_create: Vec<CategoryTitle> = referenced_titles
        .iter()
        .filter(|title| !existing_titles.contains(title))
        .cloned()
        .collect();

    let new_categories = create_categories(&titles_to_create, connection)?;
    let created_count = new_categories.len();

    let category_ids = existing_categories
        .into_iter()
        .chain(new_categories)
        .map(|category| (category.title, category.id))
        .collect();

    Ok((category_ids, created_count))
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        path::{Path, PathBuf},
    };

    use rusqlite::Connection;
    use tempfile::TempDir;

    use crate::{
        Error,
        balance::get_balance,
        category::{CategoryTitle, count_categories, create_category, get_category_by_title},
        db::initialize,
        transaction::{TransactionType, count_transactions},
    };

    use super::import_transactions;

    const CSV: &str = "title, type, value, category\n\
        Loan, income, 1500, Others\n\
        Website Hosting, outcome, 50, Others\n\
        Ice cream, outcome, 3, Food\n\
        Salary, income, 4000, Salary\n\
        , outcome, 10, Food\n\
        Missing value, outcome, , Food\n";

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("Could not write test CSV");
        path
    }

    #[test]
    fn imports_valid_rows_and_creates_categories() {
        let conn = get_test_connection();
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "import.csv", CSV);

        let transactions = import_transactions(&path, &conn).expect("Could not import");

        assert_eq!(transactions.len(), 4);
        assert_eq!(count_transactions(&conn), Ok(4));
        assert_eq!(count_categories(&conn), Ok(3));
        assert!(
            transactions
                .iter()
                .all(|transaction| transaction.category_id.is_some())
        );
        let balance = get_balance(&conn).unwrap();
        assert_eq!(balance.income, 5500.0);
        assert_eq!(balance.outcome, 53.0);
    }

    #[test]
    fn rows_share_category_by_title() {
        let conn = get_test_connection();
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "import.csv", CSV);

        let transactions = import_transactions(&path, &conn).unwrap();

        let others = get_category_by_title(&CategoryTitle::new_unchecked("Others"), &conn)
            .unwrap()
            .expect("Category \"Others\" was not created");
        let others_count = transactions
            .iter()
            .filter(|transaction| transaction.category_id == Some(others.id))
            .count();
        assert_eq!(others_count, 2);
    }

    #[test]
    fn reuses_existing_categories() {
        let conn = get_test_connection();
        let food = create_category(CategoryTitle::new_unchecked("Food"), &conn).unwrap();
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "import.csv", CSV);

        let transactions = import_transactions(&path, &conn).unwrap();

        assert_eq!(count_categories(&conn), Ok(3));
        let ice_cream = transactions
            .iter()
            .find(|transaction| transaction.title == "Ice cream")
            .unwrap();
        assert_eq!(ice_cream.category_id, Some(food.id));
        assert_eq!(ice_cream.transaction_type, TransactionType::Outcome);
    }

    #[test]
    fn importing_twice_creates_no_new_categories() {
        let conn = get_test_connection();
        let dir = TempDir::new().unwrap();

        import_transactions(&write_csv(dir.path(), "first.csv", CSV), &conn).unwrap();
        let categories_after_first = count_categories(&conn).unwrap();
        import_transactions(&write_csv(dir.path(), "second.csv", CSV), &conn).unwrap();

        assert_eq!(count_categories(&conn), Ok(categories_after_first));
        assert_eq!(count_transactions(&conn), Ok(8));
    }

    #[test]
    fn row_without_category_is_imported_without_one() {
        let conn = get_test_connection();
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "import.csv",
            "title,type,value,category\nGift,income,20,\n",
        );

        let transactions = import_transactions(&path, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].category_id, None);
        assert_eq!(count_categories(&conn), Ok(0));
    }

    #[test]
    fn deletes_file_after_import() {
        let conn = get_test_connection();
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "import.csv", CSV);

        import_transactions(&path, &conn).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn invalid_csv_keeps_file_and_writes_nothing() {
        let conn = get_test_connection();
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "import.csv",
            "title,type,value,category\nPay,income,10,Salary\nPay,transfer,10,Salary\n",
        );

        let result = import_transactions(&path, &conn);

        assert!(matches!(result, Err(Error::InvalidCSV(_))));
        assert!(path.exists());
        assert_eq!(count_transactions(&conn), Ok(0));
        assert_eq!(count_categories(&conn), Ok(0));
    }

    #[test]
    fn failed_insert_rolls_back_new_categories() {
        let conn = get_test_connection();
        conn.execute("DROP TABLE \"transaction\"", ()).unwrap();
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "import.csv", CSV);

        let result = import_transactions(&path, &conn);

        assert!(
            matches!(result, Err(Error::SqlError(_))),
            "want SqlError, got {result:?}"
        );
        assert!(path.exists());
        assert_eq!(count_categories(&conn), Ok(0));
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let conn = get_test_connection();
        let dir = TempDir::new().unwrap();

        let result = import_transactions(&dir.path().join("missing.csv"), &conn);

        assert!(matches!(result, Err(Error::FileError(_))));
    }
}
