use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use finance_ledger::{
    CreateTransactionRequest, count_categories, count_transactions, create_transaction,
    initialize_db,
};

/// A utility for creating a test database for the REST API server of finance_ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const SAMPLE_TRANSACTIONS: [(&str, f64, &str, &str); 6] = [
    ("Salary", 4200.0, "income", "Salary"),
    ("Freelance website", 650.0, "income", "Side projects"),
    ("Rent", 1800.0, "outcome", "Housing"),
    ("Groceries", 212.35, "outcome", "Food"),
    ("Ice cream", 4.5, "outcome", "Food"),
    ("Bus pass", 60.0, "outcome", "Transport"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample transactions...");

    for (title, value, transaction_type, category) in SAMPLE_TRANSACTIONS {
        create_transaction(
            CreateTransactionRequest {
                title: title.to_owned(),
                value,
                transaction_type: transaction_type.to_owned(),
                category: category.to_owned(),
            },
            &conn,
        )?;
    }

    println!(
        "Created {} transactions in {} categories.",
        count_transactions(&conn)?,
        count_categories(&conn)?
    );

    println!("Success!");

    Ok(())
}
