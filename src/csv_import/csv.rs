//! Functions to parse transactions from CSV files.

use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;

use crate::{Error, category::CategoryTitle, transaction::TransactionType};

/// A valid row from a CSV file, ready to be saved as a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTransaction {
    /// A text description of what the transaction was for.
    pub title: String,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The amount of money earned or spent.
    pub value: f64,
    /// The title of the transaction's category, `None` if the cell was empty.
    pub category: Option<CategoryTitle>,
}

/// The raw columns of a CSV row, any of which may be missing or empty.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "type", default)]
    transaction_type: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Open the file at `path` and parse its transactions with [read_csv_transactions].
///
/// # Errors
/// Returns [Error::FileError] if the file cannot be opened or read, or
/// [Error::InvalidCSV] if the contents are not valid.
pub fn parse_csv_file(path: &Path) -> Result<Vec<CsvTransaction>, Error> {
    let file = File::open(path)?;

    read_csv_transactions(file)
}

/// Read every row of comma separated `reader` and keep the valid ones.
///
/// The first line must be a header naming the columns. Fields are trimmed.
/// Rows missing a title, type or value are skipped. The whole input is read
/// before returning.
///
/// # Errors
/// Returns [Error::InvalidCSV] if the CSV is malformed, or if a row has a type
/// other than "income" or "outcome" or a value that is not a non-negative number.
pub fn read_csv_transactions<R: Read>(reader: R) -> Result<Vec<CsvTransaction>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut transactions = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |position| position.line());
        let row: CsvRecord = record.deserialize(Some(&headers))?;

        let (Some(title), Some(raw_type), Some(raw_value)) =
            (row.title, row.transaction_type, row.value)
        else {
            tracing::debug!("Skipping CSV line {line}: missing title, type or value");
            continue;
        };

        let transaction_type = raw_type.parse().map_err(|_| {
            Error::InvalidCSV(format!(
                "line {line}: \"{raw_type}\" is not a valid transaction type"
            ))
        })?;

        let value = raw_value
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| {
                Error::InvalidCSV(format!("line {line}: \"{raw_value}\" is not a valid value"))
            })?;

        let category = row
            .category
            .and_then(|category| CategoryTitle::new(&category).ok());

        transactions.push(CsvTransaction {
            title,
            transaction_type,
            value,
            category,
        });
    }

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use crate::{Error, category::CategoryTitle, transaction::TransactionType};

    use super::{CsvTransaction, read_csv_transactions};

    fn parse(text: &str) -> Result<Vec<CsvTransaction>, Error> {
        read_csv_transactions(text.as_bytes())
    }

    #[test]
    fn parses_valid_rows() {
        let text = "title, type, value, category\n\
                    Loan, income, 1500, Others\n\
                    Website Hosting, outcome, 50, Others\n\
                    Ice cream, outcome, 3, Food\n";

        let got = parse(text).expect("Could not parse CSV");

        assert_eq!(
            got,
            vec![
                CsvTransaction {
                    title: "Loan".to_owned(),
                    transaction_type: TransactionType::Income,
                    value: 1500.0,
                    category: Some(CategoryTitle::new_unchecked("Others")),
                },
                CsvTransaction {
                    title: "Website Hosting".to_owned(),
                    transaction_type: TransactionType::Outcome,
                    value: 50.0,
                    category: Some(CategoryTitle::new_unchecked("Others")),
                },
                CsvTransaction {
                    title: "Ice cream".to_owned(),
                    transaction_type: TransactionType::Outcome,
                    value: 3.0,
                    category: Some(CategoryTitle::new_unchecked("Food")),
                },
            ]
        );
    }

    #[test]
    fn columns_are_matched_by_header_name() {
        let text = "category,value,title,type\nFood,12.5,Lunch,outcome\n";

        let got = parse(text).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].title, "Lunch");
        assert_eq!(got[0].value, 12.5);
        assert_eq!(got[0].category, Some(CategoryTitle::new_unchecked("Food")));
    }

    #[test]
    fn skips_rows_missing_required_fields() {
        let text = "title,type,value,category\n\
                    ,income,10,Salary\n\
                    Pay,,10,Salary\n\
                    Pay,income,,Salary\n\
                    Pay,income,10,Salary\n";

        let got = parse(text).unwrap();

        assert_eq!(got.len(), 1);
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let text = "title,type,value,category\n   ,income,10,Salary\n";

        let got = parse(text).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn empty_category_is_none() {
        let text = "title,type,value,category\nPay,income,10,\n";

        let got = parse(text).unwrap();

        assert_eq!(got[0].category, None);
    }

    #[test]
    fn invalid_type_fails() {
        let text = "title,type,value,category\nPay,transfer,10,Salary\n";

        let got = parse(text);

        assert!(
            matches!(got, Err(Error::InvalidCSV(ref message)) if message.contains("transfer")),
            "want InvalidCSV, got {got:?}"
        );
    }

    #[test]
    fn negative_value_fails() {
        let text = "title,type,value,category\nPay,income,-10,Salary\n";

        assert!(matches!(parse(text), Err(Error::InvalidCSV(_))));
    }

    #[test]
    fn non_numeric_value_fails() {
        let text = "title,type,value,category\nPay,income,ten,Salary\n";

        assert!(matches!(parse(text), Err(Error::InvalidCSV(_))));
    }

    #[test]
    fn header_only_has_no_rows() {
        assert_eq!(parse("title,type,value,category\n"), Ok(Vec::new()));
    }
}
