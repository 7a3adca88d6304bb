//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transaction type was something other than "income" or "outcome".
    #[error("transaction type \"{0}\" is not supported, expected \"income\" or \"outcome\"")]
    InvalidType(String),

    /// An outcome transaction was for at least as much as the current balance.
    ///
    /// Outcomes must be strictly less than the current total, so spending the
    /// entire balance is also rejected.
    #[error("outcome is greater than or equal to the total balance")]
    InsufficientBalance,

    /// A transaction value was negative, infinite or NaN.
    #[error("{0} is not a valid transaction value, values must be zero or greater")]
    InvalidValue(f64),

    /// An empty string was used to create a category title.
    #[error("category title cannot be empty")]
    EmptyCategoryTitle,

    /// The string used to identify a record is not a valid UUID.
    #[error("\"{0}\" is not a valid identifier")]
    InvalidIdentifier(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A category with the same title already exists in the database.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategory(String),

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a CSV file.
    #[error("file is not a CSV")]
    NotCSV,

    /// The CSV had issues that prevented it from being imported.
    #[error("could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// Reading, writing or removing a file failed.
    #[error("file operation failed: {0}")]
    FileError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("category.title") => Error::DuplicateCategory(desc.to_owned()),
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        if value.is_io_error() {
            Error::FileError(value.to_string())
        } else {
            Error::InvalidCSV(value.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::FileError(value.to_string())
    }
}

impl Error {
    /// The HTTP status code that best describes the error to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidType(_)
            | Error::InsufficientBalance
            | Error::InvalidValue(_)
            | Error::EmptyCategoryTitle
            | Error::InvalidIdentifier(_)
            | Error::MultipartError(_)
            | Error::NotCSV
            | Error::InvalidCSV(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateCategory(_) => StatusCode::CONFLICT,
            Error::FileError(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code.is_server_error() {
            // Server errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (
            status_code,
            Json(json!({ "status": "error", "message": message })),
        )
            .into_response()
    }
}
