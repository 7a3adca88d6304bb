use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
};
use rusqlite::Connection;
use uuid::Uuid;

use crate::{
    AppState, Error, app_state::lock_connection, csv_import::import_transactions,
    transaction::Transaction,
};

/// The name of the multipart form field that holds the CSV file.
pub const FILE_FIELD: &str = "file";

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where uploaded files are kept until they are imported.
    pub upload_dir: PathBuf,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            upload_dir: state.upload_dir.clone(),
        }
    }
}

/// Route handler for importing transactions from an uploaded CSV file.
///
/// The upload is saved to the upload directory and then imported, which
/// removes the file on success.
pub async fn import_transactions_endpoint(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<Transaction>>), Error> {
    let start_time = std::time::Instant::now();
    let mut upload_path = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            tracing::debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        upload_path = Some(save_upload(field, &state.upload_dir).await?);
        break;
    }

    let Some(upload_path) = upload_path else {
        return Err(Error::MultipartError(format!(
            "the form did not contain a \"{FILE_FIELD}\" field"
        )));
    };

    let connection = lock_connection(&state.db_connection)?;

    let transactions = import_transactions(&upload_path, &connection)
        .inspect_err(|error| tracing::error!("Failed to import transactions: {error}"))?;

    tracing::debug!(
        "Import request finished in {:.1}ms",
        start_time.elapsed().as_millis()
    );

    Ok((StatusCode::CREATED, Json(transactions)))
}

async fn save_upload(field: Field<'_>, upload_dir: &Path) -> Result<PathBuf, Error> {
    if field.content_type() != Some("text/csv") {
        return Err(Error::NotCSV);
    }

    let data = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("could not read data from multipart form field".to_owned())
    })?;

    let path = upload_dir.join(format!("{}.csv", Uuid::new_v4()));
    tokio::fs::write(&path, &data).await?;

    tracing::debug!("Saved {} byte upload to {}", data.len(), path.display());

    Ok(path)
}
