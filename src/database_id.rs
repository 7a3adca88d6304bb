//! Database ID type definitions.

use uuid::{Uuid, fmt::Hyphenated};

use crate::Error;

/// Identifier for a transaction.
pub type TransactionId = Uuid;

/// Identifier for a category.
pub type CategoryId = Uuid;

/// Parse a client provided string into a record identifier.
///
/// # Errors
/// Returns [Error::InvalidIdentifier] if `raw_id` is not a UUID in the hyphenated
/// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form.
pub fn parse_id(raw_id: &str) -> Result<Uuid, Error> {
    if raw_id.len() != Hyphenated::LENGTH {
        return Err(Error::InvalidIdentifier(raw_id.to_owned()));
    }

    Uuid::try_parse(raw_id).map_err(|_| Error::InvalidIdentifier(raw_id.to_owned()))
}
