//! Categories group transactions under a unique, human readable title,
//! e.g. "Groceries" or "Salary".
//!
//! Categories are never created directly by clients, they are created lazily
//! the first time a transaction refers to them by title.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, database_id::CategoryId};

// ============================================================================
// MODELS
// ============================================================================

/// A validated, non-empty category title with surrounding whitespace removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct CategoryTitle(String);

impl CategoryTitle {
    /// Create a category title.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryTitle] if `title` is
    /// empty or only whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyCategoryTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a category title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for CategoryTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryTitle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryTitle::new(s)
    }
}

impl Display for CategoryTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label for grouping transactions, unique by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique title of the category.
    pub title: CategoryTitle,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the category was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategory] if a category with the same title exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(title: CategoryTitle, connection: &Connection) -> Result<Category, Error> {
    let now = OffsetDateTime::now_utc();

    let category = connection
        .prepare(
            "INSERT INTO category (id, title, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, title, created_at, updated_at",
        )?
        .query_row((Uuid::new_v4(), title.as_ref(), now, now), map_category_row)?;

    Ok(category)
}

/// Create one category per title, reusing a single prepared statement.
///
/// The caller should ensure `titles` has no duplicates and that none of the
/// titles already exist, otherwise [Error::DuplicateCategory] is returned.
pub fn create_categories(
    titles: &[CategoryTitle],
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let now = OffsetDateTime::now_utc();
    let mut statement = connection.prepare(
        "INSERT INTO category (id, title, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, title, created_at, updated_at",
    )?;

    titles
        .iter()
        .map(|title| {
            statement
                .query_row((Uuid::new_v4(), title.as_ref(), now, now), map_category_row)
                .map_err(Error::from)
        })
        .collect()
}

/// Retrieve the category with exactly `title`, if it exists.
pub fn get_category_by_title(
    title: &CategoryTitle,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, title, created_at, updated_at FROM category WHERE title = :title")?
        .query_row(&[(":title", title.as_ref())], map_category_row)
        .optional()
        .map_err(|error| error.into())
}

/// The most titles bound to a single `IN` query, well under SQLite's variable limit.
const TITLES_PER_QUERY: usize = 500;

/// Retrieve the categories whose title is one of `titles`.
///
/// Titles without a matching category are ignored.
pub fn get_categories_by_titles(
    titles: &[CategoryTitle],
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let mut categories = Vec::new();

    for chunk in titles.chunks(TITLES_PER_QUERY) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let query = format!(
            "SELECT id, title, created_at, updated_at FROM category WHERE title IN ({placeholders})"
        );

        let chunk_categories = connection
            .prepare(&query)?
            .query_map(
                params_from_iter(chunk.iter().map(|title| title.as_ref())),
                map_category_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        categories.extend(chunk_categories);
    }

    Ok(categories)
}

/// Get the category with `title`, creating it if it does not exist yet.
///
/// If another writer inserts the same title between the lookup and the
/// insert, the unique constraint rejects the insert and the lookup is
/// retried once.
pub fn find_or_create_category(
    title: CategoryTitle,
    connection: &Connection,
) -> Result<Category, Error> {
    if let Some(category) = get_category_by_title(&title, connection)? {
        return Ok(category);
    }

    let result = create_category(title.clone(), connection);

    resolve_create_conflict(result, &title, connection)
}

/// Fall back to the stored category when creating `title` lost a race to another writer.
fn resolve_create_conflict(
    result: Result<Category, Error>,
    title: &CategoryTitle,
    connection: &Connection,
) -> Result<Category, Error> {
    match result {
        Err(Error::DuplicateCategory(_)) => {
            tracing::debug!("category \"{title}\" was created concurrently, retrying lookup");
            get_category_by_title(title, connection)?.ok_or(Error::NotFound)
        }
        result => result,
    }
}

/// Retrieve all categories ordered alphabetically by title.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, title, created_at, updated_at FROM category ORDER BY title ASC;")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of categories in the database.
pub fn count_categories(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM category;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id BLOB PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )?;

    Ok(())
}

/// Map a database row to a Category.
///
/// Expects the columns id, title, created_at, updated_at starting at `offset`.
pub fn map_category_row_with_offset(row: &Row, offset: usize) -> Result<Category, rusqlite::Error> {
    let id = row.get(offset)?;
    let raw_title: String = row.get(offset + 1)?;
    let created_at = row.get(offset + 2)?;
    let updated_at = row.get(offset + 3)?;

    Ok(Category {
        id,
        title: CategoryTitle::new_unchecked(&raw_title),
        created_at,
        updated_at,
    })
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    map_category_row_with_offset(row, 0)
}

// ============================================================================
// TESTS
// ============================================================================
