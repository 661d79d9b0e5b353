//! This file defines the `Category` type and the route for listing categories.
//! A category labels expense transactions for reporting; a transaction may only have one category.
//!
//! Categories are shared by all users and are created with the `create_category` binary.

use std::fmt::Display;
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::{Connection, Row, ffi::SQLITE_CONSTRAINT_UNIQUE};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, database_id::CategoryId};

/// The label reports use for expenses without a category.
///
/// No category may take this name, otherwise its expenses would be merged with the uncategorized
/// ones.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only
    /// whitespace, or an [Error::ReservedCategoryName] if `name` matches [UNCATEGORIZED_LABEL]
    /// ignoring case.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else if name.eq_ignore_ascii_case(UNCATEGORIZED_LABEL) {
            Err(Error::ReservedCategoryName(name.to_owned()))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for expenses, e.g., 'Groceries', 'Rent'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The id of the category.
    pub id: CategoryId,

    /// The name of the category.
    pub name: CategoryName,
}

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing all categories.
pub async fn list_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state.db_connection.lock()?;

    get_all_categories(&connection).map(Json)
}

/// Create a category in the database.
///
/// # Errors
/// This function will return a [Error::DuplicateCategoryName] if a category with the same name
/// already exists, or another error if there is an SQL error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    let result = connection.query_row(
        "INSERT INTO category (name) VALUES (?1) RETURNING id;",
        (name.as_ref(),),
        |row| row.get(0),
    );

    match result {
        Ok(id) => Ok(Category { id, name }),
        Err(rusqlite::Error::SqliteFailure(sql_error, _))
            if sql_error.extended_code == SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(Error::DuplicateCategoryName(name.to_string()))
        }
        Err(error) => Err(error.into()),
    }
}

/// Retrieve all categories in the database, ordered by name.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}
