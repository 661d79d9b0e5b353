//! The budget model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::BudgetId, month::CalendarMonth, user::UserID};

/// A spending ceiling for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The amount of money budgeted for the month.
    pub amount: f64,
    /// The month number, from 1 to 12.
    pub month: u8,
    /// The year.
    pub year: i32,
    /// The user that owns the budget.
    pub user_id: UserID,
}

/// Create a budget of `amount` for `month` owned by `user_id`.
///
/// More than one budget may exist for the same user and month.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if `amount` is not a finite number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    amount: f64,
    month: CalendarMonth,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    if !amount.is_finite() {
        return Err(Error::InvalidAmount(amount));
    }

    connection
        .prepare(
            "INSERT INTO budget (amount, month, year, user_id) VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, month, year, user_id",
        )?
        .query_row(
            (amount, month.month(), month.year(), user_id.as_i64()),
            map_budget_row,
        )
        .map_err(Error::from)
}

/// Retrieve all budgets owned by `user_id`, ordered by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_budgets_by_user(user_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, amount, month, year, user_id FROM budget
             WHERE user_id = :user_id ORDER BY id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY,
                amount REAL NOT NULL,
                month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
                year INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        amount: row.get(1)?,
        month: row.get(2)?,
        year: row.get(3)?,
        user_id: UserID::new(row.get(4)?),
    })
}
