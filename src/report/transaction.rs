//! Database query for the transactions that fall within a report's month.
//!
//! This is separate from the main Transaction domain model because
//! reports only need the type, amount and category name.

use rusqlite::Connection;

use crate::{
    Error, category::UNCATEGORIZED_LABEL, month::CalendarMonth, transaction::TransactionType,
    user::UserID,
};

/// A simplified transaction view for report aggregations.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ReportTransaction {
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
}

/// Gets the transactions owned by `user_id` dated within `month`, along with their category names.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query preparation or execution fails.
pub(super) fn get_transactions_in_month(
    user_id: UserID,
    month: CalendarMonth,
    connection: &Connection,
) -> Result<Vec<ReportTransaction>, Error> {
    let query = format!(
        "SELECT
            t.type,
            t.amount,
            COALESCE(category.name, '{UNCATEGORIZED_LABEL}') AS category_name
        FROM \"transaction\" t
        LEFT JOIN category ON category.id = t.category_id
        WHERE t.user_id = ?1 AND t.date >= ?2 AND t.date < ?3"
    );

    connection
        .prepare(&query)?
        .query_map(
            (user_id.as_i64(), month.start(), month.end()),
            |row| {
                Ok(ReportTransaction {
                    kind: row.get(0)?,
                    amount: row.get(1)?,
                    category: row.get(2)?,
                })
            },
        )?
        .collect::<Result<Vec<ReportTransaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}
