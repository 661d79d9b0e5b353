//! Monthly budgets: a spending ceiling a user sets for a calendar month.

mod core;
mod endpoints;

pub use self::core::create_budget_table;
pub use endpoints::{create_budget_endpoint, list_budgets_endpoint};
