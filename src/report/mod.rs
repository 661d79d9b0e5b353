//! Monthly reports over a user's transactions.
//!
//! This module contains:
//! - A query for the transactions in a calendar month
//! - Aggregations that total income and expenses, overall and per category
//! - Route handlers that serve the totals as JSON

mod aggregation;
mod handlers;
mod transaction;

pub use handlers::{category_report_endpoint, monthly_report_endpoint};
