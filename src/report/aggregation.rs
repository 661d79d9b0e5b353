//! Reduces a month of transactions into report totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{report::transaction::ReportTransaction, transaction::TransactionType};

/// Total income and expenses for a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The sum of income amounts.
    pub income: f64,
    /// The sum of expense amounts.
    pub expenses: f64,
    /// `income - expenses`.
    pub balance: f64,
}

/// Sums income and expenses separately and derives the balance.
pub(super) fn summarize(transactions: &[ReportTransaction]) -> MonthlySummary {
    let (income, expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                match transaction.kind {
                    TransactionType::Income => (income + transaction.amount, expenses),
                    TransactionType::Expense => (income, expenses + transaction.amount),
                }
            });

    MonthlySummary {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Groups expenses by category name and sums them. Income is ignored.
pub(super) fn expenses_by_category(transactions: &[ReportTransaction]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Expense)
    {
        *totals.entry(transaction.category.clone()).or_insert(0.0) += transaction.amount;
    }

    totals
}
