//! HTTP handlers for the report routes.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Claims,
    extract::AppQuery,
    month::CalendarMonth,
    report::{
        aggregation::{MonthlySummary, expenses_by_category, summarize},
        transaction::get_transactions_in_month,
    },
};

/// The state needed for the report routes.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The month a report covers.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    month: u8,
    year: i32,
}

/// Handler for the monthly summary: total income, total expenses and the balance between them.
pub async fn monthly_report_endpoint(
    State(state): State<ReportState>,
    Extension(claims): Extension<Claims>,
    AppQuery(query): AppQuery<ReportQuery>,
) -> Result<Json<MonthlySummary>, Error> {
    let month = CalendarMonth::new(query.year, query.month)?;
    let transactions =
        get_transactions_in_month(claims.id, month, &*state.db_connection.lock()?)?;

    Ok(Json(summarize(&transactions)))
}

/// Handler for the month's expenses summed per category name.
pub async fn category_report_endpoint(
    State(state): State<ReportState>,
    Extension(claims): Extension<Claims>,
    AppQuery(query): AppQuery<ReportQuery>,
) -> Result<Json<BTreeMap<String, f64>>, Error> {
    let month = CalendarMonth::new(query.year, query.month)?;
    let transactions =
        get_transactions_in_month(claims.id, month, &*state.db_connection.lock()?)?;

    Ok(Json(expenses_by_category(&transactions)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        category::{CategoryName, create_category},
        endpoints,
        report::aggregation::MonthlySummary,
        test_utils::{get_test_server, register_and_log_in},
    };

    async fn post_transaction(server: &TestServer, token: &str, body: Value) {
        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn monthly_report_excludes_next_month() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;
        post_transaction(
            &server,
            &token,
            json!({ "type": "income", "amount": 1000, "date": "2024-03-05" }),
        )
        .await;
        post_transaction(
            &server,
            &token,
            json!({ "type": "expense", "amount": 400, "date": "2024-03-20" }),
        )
        .await;
        post_transaction(
            &server,
            &token,
            json!({ "type": "expense", "amount": 100, "date": "2024-04-01" }),
        )
        .await;

        let response = server
            .get(&format!("{}?month=3&year=2024", endpoints::MONTHLY_REPORT))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<MonthlySummary>(),
            MonthlySummary {
                income: 1000.0,
                expenses: 400.0,
                balance: 600.0,
            }
        );
    }

    #[tokio::test]
    async fn category_report_sums_expenses_per_category() {
        let (server, state) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;
        let (food, rent) = {
            let connection = state.db_connection.lock().unwrap();
            (
                create_category(CategoryName::new_unchecked("food"), &connection).unwrap(),
                create_category(CategoryName::new_unchecked("rent"), &connection).unwrap(),
            )
        };
        for (amount, category_id) in [(40, food.id), (10, food.id), (500, rent.id)] {
            post_transaction(
                &server,
                &token,
                json!({
                    "type": "expense",
                    "amount": amount,
                    "categoryId": category_id,
                    "date": "2024-03-15",
                }),
            )
            .await;
        }
        post_transaction(
            &server,
            &token,
            json!({ "type": "income", "amount": 2000, "categoryId": food.id, "date": "2024-03-01" }),
        )
        .await;

        let response = server
            .get(&format!("{}?month=3&year=2024", endpoints::CATEGORY_REPORT))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "food": 50.0, "rent": 500.0 }));
    }

    #[tokio::test]
    async fn december_includes_new_years_eve_only() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;
        post_transaction(
            &server,
            &token,
            json!({ "type": "expense", "amount": 40, "date": "2024-12-31" }),
        )
        .await;
        post_transaction(
            &server,
            &token,
            json!({ "type": "expense", "amount": 60, "date": "2025-01-01" }),
        )
        .await;

        let response = server
            .get(&format!("{}?month=12&year=2024", endpoints::CATEGORY_REPORT))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "Uncategorized": 40.0 }));
    }

    #[tokio::test]
    async fn december_of_year_zero_rolls_into_year_one() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;
        post_transaction(
            &server,
            &token,
            json!({ "type": "expense", "amount": 5, "date": "0000-12-15" }),
        )
        .await;
        post_transaction(
            &server,
            &token,
            json!({ "type": "expense", "amount": 7, "date": "0001-01-01" }),
        )
        .await;

        let response = server
            .get(&format!("{}?month=12&year=0", endpoints::MONTHLY_REPORT))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<MonthlySummary>(),
            MonthlySummary {
                income: 0.0,
                expenses: 5.0,
                balance: -5.0,
            }
        );
    }

    #[tokio::test]
    async fn negative_years_are_rejected() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;

        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({ "type": "expense", "amount": 5, "date": "-0002-12-15" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get(&format!("{}?month=12&year=-2", endpoints::MONTHLY_REPORT))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reports_ignore_other_users() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;
        let other_token = register_and_log_in(&server, "other@bar.baz").await;
        post_transaction(
            &server,
            &other_token,
            json!({ "type": "income", "amount": 1000, "date": "2024-03-05" }),
        )
        .await;

        let response = server
            .get(&format!("{}?month=3&year=2024", endpoints::MONTHLY_REPORT))
            .authorization_bearer(&token)
            .await;

        assert_eq!(response.json::<MonthlySummary>(), MonthlySummary::default());
    }

    #[tokio::test]
    async fn fails_on_invalid_month() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;

        server
            .get(&format!("{}?month=13&year=2024", endpoints::MONTHLY_REPORT))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fails_on_missing_query() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;

        server
            .get(endpoints::CATEGORY_REPORT)
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn requires_token() {
        let (server, _) = get_test_server();

        server
            .get(&format!("{}?month=3&year=2024", endpoints::MONTHLY_REPORT))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
