use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    auth::Claims,
    database_id::TransactionId,
    extract::{AppJson, AppPath},
    transaction::{
        Transaction, TransactionState,
        core::{TransactionUpdate, update_transaction},
    },
};

/// A route handler for partially updating one of the caller's transactions.
///
/// Fields that are absent or `null` in the request body keep their stored value.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
    AppPath(transaction_id): AppPath<TransactionId>,
    AppJson(update): AppJson<TransactionUpdate>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.db_connection.lock()?;

    update_transaction(transaction_id, claims.id, update, &connection)
        .inspect_err(|error| {
            tracing::debug!("Could not update transaction {transaction_id}: {error}")
        })
        .map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, register_and_log_in},
        transaction::{Transaction, TransactionType},
    };

    async fn create_test_transaction(server: &TestServer, token: &str) -> Transaction {
        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .json(&json!({ "type": "expense", "amount": 20, "date": "2024-03-20" }))
            .await
            .json::<Transaction>()
    }

    #[tokio::test]
    async fn updates_given_fields() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;
        let transaction = create_test_transaction(&server, &token).await;

        let response = server
            .patch(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .authorization_bearer(&token)
            .json(&json!({ "type": "income", "date": "2024-04-01", "amount": null }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Transaction>(),
            Transaction {
                kind: TransactionType::Income,
                date: date!(2024 - 04 - 01),
                ..transaction
            }
        );
    }

    #[tokio::test]
    async fn fails_on_missing_transaction() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;

        let response = server
            .patch(&format_endpoint(endpoints::TRANSACTION, 42))
            .authorization_bearer(&token)
            .json(&json!({ "amount": 1 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "tried to update a transaction that is not in the database" })
        );
    }

    #[tokio::test]
    async fn fails_on_other_users_transaction() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;
        let other_token = register_and_log_in(&server, "other@bar.baz").await;
        let transaction = create_test_transaction(&server, &token).await;

        server
            .patch(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .authorization_bearer(&other_token)
            .json(&json!({ "amount": 1 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fails_on_invalid_category() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;
        let transaction = create_test_transaction(&server, &token).await;

        server
            .patch(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .authorization_bearer(&token)
            .json(&json!({ "categoryId": 12345 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fails_on_non_numeric_id() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;

        server
            .patch("/transactions/abc")
            .authorization_bearer(&token)
            .json(&json!({ "amount": 1 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
