use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    auth::Claims,
    transaction::{Transaction, TransactionState, core::get_transactions_by_user},
};

/// A route handler for listing the caller's transactions.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.db_connection.lock()?;

    get_transactions_by_user(claims.id, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{get_test_server, register_and_log_in},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn lists_only_own_transactions() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;
        let other_token = register_and_log_in(&server, "other@bar.baz").await;
        let mine = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({ "type": "income", "amount": 100, "date": "2024-03-05" }))
            .await
            .json::<Transaction>();
        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&other_token)
            .json(&json!({ "type": "expense", "amount": 5, "date": "2024-03-06" }))
            .await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![mine]);
    }

    #[tokio::test]
    async fn lists_nothing_for_new_user() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "foo@bar.baz").await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        assert!(response.json::<Vec<Transaction>>().is_empty());
    }
}
