use axum::{Extension, extract::State, http::StatusCode};

use crate::{
    Error,
    auth::Claims,
    database_id::TransactionId,
    extract::AppPath,
    transaction::{TransactionState, core::delete_transaction},
};

/// A route handler for deleting one of the caller's transactions, responds with 204 No Content.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
    AppPath(transaction_id): AppPath<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock()?;

    delete_transaction(transaction_id, claims.id, &connection)?;
    tracing::debug!("Deleted transaction {transaction_id}");

    Ok(StatusCode::NO_CONTENT)
}
