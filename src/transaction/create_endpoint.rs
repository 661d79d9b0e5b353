use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    auth::Claims,
    database_id::CategoryId,
    extract::AppJson,
    transaction::{
        Transaction, TransactionState, TransactionType, core::create_transaction,
    },
};

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub category_id: Option<CategoryId>,
    /// Defaults to today (UTC).
    pub date: Option<Date>,
}

/// A route handler for creating a new transaction owned by the caller.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(claims): Extension<Claims>,
    AppJson(request): AppJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let mut builder = Transaction::build(request.kind, request.amount, claims.id)
        .category_id(request.category_id);

    if let Some(date) = request.date {
        builder = builder.date(date);
    }

    let transaction = create_transaction(builder, &*state.db_connection.lock()?)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
