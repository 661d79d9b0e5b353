//! Route handlers for creating and listing budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Claims,
    budget::core::{Budget, create_budget, get_budgets_by_user},
    extract::AppJson,
    month::CalendarMonth,
};

/// The state needed by the budget route handlers.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub amount: f64,
    pub month: u8,
    pub year: i32,
}

/// A route handler for creating a budget owned by the caller.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(claims): Extension<Claims>,
    AppJson(request): AppJson<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let month = CalendarMonth::new(request.year, request.month)?;

    let budget = create_budget(
        request.amount,
        month,
        claims.id,
        &*state.db_connection.lock()?,
    )?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// A route handler for listing the caller's budgets.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Budget>>, Error> {
    let connection = state.db_connection.lock()?;

    get_budgets_by_user(claims.id, &connection).map(Json)
}
