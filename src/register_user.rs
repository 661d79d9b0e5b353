//! The route for registering a new user.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, PasswordHash,
    auth::Credentials,
    extract::AppJson,
    user::{Email, User, create_user},
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The bcrypt cost used to hash new passwords.
    pub password_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_cost: state.password_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new user.
///
/// Responds with the new user's ID and email. The password hash is never sent back.
///
/// # Errors
///
/// This function will return an error if the email is invalid or already registered, or if the
/// password is empty.
pub async fn register_user_endpoint(
    State(state): State<RegistrationState>,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<(StatusCode, Json<User>), Error> {
    let email = Email::new(&credentials.email)?;
    let password_hash = PasswordHash::from_raw_password(&credentials.password, state.password_cost)?;

    let user = create_user(email, password_hash, &*state.db_connection.lock()?)?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(user)))
}
