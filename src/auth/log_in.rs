//! This file defines the route for handling log-in requests.
//! A successful log-in is answered with a bearer token for the protected routes.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::token::{TokenKeys, encode_token},
    extract::AppJson,
    user::get_user_by_email,
};

/// The email and password sent to the register and log-in routes.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// The user's email address.
    pub email: String,
    /// The user's raw password.
    pub password: String,
}

/// The response to a successful log-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The bearer token for the protected routes.
    pub token: String,
}

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The keys used to sign tokens.
    pub token_keys: TokenKeys,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handler for log-in requests.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the token.
pub async fn log_in_endpoint(
    State(state): State<LogInState>,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<Json<TokenResponse>, Error> {
    let user = {
        let connection = state.db_connection.lock()?;

        get_user_by_email(&credentials.email, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    let password_is_correct = user
        .password_hash
        .verify(&credentials.password)
        .map_err(|error| {
            tracing::error!("Error verifying password: {error}");
            Error::HashingError(error.to_string())
        })?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(&user, &state.token_keys)?;
    tracing::debug!("User {} logged in", user.id);

    Ok(Json(TokenResponse { token }))
}
