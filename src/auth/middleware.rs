//! Authentication middleware that requires a valid bearer token on protected routes.

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    AppState, Error,
    auth::token::{Claims, TokenKeys, decode_token},
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The keys used to verify bearer tokens.
    pub token_keys: TokenKeys,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token.
///
/// The token's claims are placed into the request and the request executed normally if the token
/// is valid. A missing `Authorization` header gives a 401 response and any other problem with the
/// header or token gives a 403 response.
///
/// **Note**: Route handlers can use the function argument `Extension(claims): Extension<Claims>`
/// to receive the claims.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let claims = match authenticate(&mut parts, &state.token_keys).await {
        Ok(claims) => claims,
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(claims);
    next.run(Request::from_parts(parts, body)).await
}

async fn authenticate(parts: &mut Parts, token_keys: &TokenKeys) -> Result<Claims, Error> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|rejection| {
            if rejection.is_missing() {
                Error::Unauthorized
            } else {
                tracing::debug!("Malformed authorization header: {rejection}");
                Error::Forbidden
            }
        })?;

    decode_token(bearer.token(), token_keys)
}
