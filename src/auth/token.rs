//! Issues and verifies the signed JSON Web Tokens used as bearer tokens.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    Error,
    user::{Email, User, UserID},
};

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub id: UserID,
    /// Email associated with the token.
    pub email: Email,
    /// The time the token was issued, in seconds since the Unix epoch.
    pub iat: u64,
    /// The expiry time of the token, in seconds since the Unix epoch.
    ///
    /// Tokens without an expiry time never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// The keys used to sign and verify tokens, and how long signed tokens stay valid.
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Option<Duration>,
}

impl TokenKeys {
    /// Create keys for HMAC-SHA256 signatures from `secret`.
    ///
    /// Tokens expire `lifetime` after they are issued, or never if `lifetime` is `None`.
    pub fn new(secret: &str, lifetime: Option<Duration>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// Sign a token for `user`.
///
/// # Errors
///
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn encode_token(user: &User, keys: &TokenKeys) -> Result<String, Error> {
    let iat = get_current_timestamp();
    let exp = keys
        .lifetime
        .map(|lifetime| iat.saturating_add(lifetime.whole_seconds().max(0) as u64));

    let claims = Claims {
        id: user.id,
        email: user.email.clone(),
        iat,
        exp,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify `token` and return its claims.
///
/// An `exp` claim is only checked when present.
///
/// # Errors
///
/// Returns [Error::Forbidden] if the token is malformed, was not signed with `keys` or has expired.
pub fn decode_token(token: &str, keys: &TokenKeys) -> Result<Claims, Error> {
    decode::<Claims>(token, &keys.decoding_key, &validation())
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::debug!("Rejected token: {error}");
            Error::Forbidden
        })
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.leeway = 0;
    validation
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, Header, encode, get_current_timestamp};
    use time::Duration;

    use crate::{
        Error, PasswordHash,
        auth::token::{Claims, TokenKeys, decode_token, encode_token},
        user::{Email, User, UserID},
    };

    fn get_test_user() -> User {
        User {
            id: UserID::new(7),
            email: Email::new("averyemail@email.com").unwrap(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        }
    }

    #[test]
    fn decoded_token_has_user_id_and_email() {
        let keys = TokenKeys::new("foobar", None);
        let user = get_test_user();

        let token = encode_token(&user, &keys).unwrap();
        let claims = decode_token(&token, &keys).unwrap();

        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn token_expires_after_lifetime() {
        let keys = TokenKeys::new("foobar", Some(Duration::minutes(15)));

        let token = encode_token(&get_test_user(), &keys).unwrap();
        let claims = decode_token(&token, &keys).unwrap();

        assert_eq!(claims.exp, Some(claims.iat + 15 * 60));
    }

    #[test]
    fn decode_fails_with_other_secret() {
        let token = encode_token(&get_test_user(), &TokenKeys::new("foobar", None)).unwrap();

        let result = decode_token(&token, &TokenKeys::new("bazqux", None));

        assert_eq!(result, Err(Error::Forbidden));
    }

    #[test]
    fn decode_fails_on_garbage() {
        let keys = TokenKeys::new("foobar", None);

        assert_eq!(decode_token("not.a.token", &keys), Err(Error::Forbidden));
        assert_eq!(decode_token("", &keys), Err(Error::Forbidden));
    }

    #[test]
    fn decode_fails_on_expired_token() {
        let keys = TokenKeys::new("foobar", None);
        let now = get_current_timestamp();
        let claims = Claims {
            id: UserID::new(1),
            email: Email::new("foo@bar.baz").unwrap(),
            iat: now - 3600,
            exp: Some(now - 60),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding_key).unwrap();

        assert_eq!(decode_token(&token, &keys), Err(Error::Forbidden));
    }
}
