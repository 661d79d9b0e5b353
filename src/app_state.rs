//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Duration;

use crate::{Error, auth::TokenKeys, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The keys for signing and verifying bearer tokens.
    pub(crate) token_keys: TokenKeys,

    /// The bcrypt cost used when hashing new passwords.
    pub(crate) password_cost: u32,

    /// The database connection
    pub(crate) db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// Tokens are signed with `token_secret` and expire after `token_lifetime`, or never if it is
    /// `None`. New passwords are hashed with the bcrypt `password_cost`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        token_secret: &str,
        token_lifetime: Option<Duration>,
        password_cost: u32,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            token_keys: TokenKeys::new(token_secret, token_lifetime),
            password_cost,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
