//! Helpers shared by the unit tests.

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, PasswordHash, build_router,
    auth::TokenResponse,
    db::initialize,
    endpoints,
    user::{Email, User, create_user},
};

/// The password every test user registers with.
pub const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// An initialised in-memory database.
pub fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    connection
}

/// Insert a user directly into the database.
pub fn create_test_user(email: &str, connection: &Connection) -> User {
    create_user(
        Email::new(email).unwrap(),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
}

/// A test server for the full router and the state behind it.
pub fn get_test_server() -> (TestServer, AppState) {
    let state = AppState::new(
        Connection::open_in_memory().expect("Could not open database in memory."),
        "42",
        None,
        4,
    )
    .expect("Could not create app state.");
    let server =
        TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

    (server, state)
}

/// Register a user with [TEST_PASSWORD] and return their ID.
pub async fn register_user(server: &TestServer, email: &str) -> i64 {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<Value>()["id"]
        .as_i64()
        .expect("Registration response is missing the user ID")
}

/// Register a user with [TEST_PASSWORD], log in and return the bearer token.
pub async fn register_and_log_in(server: &TestServer, email: &str) -> String {
    register_user(server, email).await;

    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();

    response.json::<TokenResponse>().token
}
