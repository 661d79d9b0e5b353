//! Authentication: issuing bearer tokens at log-in and checking them on protected routes.

mod log_in;
mod middleware;
mod token;

pub use log_in::{Credentials, log_in_endpoint};
pub use middleware::auth_guard;
pub use token::{Claims, TokenKeys};

#[cfg(test)]
pub use log_in::TokenResponse;
