//! Web site module for Yatube.
//!
//! Server-rendered HTML pages on axum. Sessions are signed tokens kept in
//! a cookie; pages that need a user redirect anonymous visitors to the
//! login page.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::PageError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
