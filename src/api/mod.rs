//! CryptoGuard HTTP API Module
//! JSON endpoints the browser extension calls for URL, contract and approval checks

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;
