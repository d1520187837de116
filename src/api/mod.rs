//! API Module
//!
//! Administrative HTTP surface over the cache manager.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
