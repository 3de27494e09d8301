//! HTTP API for the graph gateway

pub mod graph_handlers;
pub mod handlers;
pub mod media_handlers;
pub mod query;
pub mod routes;
pub mod user_handlers;

pub use handlers::AppError;
pub use query::*;
pub use routes::create_router;
