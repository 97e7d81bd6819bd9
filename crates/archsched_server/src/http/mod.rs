//! HTTP surface: share endpoints and health.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod types;

pub use error::ApiError;
pub use routes::routes;
