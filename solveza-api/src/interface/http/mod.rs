//! HTTP 接口（axum）

pub mod error;
pub mod extract;
pub mod handlers;
pub mod openapi;
pub mod requests;
pub mod router;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use openapi::ApiDoc;
pub use router::build_router;
pub use state::AppState;
