pub mod auth;
pub mod response;

pub use auth::{session_guard, AuthUser};
pub use response::{ApiResponse, ApiResult};
