pub mod auth;
pub mod limit;
pub mod response;

pub use auth::{require_auth, AuthUser};
pub use limit::reject_oversized_body;
pub use response::{ApiResponse, ApiResult};
