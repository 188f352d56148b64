pub mod auth;
pub mod error_handler;
pub mod rate_limit;
pub mod request_id;

pub use auth::{hash_api_key, issue_api_key, Ability, ApiKeyAuth, ApiKeyRecord, Principal};
pub use error_handler::{json_config, path_config, query_config};
pub use rate_limit::RateLimiter;
pub use request_id::RequestId;
