pub mod api_key;
pub mod auth;

pub use api_key::{api_key_middleware, ApiKeyVerifier, API_KEY_HEADER};
pub use auth::{jwt_auth_middleware, AuthUser};
