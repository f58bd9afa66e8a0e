// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs after jwt_auth_middleware, so AuthUser is always
// present in the request extensions.

pub mod landing_page;
pub mod sitemap;

pub use landing_page::jurisdictions;
pub use sitemap::urls;
