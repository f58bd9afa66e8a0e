// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Routes: /, /health, /classify_query

pub mod classify;
pub mod status;

pub use classify::classify_query;
pub use status::{health, root};
