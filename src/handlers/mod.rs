// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (JWT auth, optionally API key)
//
// Which guard applies to which group is decided where routes are composed
// (crate::app), never inside a handler.
pub mod protected;
pub mod public;
