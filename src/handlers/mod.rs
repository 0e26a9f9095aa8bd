// handlers/mod.rs - two handler tiers
//
// Public (no auth) -> Protected (bearer token resolved to a Principal)
pub mod protected; // Authentication required (/api/*)
pub mod public; // No authentication (/, /health)
