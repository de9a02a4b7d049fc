// handlers/mod.rs - Two security tiers
//
// Public (no session) → Protected (session resolved by the access guard)
pub mod protected; // /api/*
pub mod public; // /, /health
