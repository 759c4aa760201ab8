// SeedScore - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or open files directly.

pub mod aggregator;
pub mod export;
pub mod model;
