// SeedScore - app/mod.rs
//
// Application layer: wires platform I/O to the core aggregator.

pub mod report;
