// Loganizer - lib.rs
//
// Library entry point, exposing all modules for integration testing
// and programmatic use of the analysis engine.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
