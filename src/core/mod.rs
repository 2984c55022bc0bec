// Loganizer - core/mod.rs
//
// Core business logic layer: data model, single-file inspection, report
// rendering and export.
// Must NOT depend on: platform or app.

pub mod export;
pub mod inspector;
pub mod model;
pub mod report;
