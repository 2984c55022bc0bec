// Loganizer - app/mod.rs
//
// Application layer: batch dispatch and run orchestration.
// Dependencies: core, platform.

pub mod dispatch;
pub mod run;
