// Loganizer - platform/mod.rs
//
// Platform layer: config directory resolution, config.toml, descriptor
// list files.

pub mod config;
pub mod descriptors;
