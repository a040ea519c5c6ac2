//! Inspect, validate, and convert teleporter maps.

#[macro_use]
extern crate tracing;

pub mod logging;
pub mod settings;
pub mod world_file;
