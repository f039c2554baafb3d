//! DECT MAC configuration management
//!
//! This crate provides configuration loading and shared state for the slot manager:
//! - TOML configuration file parsing
//! - Immutable MAC configuration structures
//! - Lock-guarded mutable MAC state, holding the slot allocator

pub mod mac_config;
pub mod toml_config;

pub use mac_config::*;
pub use toml_config::*;
