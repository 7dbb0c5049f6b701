// src/config/mod.rs
//! Configuration system for field-vault
//!
//! Central, lazy-loaded config with TOML + env overrides.

pub use app::{load, Config, Features, Keys, Rotation};

mod app;
mod defaults;
