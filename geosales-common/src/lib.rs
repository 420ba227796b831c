//! # geosales common library
//!
//! Shared code for the geosales services:
//! - Error type and result alias
//! - TOML bootstrap configuration and config-file resolution
//! - Tracing subscriber initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
