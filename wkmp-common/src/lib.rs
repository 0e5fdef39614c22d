//! # WKMP Common Library
//!
//! Shared code for WKMP microservices including:
//! - Error types shared by every module
//! - Bootstrap TOML discovery and loading
//! - Logging configuration

pub mod config;
pub mod error;

pub use error::{Error, Result};
