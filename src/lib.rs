//! Registry Steward - Backend Library
//!
//! Administrative workflow layer for registered service definitions:
//! a git-backed submission/review/promotion pipeline plus a queue of
//! pending registration requests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod vcs;

pub use config::Config;
pub use error::{AppError, Result};
