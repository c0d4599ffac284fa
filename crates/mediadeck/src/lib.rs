//! Mediadeck core
//!
//! Content providers, local persistence, and networking utilities for the
//! mediadeck dashboard.

pub mod config;
pub mod debounce;
pub mod error;
pub mod network;
pub mod providers;
pub mod store;

pub use error::{AppError, Result};
