//! Networking utilities

pub mod client;

pub use client::HttpClient;
