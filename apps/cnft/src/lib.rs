//! # cNFT Library
//!
//! This library exposes the `cnft` commands for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod config;

// Re-export the underlying crates for convenience
pub use cnft_core;
pub use cnft_sdk;
