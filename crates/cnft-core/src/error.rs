//! # Error Module
//!
//! Validation failures raised before anything leaves the process.

use thiserror::Error;

/// Errors from the cNFT core rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Requested leaf count is zero or negative.
    #[error("Number of nodes must be at least 1, got {0}")]
    InvalidNodeCount(i64),

    /// Requested leaf count does not fit in the deepest supported tree.
    #[error("Number of nodes {requested} exceeds the maximum tree capacity of {max}")]
    CapacityExceeded { requested: i64, max: u64 },

    /// Depth and buffer size are not a supported combination.
    #[error("Unsupported depth/buffer pair: max_depth={max_depth}, max_buffer_size={max_buffer_size}")]
    InvalidDepthSizePair {
        max_depth: u32,
        max_buffer_size: u32,
    },

    /// Not a base58-encoded 32-byte public key.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A metadata or form field failed its length rules.
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Cluster name not recognised.
    #[error("Unknown network: {0} (expected mainnet-beta, devnet or testnet)")]
    UnknownNetwork(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
