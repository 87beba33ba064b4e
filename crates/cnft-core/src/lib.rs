//! # cNFT Core - The Logic
//!
//! Deterministic rules behind the compressed-NFT tools.
//!
//! Nothing here performs I/O. Every function is a pure transformation over
//! constant tables and caller input, so the same request always produces the
//! same tree configuration and the same validation outcome.
//!
//! ## Modules
//!
//! - [`tree`]: map a leaf count to a supported (depth, buffer, canopy) triple
//! - [`network`]: cluster names
//! - [`address`]: base58 public key checks
//! - [`metadata`]: off-chain metadata limits
//! - [`explorer`]: account and compressed NFT links

pub mod address;
pub mod error;
pub mod explorer;
pub mod metadata;
pub mod network;
pub mod tree;

pub use address::{validate_address, validate_optional_address};
pub use error::{CoreError, Result};
pub use metadata::{Attribute, MAX_IMAGE_BYTES, MetadataDraft, check_image, parse_attribute};
pub use network::Network;
pub use tree::{
    ALL_DEPTH_SIZE_PAIRS, DepthSizePair, MAX_TREE_NODES, TreeOptions, VALID_DEPTHS,
    canopy_depth_for, resolve_tree_options, try_resolve_tree_options,
};
