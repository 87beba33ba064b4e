//! # Tree Module
//!
//! Sizing rules for concurrent Merkle trees that hold compressed NFTs.
//!
//! The on-chain compression program only accepts a fixed set of
//! (max_depth, max_buffer_size) combinations. Given a desired number of
//! leaves, [`resolve_tree_options`] picks the shallowest supported depth that
//! can hold them, the smallest buffer listed for that depth, and a canopy
//! depth derived from the tree height.
//!
//! ## Canopy
//!
//! The canopy caches the top levels of the tree on-chain. Deep trees are
//! capped at a canopy of 14 (17 - 3) to bound account rent.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Depth and buffer size used when no sizing is requested.
pub const DEFAULT_DEPTH_SIZE_PAIR: DepthSizePair = DepthSizePair::new(3, 8);

/// Largest number of leaves any supported tree can hold (2^30).
pub const MAX_TREE_NODES: u64 = 1 << 30;

/// Depths at or above this value have their canopy capped.
const CANOPY_CAP_DEPTH: u32 = 20;

/// Canopy base used once the cap applies.
const CANOPY_CAP: u32 = 17;

/// Levels always left out of the canopy.
const CANOPY_MARGIN: u32 = 3;

/// Every supported (max_depth, max_buffer_size) combination, in table order.
pub const ALL_DEPTH_SIZE_PAIRS: [DepthSizePair; 26] = [
    DepthSizePair::new(3, 8),
    DepthSizePair::new(5, 8),
    DepthSizePair::new(14, 64),
    DepthSizePair::new(14, 256),
    DepthSizePair::new(14, 1024),
    DepthSizePair::new(14, 2048),
    DepthSizePair::new(15, 64),
    DepthSizePair::new(16, 64),
    DepthSizePair::new(17, 64),
    DepthSizePair::new(18, 64),
    DepthSizePair::new(19, 64),
    DepthSizePair::new(20, 64),
    DepthSizePair::new(20, 256),
    DepthSizePair::new(20, 1024),
    DepthSizePair::new(20, 2048),
    DepthSizePair::new(24, 64),
    DepthSizePair::new(24, 256),
    DepthSizePair::new(24, 512),
    DepthSizePair::new(24, 1024),
    DepthSizePair::new(24, 2048),
    DepthSizePair::new(26, 512),
    DepthSizePair::new(26, 1024),
    DepthSizePair::new(26, 2048),
    DepthSizePair::new(30, 512),
    DepthSizePair::new(30, 1024),
    DepthSizePair::new(30, 2048),
];

/// Distinct depths from [`ALL_DEPTH_SIZE_PAIRS`], ascending.
pub const VALID_DEPTHS: [u32; 12] = [3, 5, 14, 15, 16, 17, 18, 19, 20, 24, 26, 30];

// =============================================================================
// DEPTH SIZE PAIR
// =============================================================================

/// A tree height together with its concurrent-update buffer capacity.
///
/// Serializes as `{"max_depth": .., "max_buffer_size": ..}`, the shape the
/// tree creation endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepthSizePair {
    pub max_depth: u32,
    pub max_buffer_size: u32,
}

impl DepthSizePair {
    /// Create a pair without checking it against the supported set.
    #[must_use]
    pub const fn new(max_depth: u32, max_buffer_size: u32) -> Self {
        Self {
            max_depth,
            max_buffer_size,
        }
    }

    /// Create a pair, rejecting combinations the program does not support.
    pub fn new_checked(max_depth: u32, max_buffer_size: u32) -> Result<Self> {
        let pair = Self::new(max_depth, max_buffer_size);
        if pair.is_valid() {
            Ok(pair)
        } else {
            Err(CoreError::InvalidDepthSizePair {
                max_depth,
                max_buffer_size,
            })
        }
    }

    /// Check membership in [`ALL_DEPTH_SIZE_PAIRS`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        ALL_DEPTH_SIZE_PAIRS.contains(self)
    }

    /// Number of leaves a tree of this depth can hold.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        leaf_capacity(self.max_depth)
    }
}

// =============================================================================
// TREE OPTIONS
// =============================================================================

/// A complete tree configuration ready to send to the tree creation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeOptions {
    pub max_depth: u32,
    pub max_buffer_size: u32,
    pub canopy_depth: u32,
}

impl TreeOptions {
    /// The depth/buffer half of the configuration.
    #[must_use]
    pub fn depth_size_pair(&self) -> DepthSizePair {
        DepthSizePair::new(self.max_depth, self.max_buffer_size)
    }

    /// Number of leaves the configured tree can hold.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        leaf_capacity(self.max_depth)
    }

    /// Swap in a different buffer size for the same depth.
    ///
    /// The resolver always picks the smallest buffer; callers expecting many
    /// concurrent writes use this to pick a larger one.
    pub fn with_buffer_size(self, max_buffer_size: u32) -> Result<Self> {
        let pair = DepthSizePair::new_checked(self.max_depth, max_buffer_size)?;
        Ok(Self {
            max_buffer_size: pair.max_buffer_size,
            ..self
        })
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH_SIZE_PAIR.max_depth,
            max_buffer_size: DEFAULT_DEPTH_SIZE_PAIR.max_buffer_size,
            canopy_depth: 0,
        }
    }
}

impl fmt::Display for TreeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max_depth = {}, max_buffer_size = {}, canopy_depth = {}",
            self.max_depth, self.max_buffer_size, self.canopy_depth
        )
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Leaf capacity of a tree with the given depth, saturating for depths past 63.
fn leaf_capacity(max_depth: u32) -> u64 {
    1u64.checked_shl(max_depth).unwrap_or(u64::MAX)
}

/// Every supported buffer size for a depth, in table order.
pub fn buffer_sizes_for(max_depth: u32) -> impl Iterator<Item = u32> {
    ALL_DEPTH_SIZE_PAIRS
        .into_iter()
        .filter(move |pair| pair.max_depth == max_depth)
        .map(|pair| pair.max_buffer_size)
}

/// Canopy depth used for a tree of the given height.
#[must_use]
pub fn canopy_depth_for(max_depth: u32) -> u32 {
    let base = if max_depth >= CANOPY_CAP_DEPTH {
        CANOPY_CAP
    } else {
        max_depth
    };
    base.saturating_sub(CANOPY_MARGIN)
}

/// Map a desired leaf count to the smallest supported tree that holds it.
///
/// Zero or negative counts return the default `{3, 8, 0}`. Counts above
/// [`MAX_TREE_NODES`] keep the default depth of 3, which cannot hold them;
/// use [`try_resolve_tree_options`] to reject those instead.
#[must_use]
pub fn resolve_tree_options(tree_nodes: i64) -> TreeOptions {
    if tree_nodes <= 0 {
        return TreeOptions::default();
    }

    let requested = tree_nodes.unsigned_abs();
    let max_depth = VALID_DEPTHS
        .iter()
        .copied()
        .find(|&depth| leaf_capacity(depth) >= requested)
        .unwrap_or(DEFAULT_DEPTH_SIZE_PAIR.max_depth);

    let max_buffer_size = buffer_sizes_for(max_depth)
        .next()
        .unwrap_or(DEFAULT_DEPTH_SIZE_PAIR.max_buffer_size);

    TreeOptions {
        max_depth,
        max_buffer_size,
        canopy_depth: canopy_depth_for(max_depth),
    }
}

/// Like [`resolve_tree_options`], but rejects counts no tree can serve.
pub fn try_resolve_tree_options(tree_nodes: i64) -> Result<TreeOptions> {
    if tree_nodes < 1 {
        return Err(CoreError::InvalidNodeCount(tree_nodes));
    }
    if tree_nodes.unsigned_abs() > MAX_TREE_NODES {
        return Err(CoreError::CapacityExceeded {
            requested: tree_nodes,
            max: MAX_TREE_NODES,
        });
    }
    Ok(resolve_tree_options(tree_nodes))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn opts(max_depth: u32, max_buffer_size: u32, canopy_depth: u32) -> TreeOptions {
        TreeOptions {
            max_depth,
            max_buffer_size,
            canopy_depth,
        }
    }

    #[test]
    fn test_non_positive_returns_default() {
        assert_eq!(resolve_tree_options(0), opts(3, 8, 0));
        assert_eq!(resolve_tree_options(-5), opts(3, 8, 0));
        assert_eq!(resolve_tree_options(i64::MIN), opts(3, 8, 0));
    }

    #[test]
    fn test_single_leaf() {
        assert_eq!(resolve_tree_options(1), opts(3, 8, 0));
    }

    #[test]
    fn test_exact_capacity_boundaries() {
        assert_eq!(resolve_tree_options(8), opts(3, 8, 0));
        assert_eq!(resolve_tree_options(9), opts(5, 8, 2));
        assert_eq!(resolve_tree_options(32), opts(5, 8, 2));
        assert_eq!(resolve_tree_options(33).max_depth, 14);
    }

    #[test]
    fn test_skips_unsupported_depths() {
        // 2^10 would be enough but depth 10 is not supported.
        assert_eq!(resolve_tree_options(1024), opts(14, 64, 11));
    }

    #[test]
    fn test_canopy_capped_for_deep_trees() {
        assert_eq!(resolve_tree_options(1 << 20), opts(20, 64, 14));
        assert_eq!(resolve_tree_options((1 << 20) + 1), opts(24, 64, 14));
        assert_eq!(resolve_tree_options(1 << 30), opts(30, 512, 14));
    }

    #[test]
    fn test_picks_smallest_buffer() {
        assert_eq!(resolve_tree_options(1 << 25).max_buffer_size, 512);
        assert_eq!(resolve_tree_options(1 << 19).max_buffer_size, 64);
    }

    #[test]
    fn test_over_capacity_keeps_default_depth() {
        assert_eq!(resolve_tree_options((1 << 30) + 1), opts(3, 8, 0));
        assert_eq!(resolve_tree_options(i64::MAX), opts(3, 8, 0));
    }

    #[test]
    fn test_try_resolve_rejects_out_of_range() {
        assert_eq!(
            try_resolve_tree_options(0),
            Err(CoreError::InvalidNodeCount(0))
        );
        assert_eq!(
            try_resolve_tree_options((1 << 30) + 1),
            Err(CoreError::CapacityExceeded {
                requested: (1 << 30) + 1,
                max: MAX_TREE_NODES,
            })
        );
        assert_eq!(try_resolve_tree_options(1 << 30), Ok(opts(30, 512, 14)));
    }

    #[test]
    fn test_canopy_for_every_valid_depth() {
        for depth in VALID_DEPTHS {
            let canopy = canopy_depth_for(depth);
            assert_eq!(canopy, depth.min(17).saturating_sub(3));
            assert!(canopy <= depth);
        }
    }

    #[test]
    fn test_valid_depths_match_table() {
        let mut depths: Vec<u32> = ALL_DEPTH_SIZE_PAIRS.iter().map(|p| p.max_depth).collect();
        depths.dedup();
        assert_eq!(depths, VALID_DEPTHS.to_vec());
    }

    #[test]
    fn test_buffer_sizes_for_depth() {
        let sizes: Vec<u32> = buffer_sizes_for(24).collect();
        assert_eq!(sizes, vec![64, 256, 512, 1024, 2048]);
        assert_eq!(buffer_sizes_for(10).count(), 0);
    }

    #[test]
    fn test_new_checked() {
        assert!(DepthSizePair::new_checked(14, 2048).is_ok());
        assert_eq!(
            DepthSizePair::new_checked(15, 256),
            Err(CoreError::InvalidDepthSizePair {
                max_depth: 15,
                max_buffer_size: 256,
            })
        );
    }

    #[test]
    fn test_with_buffer_size() {
        let options = resolve_tree_options(1 << 14);
        let wider = options.with_buffer_size(1024).unwrap();
        assert_eq!(wider, opts(14, 1024, 11));
        assert!(options.with_buffer_size(512).is_err());
    }

    #[test]
    fn test_display_matches_form_hint() {
        assert_eq!(
            resolve_tree_options(1024).to_string(),
            "max_depth = 14, max_buffer_size = 64, canopy_depth = 11"
        );
    }

    #[test]
    fn test_pair_wire_shape() {
        let json = serde_json::to_string(&DepthSizePair::new(14, 64)).unwrap();
        assert_eq!(json, r#"{"max_depth":14,"max_buffer_size":64}"#);
    }

    proptest! {
        #[test]
        fn prop_resolved_tree_is_minimal_and_valid(n in 1i64..=(1i64 << 30)) {
            let options = resolve_tree_options(n);
            prop_assert!(options.depth_size_pair().is_valid());
            prop_assert!(options.capacity() >= n.unsigned_abs());
            prop_assert!(options.canopy_depth <= options.max_depth);

            let smaller = VALID_DEPTHS.iter().take_while(|&&d| d < options.max_depth);
            for &depth in smaller {
                prop_assert!(leaf_capacity(depth) < n.unsigned_abs());
            }
        }

        #[test]
        fn prop_resolve_is_deterministic(n in any::<i64>()) {
            prop_assert_eq!(resolve_tree_options(n), resolve_tree_options(n));
        }

        #[test]
        fn prop_checked_agrees_in_range(n in 1i64..=(1i64 << 30)) {
            prop_assert_eq!(try_resolve_tree_options(n), Ok(resolve_tree_options(n)));
        }
    }
}
