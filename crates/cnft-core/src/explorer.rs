//! # Explorer Module
//!
//! Links to the Shyft translator explorer.

use crate::network::Network;

/// Base URL of the explorer.
pub const EXPLORER_BASE_URL: &str = "https://translator.shyft.to";

/// Link to an account (tree or wallet) on the given cluster.
#[must_use]
pub fn address_url(address: &str, network: Network) -> String {
    format!("{}/address/{}?cluster={}", EXPLORER_BASE_URL, address, network)
}

/// Link to a compressed NFT, opened in the explorer's compressed view.
#[must_use]
pub fn compressed_nft_url(mint: &str, network: Network) -> String {
    format!("{}&compressed=true", address_url(mint, network))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_url() {
        assert_eq!(
            address_url("Tree111", Network::MainnetBeta),
            "https://translator.shyft.to/address/Tree111?cluster=mainnet-beta"
        );
    }

    #[test]
    fn test_compressed_nft_url() {
        assert_eq!(
            compressed_nft_url("Nft111", Network::Devnet),
            "https://translator.shyft.to/address/Nft111?cluster=devnet&compressed=true"
        );
    }
}
