//! Wallet Overview Example
//!
//! This example sizes a tree for a planned collection and lists the
//! compressed NFTs a wallet already owns.
//!
//! Prerequisites:
//! - `SHYFT_API_KEY` set in the environment
//!
//! Run with:
//! ```sh
//! cargo run -p cnft-sdk --example wallet_overview -- <WALLET> [NETWORK]
//! ```

use cnft_core::{Network, resolve_tree_options};
use cnft_sdk::{Error, ShyftClient};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut args = std::env::args().skip(1);
    let Some(wallet) = args.next() else {
        eprintln!("usage: wallet_overview <WALLET> [NETWORK]");
        return Ok(());
    };
    let network = match args.next() {
        Some(name) => name.parse::<Network>()?,
        None => Network::Devnet,
    };
    let api_key = std::env::var("SHYFT_API_KEY").unwrap_or_default();
    let client = ShyftClient::new(&api_key)?;

    println!("=== cNFT SDK Wallet Overview ===\n");

    // Step 1: Size a tree for 10,000 NFTs (no network)
    let options = resolve_tree_options(10_000);
    println!("1. Tree for 10,000 NFTs: {}", options);
    println!("   Capacity: {} leaves\n", options.capacity());

    // Step 2: List owned NFTs
    println!("2. NFTs owned by {} on {}...", wallet, network);
    match client.read_all(&wallet, network).await {
        Ok(nfts) if nfts.is_empty() => println!("   (none)"),
        Ok(nfts) => {
            for nft in nfts {
                println!("   {} [{}] {}", nft.name, nft.symbol, nft.mint);
            }
        }
        Err(e) => {
            eprintln!("   Request failed: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
