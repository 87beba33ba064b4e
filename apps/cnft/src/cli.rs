//! # CLI Commands
//!
//! One `cmd_*` function per subcommand. Each validates input with
//! `cnft-core`, calls the API through [`ShyftClient`], prints a report and
//! returns it so callers (and tests) can inspect the outcome.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cnft_core::{Attribute, MetadataDraft, Network, TreeOptions, try_resolve_tree_options};
use cnft_core::{check_image, explorer};
use cnft_sdk::{
    BurnRequest, CreateTreeRequest, MetadataUpload, MintRequest, Nft, ShyftClient,
    SignableTransaction, TransferRequest,
};
use serde::Serialize;
use tracing::{info, warn};

// =============================================================================
// OUTPUT
// =============================================================================

/// A transaction returned by the API, ready for an external wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingTransaction {
    /// Which workflow produced it (`create-tree`, `mint`, ...).
    pub action: &'static str,
    pub network: Network,
    /// Account created or affected (tree address or NFT id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub encoded_transaction: String,
    pub signers: Vec<String>,
    /// Where the decoded bytes were written, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<PathBuf>,
}

impl PendingTransaction {
    fn new(
        action: &'static str,
        network: Network,
        address: Option<String>,
        tx: SignableTransaction,
    ) -> Self {
        Self {
            action,
            network,
            address,
            encoded_transaction: tx.encoded_transaction,
            signers: tx.signers,
            written_to: None,
        }
    }

    /// Decode the transaction and write its raw bytes to `path`.
    fn write_to(mut self, path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(self);
        };
        let tx = SignableTransaction {
            encoded_transaction: self.encoded_transaction.clone(),
            signers: self.signers.clone(),
        };
        let bytes = tx.decode().context("API returned an undecodable transaction")?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write transaction to {:?}", path))?;
        info!("Wrote {} transaction bytes to {:?}", bytes.len(), path);
        self.written_to = Some(path.to_path_buf());
        Ok(self)
    }

    /// Explorer link for the affected account. Everything but a tree is an NFT.
    fn explorer_url(&self) -> Option<String> {
        let address = self.address.as_deref()?;
        Some(if self.action == "create-tree" {
            explorer::address_url(address, self.network)
        } else {
            explorer::compressed_nft_url(address, self.network)
        })
    }

    fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }
        println!("Action: {}", self.action);
        println!("Network: {}", self.network.label());
        if let (Some(address), Some(url)) = (&self.address, self.explorer_url()) {
            println!("Address: {}", address);
            println!("Explorer: {}", url);
        }
        if self.signers.is_empty() {
            println!("Signers: (none)");
        } else {
            println!("Signers: {}", self.signers.join(", "));
        }
        if let Some(path) = &self.written_to {
            println!("Transaction bytes: {}", path.display());
        }
        println!("Encoded transaction:");
        println!("{}", self.encoded_transaction);
        println!();
        println!(
            "Sign and submit this transaction with your wallet to complete the {}.",
            self.action
        );
        Ok(())
    }
}

// =============================================================================
// TREE OPTIONS
// =============================================================================

/// Resolve and print the tree configuration for `nodes` leaves.
///
/// No network access. Out-of-range counts are rejected rather than silently
/// falling back to the default depth.
pub fn cmd_tree_options(nodes: i64, buffer_size: Option<u32>, json: bool) -> Result<TreeOptions> {
    let mut options = try_resolve_tree_options(nodes)?;
    if let Some(buffer_size) = buffer_size {
        options = options.with_buffer_size(buffer_size)?;
    }

    if json {
        let report = serde_json::json!({
            "nodes": nodes,
            "max_depth": options.max_depth,
            "max_buffer_size": options.max_buffer_size,
            "canopy_depth": options.canopy_depth,
            "capacity": options.capacity(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", options);
        println!("Capacity: {} leaves", options.capacity());
        let others: Vec<String> = cnft_core::tree::buffer_sizes_for(options.max_depth)
            .filter(|&b| b != options.max_buffer_size)
            .map(|b| b.to_string())
            .collect();
        if !others.is_empty() {
            println!("Other buffer sizes for this depth: {}", others.join(", "));
        }
    }

    Ok(options)
}

// =============================================================================
// CREATE TREE
// =============================================================================

/// Build a tree creation transaction sized for `nodes` leaves.
pub async fn cmd_create_tree(
    client: &ShyftClient,
    network: Network,
    wallet: &str,
    nodes: i64,
    buffer_size: Option<u32>,
    fee_payer: Option<&str>,
    tx_out: Option<&Path>,
    json: bool,
) -> Result<PendingTransaction> {
    let mut options = try_resolve_tree_options(nodes)?;
    if let Some(buffer_size) = buffer_size {
        options = options.with_buffer_size(buffer_size)?;
    }
    info!(nodes, %options, %network, "Creating tree");

    let request = CreateTreeRequest::new(network, wallet, &options)?.with_fee_payer(fee_payer)?;
    let result = client
        .create_tree(&request)
        .await
        .context("Failed to create Merkle tree")?;

    let tx = result.transaction();
    let pending =
        PendingTransaction::new("create-tree", network, Some(result.tree), tx).write_to(tx_out)?;
    pending.print(json)?;
    Ok(pending)
}

// =============================================================================
// MINT
// =============================================================================

/// Inputs of the mint workflow.
#[derive(Debug, Clone)]
pub struct MintArgs {
    pub network: Network,
    pub wallet: String,
    pub tree: String,
    pub image: PathBuf,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub external_url: Option<String>,
    pub attributes: Vec<Attribute>,
    pub collection: Option<String>,
    pub receiver: Option<String>,
}

/// MIME type for an image path, by extension.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

/// Upload the image and metadata, then build a mint transaction.
pub async fn cmd_mint(
    client: &ShyftClient,
    args: MintArgs,
    tx_out: Option<&Path>,
    json: bool,
) -> Result<PendingTransaction> {
    let draft = MetadataDraft {
        name: args.name,
        symbol: args.symbol,
        description: args.description,
        external_url: args.external_url.unwrap_or_default(),
        attributes: args.attributes,
    }
    .validate()?;

    // Check every address before uploading anything.
    let request_template = MintRequest::new(args.network, &args.wallet, "pending", &args.tree)?
        .with_collection(args.collection.as_deref())?
        .with_receiver(args.receiver.as_deref())?
        .with_fee_payer(Some(&args.wallet))?;

    let mime = guess_mime(&args.image);
    let size = std::fs::metadata(&args.image)
        .with_context(|| format!("Failed to read image {:?}", args.image))?
        .len();
    check_image(mime, size).with_context(|| format!("Cannot upload {:?}", args.image))?;

    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("Failed to read image {:?}", args.image))?;
    let file_name = args
        .image
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();

    info!("Uploading image {} ({} bytes)", file_name, bytes.len());
    let image = client
        .upload(&file_name, bytes, mime)
        .await
        .context("Upload error")?;

    let metadata = MetadataUpload::from_draft(&draft, &image.uri, mime, &args.wallet)?;
    info!("Uploading metadata for {}", metadata.name);
    let metadata_uri = client
        .upload_metadata(&metadata)
        .await
        .context("Upload error")?
        .uri;

    let request = MintRequest {
        metadata_uri,
        ..request_template
    };
    let result = client.mint(&request).await.context("Failed to mint NFT")?;

    let tx = result.transaction();
    let pending =
        PendingTransaction::new("mint", args.network, Some(result.mint), tx).write_to(tx_out)?;
    pending.print(json)?;
    Ok(pending)
}

// =============================================================================
// TRANSFER / BURN
// =============================================================================

/// Build a transfer transaction.
pub async fn cmd_transfer(
    client: &ShyftClient,
    network: Network,
    tree: &str,
    nft: &str,
    sender: &str,
    receiver: &str,
    tx_out: Option<&Path>,
    json: bool,
) -> Result<PendingTransaction> {
    let request = TransferRequest::new(network, tree, nft, sender, receiver)?;
    info!(nft = %request.nft_address, receiver = %request.receiver, "Transferring");
    let tx = client
        .transfer(&request)
        .await
        .context("Failed to transfer NFT")?;

    let pending = PendingTransaction::new("transfer", network, Some(request.nft_address), tx)
        .write_to(tx_out)?;
    pending.print(json)?;
    Ok(pending)
}

/// Build a burn transaction.
///
/// Without `nft`, burns the wallet's compressed NFT if it owns exactly one.
pub async fn cmd_burn(
    client: &ShyftClient,
    network: Network,
    wallet: &str,
    tree: &str,
    nft: Option<&str>,
    tx_out: Option<&Path>,
    json: bool,
) -> Result<PendingTransaction> {
    let nft = match nft {
        Some(nft) => nft.to_string(),
        None => {
            let owned = client
                .read_all(wallet, network)
                .await
                .context("Failed to list wallet NFTs")?;
            let only = match owned.as_slice() {
                [] => bail!("Wallet {} owns no compressed NFTs on {}", wallet, network),
                [only] => only,
                many => {
                    let mints: Vec<&str> = many.iter().map(|nft| nft.mint.as_str()).collect();
                    bail!(
                        "Wallet {} owns {} compressed NFTs; pass --nft with one of: {}",
                        wallet,
                        many.len(),
                        mints.join(", ")
                    );
                }
            };
            warn!("No --nft given, burning the wallet's only NFT {} ({})", only.mint, only.name);
            if !json {
                println!("Selected NFT: {} ({})", only.name, only.mint);
            }
            only.mint.clone()
        }
    };

    let request = BurnRequest::new(network, tree, &nft, wallet)?;
    let tx = client.burn(&request).await.context("Failed to burn NFT")?;

    let pending = PendingTransaction::new("burn", network, Some(request.nft_address), tx)
        .write_to(tx_out)?;
    pending.print(json)?;
    Ok(pending)
}

// =============================================================================
// VIEW
// =============================================================================

fn print_nft(nft: &Nft, network: Network) {
    println!("{} ({})", nft.name, nft.symbol);
    println!("  Mint: {}", nft.mint);
    println!("  Owner: {}", nft.owner);
    if !nft.image_uri.is_empty() {
        println!("  Image: {}", nft.image_uri);
    }
    if let Some(collection) = nft.collection.address.as_deref() {
        println!("  Collection: {}", collection);
    }
    for (trait_type, value) in &nft.attributes {
        println!("  {}: {}", trait_type, value);
    }
    println!("  Explorer: {}", explorer::compressed_nft_url(&nft.mint, network));
}

/// List every compressed NFT a wallet owns.
pub async fn cmd_view(
    client: &ShyftClient,
    network: Network,
    wallet: &str,
    json: bool,
) -> Result<Vec<Nft>> {
    let nfts = client
        .read_all(wallet, network)
        .await
        .context("Failed to list NFTs")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&nfts)?);
    } else if nfts.is_empty() {
        println!("No compressed NFTs found for {} on {}", wallet, network.label());
    } else {
        println!("{} compressed NFT(s) on {}:", nfts.len(), network.label());
        for nft in &nfts {
            print_nft(nft, network);
        }
    }

    Ok(nfts)
}

/// Show a single compressed NFT.
pub async fn cmd_show(
    client: &ShyftClient,
    network: Network,
    nft: &str,
    json: bool,
) -> Result<Nft> {
    let nft = client.read(nft, network).await.context("Failed to read NFT")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&nft)?);
    } else {
        print_nft(&nft, network);
    }
    Ok(nft)
}
