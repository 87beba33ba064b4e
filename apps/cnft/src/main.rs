//! cNFT Tools CLI
//!
//! Create Merkle trees, mint, transfer, burn and view compressed NFTs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cnft::cli::{
    MintArgs, cmd_burn, cmd_create_tree, cmd_mint, cmd_show, cmd_transfer, cmd_tree_options,
    cmd_view,
};
use cnft::config::{Config, Overrides, Settings, default_config_path};
use cnft_core::{Attribute, Network, parse_attribute};
use cnft_sdk::ShyftClient;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// cNFT Tools - no-code tools for compressed NFTs
#[derive(Parser)]
#[command(name = "cnft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/cnft/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Shyft API key
    #[arg(long, env = "SHYFT_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// API endpoint
    #[arg(long, env = "CNFT_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Cluster to use (mainnet-beta, devnet, testnet)
    #[arg(long, env = "CNFT_NETWORK", global = true, value_parser = parse_network)]
    network: Option<Network>,

    /// Write the decoded transaction bytes to this file
    #[arg(long, global = true)]
    tx_out: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tree configuration for a number of leaves (offline)
    TreeOptions {
        /// Number of NFTs the tree must hold
        nodes: i64,

        /// Use a larger supported buffer size for the resolved depth
        #[arg(long)]
        buffer_size: Option<u32>,
    },

    /// Create a Merkle tree sized for a number of NFTs
    CreateTree {
        /// Wallet that will own the tree
        #[arg(short, long)]
        wallet: String,

        /// Number of NFTs the tree must hold (1 to 1073741824)
        #[arg(short, long, default_value = "32")]
        nodes: i64,

        /// Use a larger supported buffer size for the resolved depth
        #[arg(long)]
        buffer_size: Option<u32>,

        /// Account paying for the tree, if not the wallet
        #[arg(long)]
        fee_payer: Option<String>,
    },

    /// Upload an image and metadata, then mint a compressed NFT
    Mint {
        /// Creator wallet (also pays the fees)
        #[arg(short, long)]
        wallet: String,

        /// Merkle tree to mint into
        #[arg(short, long)]
        tree: String,

        /// PNG or JPEG image, at most 5 MB
        #[arg(short, long)]
        image: PathBuf,

        /// NFT name (up to 32 characters)
        #[arg(long)]
        name: String,

        /// Symbol (up to 10 characters)
        #[arg(long)]
        symbol: String,

        /// Description (up to 1000 characters)
        #[arg(long)]
        description: String,

        /// External URL
        #[arg(long)]
        external_url: Option<String>,

        /// Attribute as trait=value (repeatable)
        #[arg(short, long = "attribute", value_parser = parse_attr)]
        attributes: Vec<Attribute>,

        /// Collection address
        #[arg(long)]
        collection: Option<String>,

        /// Receiver of the NFT, if not the creator
        #[arg(long)]
        receiver: Option<String>,
    },

    /// Transfer a compressed NFT
    Transfer {
        /// Merkle tree holding the NFT
        #[arg(short, long)]
        tree: String,

        /// NFT address
        #[arg(long)]
        nft: String,

        /// Current owner
        #[arg(long)]
        sender: String,

        /// New owner
        #[arg(long)]
        receiver: String,
    },

    /// Burn a compressed NFT
    Burn {
        /// Owner wallet
        #[arg(short, long)]
        wallet: String,

        /// Merkle tree holding the NFT
        #[arg(short, long)]
        tree: String,

        /// NFT address (required unless the wallet owns exactly one)
        #[arg(long)]
        nft: Option<String>,
    },

    /// List the compressed NFTs a wallet owns
    View {
        /// Owner wallet
        #[arg(short, long)]
        wallet: String,
    },

    /// Show one compressed NFT
    Show {
        /// NFT address
        nft: String,
    },

    /// Save --api-key, --endpoint and --network to the config file
    Configure,
}

fn parse_network(s: &str) -> Result<Network, String> {
    s.parse().map_err(|e: cnft_core::CoreError| e.to_string())
}

fn parse_attr(s: &str) -> Result<Attribute, String> {
    parse_attribute(s).map_err(|e| e.to_string())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "info,cnft=debug,cnft_sdk=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        api_key: cli.api_key.clone(),
        endpoint: cli.endpoint.clone(),
        network: cli.network,
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let config = match cli.config.clone().or_else(default_config_path) {
        Some(path) => Config::load_from(&path)?,
        None => Config::default(),
    };
    Ok(config.resolve(overrides(cli))?)
}

fn configure(cli: &Cli) -> Result<()> {
    let path = cli
        .config
        .clone()
        .or_else(default_config_path)
        .context("Cannot determine config path (set --config or HOME)")?;
    let config = Config::load_from(&path)?.merged(overrides(cli));
    config.save_to(&path)?;
    if cli.json {
        let report = serde_json::json!({
            "path": path,
            "api_key_set": config.api_key.is_some(),
            "endpoint": config.endpoint,
            "network": config.network,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Saved config to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::TreeOptions { nodes, buffer_size } => {
            cmd_tree_options(*nodes, *buffer_size, cli.json)?;
            return Ok(());
        }
        Commands::Configure => return configure(&cli),
        _ => {}
    }

    let settings = load_settings(&cli)?;
    let client = ShyftClient::with_base_url(&settings.endpoint, &settings.api_key)
        .context("Failed to build API client")?;
    tracing::debug!("Using endpoint {}", client.base_url());

    let tx_out = cli.tx_out.as_deref();
    let json = cli.json;

    match cli.command {
        Commands::TreeOptions { .. } | Commands::Configure => {}
        Commands::CreateTree {
            wallet,
            nodes,
            buffer_size,
            fee_payer,
        } => {
            let network = settings.network_or(Network::Devnet);
            cmd_create_tree(
                &client,
                network,
                &wallet,
                nodes,
                buffer_size,
                fee_payer.as_deref(),
                tx_out,
                json,
            )
            .await?;
        }
        Commands::Mint {
            wallet,
            tree,
            image,
            name,
            symbol,
            description,
            external_url,
            attributes,
            collection,
            receiver,
        } => {
            let args = MintArgs {
                network: settings.network_or(Network::Devnet),
                wallet,
                tree,
                image,
                name,
                symbol,
                description,
                external_url,
                attributes,
                collection,
                receiver,
            };
            cmd_mint(&client, args, tx_out, json).await?;
        }
        Commands::Transfer {
            tree,
            nft,
            sender,
            receiver,
        } => {
            let network = settings.network_or(Network::Devnet);
            cmd_transfer(&client, network, &tree, &nft, &sender, &receiver, tx_out, json).await?;
        }
        Commands::Burn { wallet, tree, nft } => {
            let network = settings.network_or(Network::Devnet);
            cmd_burn(&client, network, &wallet, &tree, nft.as_deref(), tx_out, json).await?;
        }
        Commands::View { wallet } => {
            let network = settings.network_or(Network::MainnetBeta);
            cmd_view(&client, network, &wallet, json).await?;
        }
        Commands::Show { nft } => {
            let network = settings.network_or(Network::MainnetBeta);
            cmd_show(&client, network, &nft, json).await?;
        }
    }

    Ok(())
}
