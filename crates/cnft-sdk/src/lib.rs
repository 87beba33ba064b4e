//! # cNFT SDK - The Kit
//!
//! Client for the Shyft compressed-NFT HTTP API.
//!
//! The API does the heavy lifting: it builds tree creation, mint, transfer
//! and burn transactions server-side and returns them base64-encoded. This
//! SDK validates inputs with `cnft-core`, sends the request, and hands back
//! the transaction for an external wallet to sign.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cnft_sdk::{CreateTreeRequest, ShyftClient};
//! use cnft_core::{resolve_tree_options, Network};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cnft_sdk::Error> {
//!     let client = ShyftClient::new("my-api-key")?;
//!
//!     let options = resolve_tree_options(1024);
//!     let request = CreateTreeRequest::new(Network::Devnet, "<wallet>", &options)?;
//!     let result = client.create_tree(&request).await?;
//!     println!("Tree: {}", result.tree);
//!     println!("Sign and send: {}", result.encoded_transaction);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────────────┐          HTTP           ┌─────────────────────┐
//! │   cnft CLI          │ ◄───────────────────►   │   Shyft API         │
//! │                     │  create_tree / mint     │   (builds txs)      │
//! │  ┌───────────────┐  │  transfer / burn        └─────────────────────┘
//! │  │ cnft-sdk      │  │  read / read_all
//! │  └───────────────┘  │  upload / metadata      ┌─────────────────────┐
//! └─────────────────────┘ ──── encoded tx ──────► │   Wallet (external) │
//!                                                 └─────────────────────┘
//! ```

mod types;

pub use types::{
    BaseResponse, BurnRequest, CollectionInfo, CreateTreeRequest, CreateTreeResult, Creator,
    MetadataUpload, MintRequest, MintResult, Nft, NftFile, SignableTransaction, TransferRequest,
    UploadResult,
};

use cnft_core::{CoreError, Network};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use types::NftList;

/// Production API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.shyft.to";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the cNFT SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered 2xx but reported `success: false`.
    #[error("API error: {0}")]
    Api(String),

    /// Input rejected before sending.
    #[error("Invalid input: {0}")]
    Validation(#[from] CoreError),

    /// Encoded transaction is not valid base64.
    #[error("Transaction decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// API key cannot be sent as a header value.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
}

/// Pick the most specific message out of an error body.
fn error_message(body: &serde_json::Value) -> Option<String> {
    let direct = body.get("message").and_then(|m| m.as_str());
    let nested = body
        .get("data")
        .and_then(|d| d.get("message"))
        .and_then(|m| m.as_str());
    direct
        .filter(|m| !m.is_empty())
        .or(nested)
        .map(str::to_string)
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the compressed-NFT API.
#[derive(Debug, Clone)]
pub struct ShyftClient {
    base_url: String,
    client: reqwest::Client,
}

impl ShyftClient {
    /// Create a client for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidApiKey`] if the key contains invalid header
    /// characters, or [`Error::Request`] if the HTTP client fails to build.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_ENDPOINT, api_key)
    }

    /// Create a client for a custom endpoint.
    ///
    /// Sends `x-api-key: <api_key>` with every request and applies a
    /// 30-second timeout.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let client = ShyftClient::with_base_url("http://localhost:8080", "my-secret-key")?;
    /// ```
    pub fn with_base_url(base_url: impl Into<String>, api_key: &str) -> Result<Self, Error> {
        let mut value = HeaderValue::from_str(api_key.trim())
            .map_err(|e| Error::InvalidApiKey(e.to_string()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, value);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and unwrap the `{success, message, result}` envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let resp = request.send().await?;
        let status = resp.status();
        debug!(status = status.as_u16(), url = %resp.url(), "API response");

        if !status.is_success() {
            let is_json = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("application/json"));
            let reason = status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string();

            let message = if is_json {
                let bytes = resp.bytes().await?;
                match serde_json::from_slice::<serde_json::Value>(&bytes) {
                    Ok(body) => error_message(&body).unwrap_or(reason),
                    Err(e) => e.to_string(),
                }
            } else {
                reason
            };

            return Err(Error::Http {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        let envelope: BaseResponse<serde_json::Value> = serde_json::from_slice(&bytes)?;

        if !envelope.success {
            let message = if envelope.message.is_empty() {
                "Unknown error".to_string()
            } else {
                envelope.message
            };
            return Err(Error::Api(message));
        }

        match envelope.result {
            Some(result) if !result.is_null() => Ok(serde_json::from_value(result)?),
            _ => Err(Error::Api("response is missing a result".to_string())),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    /// Build a tree creation transaction.
    pub async fn create_tree(
        &self,
        request: &CreateTreeRequest,
    ) -> Result<CreateTreeResult, Error> {
        debug!(
            network = %request.network,
            max_depth = request.max_depth_size_pair.max_depth,
            max_buffer_size = request.max_depth_size_pair.max_buffer_size,
            canopy_depth = request.canopy_depth,
            "create_tree"
        );
        self.post("/sol/v1/nft/compressed/create_tree", request).await
    }

    /// Build a mint transaction.
    pub async fn mint(&self, request: &MintRequest) -> Result<MintResult, Error> {
        debug!(network = %request.network, tree = %request.merkle_tree, "mint");
        self.post("/sol/v1/nft/compressed/mint", request).await
    }

    /// Build a transfer transaction.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<SignableTransaction, Error> {
        debug!(network = %request.network, nft = %request.nft_address, "transfer");
        self.post("/sol/v1/nft/compressed/transfer", request).await
    }

    /// Build a burn transaction.
    ///
    /// The endpoint takes a JSON body on `DELETE`.
    pub async fn burn(&self, request: &BurnRequest) -> Result<SignableTransaction, Error> {
        debug!(network = %request.network, nft = %request.nft_address, "burn");
        let url = self.url("/sol/v1/nft/compressed/burn");
        self.send(self.client.delete(url).json(request)).await
    }

    /// List every compressed NFT owned by `wallet`.
    pub async fn read_all(&self, wallet: &str, network: Network) -> Result<Vec<Nft>, Error> {
        let wallet = cnft_core::validate_address(wallet)?;
        let url = self.url("/sol/v1/nft/compressed/read_all");
        let request = self
            .client
            .get(url)
            .query(&[("network", network.as_str()), ("wallet_address", wallet.as_str())]);
        let list: NftList = self.send(request).await?;
        Ok(list.nfts)
    }

    /// Read a single compressed NFT.
    pub async fn read(&self, nft_address: &str, network: Network) -> Result<Nft, Error> {
        let nft_address = cnft_core::validate_address(nft_address)?;
        let url = self.url("/sol/v1/nft/compressed/read");
        let request = self
            .client
            .get(url)
            .query(&[("network", network.as_str()), ("nft_address", nft_address.as_str())]);
        self.send(request).await
    }

    /// Upload a file to decentralized storage.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<UploadResult, Error> {
        debug!(file_name, size = bytes.len(), mime, "upload");
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let url = self.url("/sol/v1/storage/upload");
        self.send(self.client.post(url).multipart(form)).await
    }

    /// Upload an off-chain metadata document.
    pub async fn upload_metadata(&self, metadata: &MetadataUpload) -> Result<UploadResult, Error> {
        debug!(name = %metadata.name, "upload_metadata");
        self.post("/sol/v1/metadata/create", metadata).await
    }
}
