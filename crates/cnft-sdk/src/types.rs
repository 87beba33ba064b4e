//! Request and response bodies of the compressed-NFT API.
//!
//! Field names match the wire format exactly, including the API's
//! `primary_sale_happend` spelling.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cnft_core::metadata::{DEFAULT_CREATOR_SHARE, DEFAULT_ROYALTY_BASIS_POINTS};
use cnft_core::{
    Attribute, DepthSizePair, MetadataDraft, Network, TreeOptions, validate_address,
    validate_optional_address,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// Treat `null` the same as a missing field.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// Envelope wrapping every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    pub success: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub message: String,
    #[serde(default)]
    pub result: Option<T>,
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// A transaction built by the API, waiting for the wallet's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignableTransaction {
    /// Base64-encoded serialized transaction.
    pub encoded_transaction: String,
    /// Public keys that still need to sign.
    #[serde(default, deserialize_with = "null_to_default")]
    pub signers: Vec<String>,
}

impl SignableTransaction {
    /// Decode the serialized transaction bytes.
    pub fn decode(&self) -> Result<Vec<u8>, Error> {
        Ok(STANDARD.decode(self.encoded_transaction.trim())?)
    }
}

// =============================================================================
// CREATE TREE
// =============================================================================

/// Body of `POST /sol/v1/nft/compressed/create_tree`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTreeRequest {
    pub network: Network,
    pub wallet_address: String,
    pub max_depth_size_pair: DepthSizePair,
    pub canopy_depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<String>,
}

impl CreateTreeRequest {
    /// Build a request from resolved tree options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the wallet is not a valid address or
    /// the options do not name a supported depth/buffer pair.
    pub fn new(
        network: Network,
        wallet_address: &str,
        options: &TreeOptions,
    ) -> Result<Self, Error> {
        let pair = options.depth_size_pair();
        let max_depth_size_pair = DepthSizePair::new_checked(pair.max_depth, pair.max_buffer_size)?;
        Ok(Self {
            network,
            wallet_address: validate_address(wallet_address)?,
            max_depth_size_pair,
            canopy_depth: options.canopy_depth,
            fee_payer: None,
        })
    }

    /// Have a different account pay the rent and fees.
    pub fn with_fee_payer(mut self, fee_payer: Option<&str>) -> Result<Self, Error> {
        self.fee_payer = validate_optional_address(fee_payer)?;
        Ok(self)
    }
}

/// Result of tree creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTreeResult {
    pub encoded_transaction: String,
    /// Address of the new tree account.
    pub tree: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub signers: Vec<String>,
}

impl CreateTreeResult {
    pub fn transaction(&self) -> SignableTransaction {
        SignableTransaction {
            encoded_transaction: self.encoded_transaction.clone(),
            signers: self.signers.clone(),
        }
    }
}

// =============================================================================
// MINT
// =============================================================================

/// Body of `POST /sol/v1/nft/compressed/mint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub network: Network,
    pub creator_wallet: String,
    pub metadata_uri: String,
    pub merkle_tree: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_delegate_authority: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_supply: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_sale_happend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mutable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_payer: Option<String>,
}

impl MintRequest {
    /// Mint into `merkle_tree` with metadata already uploaded to `metadata_uri`.
    pub fn new(
        network: Network,
        creator_wallet: &str,
        metadata_uri: impl Into<String>,
        merkle_tree: &str,
    ) -> Result<Self, Error> {
        let metadata_uri = metadata_uri.into();
        if metadata_uri.trim().is_empty() {
            return Err(Error::Validation(cnft_core::CoreError::InvalidField {
                field: "metadata_uri",
                reason: "this field is required".to_string(),
            }));
        }
        Ok(Self {
            network,
            creator_wallet: validate_address(creator_wallet)?,
            metadata_uri,
            merkle_tree: validate_address(merkle_tree)?,
            is_delegate_authority: None,
            collection_address: None,
            max_supply: None,
            primary_sale_happend: None,
            is_mutable: None,
            receiver: None,
            fee_payer: None,
        })
    }

    /// Attach the NFT to a verified collection.
    pub fn with_collection(mut self, collection: Option<&str>) -> Result<Self, Error> {
        self.collection_address = validate_optional_address(collection)?;
        Ok(self)
    }

    /// Send the minted NFT to someone other than the creator.
    pub fn with_receiver(mut self, receiver: Option<&str>) -> Result<Self, Error> {
        self.receiver = validate_optional_address(receiver)?;
        Ok(self)
    }

    pub fn with_fee_payer(mut self, fee_payer: Option<&str>) -> Result<Self, Error> {
        self.fee_payer = validate_optional_address(fee_payer)?;
        Ok(self)
    }
}

/// Result of a mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintResult {
    pub encoded_transaction: String,
    /// Asset id of the minted NFT.
    pub mint: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub signers: Vec<String>,
}

impl MintResult {
    pub fn transaction(&self) -> SignableTransaction {
        SignableTransaction {
            encoded_transaction: self.encoded_transaction.clone(),
            signers: self.signers.clone(),
        }
    }
}

// =============================================================================
// TRANSFER / BURN
// =============================================================================

/// Body of `POST /sol/v1/nft/compressed/transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub network: Network,
    pub merkle_tree: String,
    pub nft_address: String,
    pub sender: String,
    pub receiver: String,
}

impl TransferRequest {
    pub fn new(
        network: Network,
        merkle_tree: &str,
        nft_address: &str,
        sender: &str,
        receiver: &str,
    ) -> Result<Self, Error> {
        Ok(Self {
            network,
            merkle_tree: validate_address(merkle_tree)?,
            nft_address: validate_address(nft_address)?,
            sender: validate_address(sender)?,
            receiver: validate_address(receiver)?,
        })
    }
}

/// Body of `DELETE /sol/v1/nft/compressed/burn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnRequest {
    pub network: Network,
    pub merkle_tree: String,
    pub nft_address: String,
    pub wallet_address: String,
}

impl BurnRequest {
    pub fn new(
        network: Network,
        merkle_tree: &str,
        nft_address: &str,
        wallet_address: &str,
    ) -> Result<Self, Error> {
        Ok(Self {
            network,
            merkle_tree: validate_address(merkle_tree)?,
            nft_address: validate_address(nft_address)?,
            wallet_address: validate_address(wallet_address)?,
        })
    }
}

// =============================================================================
// READ
// =============================================================================

/// A creator entry in on-chain metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default, deserialize_with = "null_to_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub verified: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub share: u8,
}

/// Collection membership of an NFT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
}

/// A file listed in off-chain metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftFile {
    #[serde(default, deserialize_with = "null_to_default")]
    pub uri: String,
    #[serde(rename = "type", default, deserialize_with = "null_to_default")]
    pub mime: String,
}

/// A compressed NFT as returned by the read endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nft {
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub image_uri: String,
    #[serde(default)]
    pub royalty: Option<serde_json::Number>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub mint: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub owner: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub update_authority: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub cached_image_uri: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub animation_url: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub cached_animation_url: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub metadata_uri: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub creators: Vec<Creator>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub collection: CollectionInfo,
    #[serde(default)]
    pub attributes_array: serde_json::Value,
    #[serde(default, deserialize_with = "null_to_default")]
    pub files: Vec<NftFile>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub external_url: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_loaded_metadata: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub primary_sale_happened: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_mutable: bool,
}

/// `result` of `GET /sol/v1/nft/compressed/read_all`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct NftList {
    #[serde(default, deserialize_with = "null_to_default")]
    pub nfts: Vec<Nft>,
}

// =============================================================================
// STORAGE
// =============================================================================

/// Location of an uploaded file or metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub cid: String,
    pub uri: String,
}

/// Body of `POST /sol/v1/metadata/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataUpload {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
    /// Royalty in basis points.
    pub royalty: u16,
    pub creator: String,
    pub share: u8,
    pub external_url: String,
    pub files: Vec<NftFile>,
}

impl MetadataUpload {
    /// Build the metadata document for an image that has already been uploaded.
    ///
    /// The draft is validated again; the creator receives the full royalty share.
    pub fn from_draft(
        draft: &MetadataDraft,
        image_uri: &str,
        image_mime: &str,
        creator: &str,
    ) -> Result<Self, Error> {
        let draft = draft.clone().validate()?;
        Ok(Self {
            name: draft.name,
            symbol: draft.symbol,
            description: draft.description,
            image: image_uri.to_string(),
            attributes: draft.attributes,
            royalty: DEFAULT_ROYALTY_BASIS_POINTS,
            creator: validate_address(creator)?,
            share: DEFAULT_CREATOR_SHARE,
            external_url: draft.external_url,
            files: vec![NftFile {
                uri: image_uri.to_string(),
                mime: image_mime.to_string(),
            }],
        })
    }
}
