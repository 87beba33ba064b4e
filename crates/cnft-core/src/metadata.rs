//! # Metadata Module
//!
//! Field limits for the off-chain metadata attached to a minted NFT.
//!
//! Limits follow the Metaplex metadata account: names up to 32 characters,
//! symbols up to 10. Descriptions, links and attributes are bounded so the
//! uploaded JSON stays small.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Maximum characters in an NFT name.
pub const MAX_NAME_LEN: usize = 32;

/// Maximum characters in a symbol.
pub const MAX_SYMBOL_LEN: usize = 10;

/// Maximum characters in a description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Maximum characters in an external URL.
pub const MAX_EXTERNAL_URL_LEN: usize = 256;

/// Maximum characters in an attribute's trait type.
pub const MAX_TRAIT_TYPE_LEN: usize = 10;

/// Maximum characters in an attribute's value.
pub const MAX_TRAIT_VALUE_LEN: usize = 32;

/// Royalty applied to every mint, in basis points (5%).
pub const DEFAULT_ROYALTY_BASIS_POINTS: u16 = 500;

/// Share of royalties assigned to the single creator.
pub const DEFAULT_CREATOR_SHARE: u8 = 100;

/// Largest image accepted for upload (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Image MIME types accepted for upload.
pub const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

/// Check an image's type and size before it is uploaded.
pub fn check_image(mime: &str, size: u64) -> Result<()> {
    if !ACCEPTED_IMAGE_TYPES.contains(&mime) {
        return Err(CoreError::InvalidField {
            field: "image",
            reason: format!("only PNG and JPEG images are accepted, got {}", mime),
        });
    }
    if size == 0 {
        return Err(CoreError::InvalidField {
            field: "image",
            reason: "file is empty".to_string(),
        });
    }
    if size > MAX_IMAGE_BYTES {
        return Err(CoreError::InvalidField {
            field: "image",
            reason: format!("max file size is 5MB, got {} bytes", size),
        });
    }
    Ok(())
}

fn check_len(field: &'static str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        return Err(CoreError::InvalidField {
            field,
            reason: "this field is required".to_string(),
        });
    }
    if len > max {
        return Err(CoreError::InvalidField {
            field,
            reason: format!("at most {} characters allowed, got {}", max, len),
        });
    }
    Ok(())
}

/// A single `trait_type`/`value` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

impl Attribute {
    /// Create an attribute, trimming and validating both halves.
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let trait_type = trait_type.into().trim().to_string();
        let value = value.into().trim().to_string();
        check_len("trait_type", &trait_type, 1, MAX_TRAIT_TYPE_LEN)?;
        check_len("attribute value", &value, 1, MAX_TRAIT_VALUE_LEN)?;
        Ok(Self { trait_type, value })
    }
}

/// Parse a `trait=value` pair from the command line.
pub fn parse_attribute(input: &str) -> Result<Attribute> {
    let (trait_type, value) = input.split_once('=').ok_or_else(|| CoreError::InvalidField {
        field: "attribute",
        reason: format!("expected trait=value, got {:?}", input),
    })?;
    Attribute::new(trait_type, value)
}

/// User-supplied metadata, before the image has been uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDraft {
    pub name: String,
    pub symbol: String,
    pub description: String,
    #[serde(default)]
    pub external_url: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl MetadataDraft {
    /// Create a draft with only the required fields.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Trim every field and check it against its limits.
    pub fn validate(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        self.symbol = self.symbol.trim().to_string();
        self.description = self.description.trim().to_string();
        self.external_url = self.external_url.trim().to_string();

        check_len("name", &self.name, 1, MAX_NAME_LEN)?;
        check_len("symbol", &self.symbol, 1, MAX_SYMBOL_LEN)?;
        check_len("description", &self.description, 1, MAX_DESCRIPTION_LEN)?;
        check_len("external_url", &self.external_url, 0, MAX_EXTERNAL_URL_LEN)?;

        self.attributes = self
            .attributes
            .into_iter()
            .map(|attr| Attribute::new(attr.trait_type, attr.value))
            .collect::<Result<_>>()?;

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> MetadataDraft {
        MetadataDraft::new("Tree Frog #1", "FROG", "A frog that lives in a tree")
    }

    #[test]
    fn test_check_image_limits() {
        assert!(check_image("image/png", 1).is_ok());
        assert!(check_image("image/jpeg", MAX_IMAGE_BYTES).is_ok());
        assert!(check_image("image/png", MAX_IMAGE_BYTES + 1).is_err());
        assert!(check_image("image/png", 0).is_err());
    }

    #[test]
    fn test_check_image_rejects_other_types() {
        let err = check_image("image/gif", 10).unwrap_err();
        assert!(matches!(err, CoreError::InvalidField { field: "image", .. }));
        assert!(check_image("application/octet-stream", 10).is_err());
    }

    #[test]
    fn test_valid_draft_is_trimmed() {
        let mut raw = draft();
        raw.name = "  Tree Frog #1 ".to_string();
        let validated = raw.validate().unwrap();
        assert_eq!(validated.name, "Tree Frog #1");
    }

    #[test]
    fn test_name_too_long() {
        let mut raw = draft();
        raw.name = "x".repeat(MAX_NAME_LEN + 1);
        let err = raw.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidField { field: "name", .. }));
    }

    #[test]
    fn test_name_limit_counts_chars_not_bytes() {
        let mut raw = draft();
        raw.name = "é".repeat(MAX_NAME_LEN);
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn test_symbol_required() {
        let mut raw = draft();
        raw.symbol = "   ".to_string();
        let err = raw.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidField { field: "symbol", .. }));
    }

    #[test]
    fn test_external_url_optional_but_bounded() {
        let mut raw = draft();
        raw.external_url = String::new();
        assert!(raw.clone().validate().is_ok());
        raw.external_url = "u".repeat(MAX_EXTERNAL_URL_LEN + 1);
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_parse_attribute() {
        let attr = parse_attribute("color = green").unwrap();
        assert_eq!(attr.trait_type, "color");
        assert_eq!(attr.value, "green");
    }

    #[test]
    fn test_parse_attribute_keeps_extra_equals_in_value() {
        let attr = parse_attribute("eq=a=b").unwrap();
        assert_eq!(attr.value, "a=b");
    }

    #[test]
    fn test_parse_attribute_rejects_bad_input() {
        assert!(parse_attribute("no-separator").is_err());
        assert!(parse_attribute("=value").is_err());
        assert!(parse_attribute("averylongtrait=value").is_err());
    }

    #[test]
    fn test_attributes_revalidated() {
        let mut raw = draft();
        raw.attributes.push(Attribute {
            trait_type: String::new(),
            value: "x".to_string(),
        });
        assert!(raw.validate().is_err());
    }
}
