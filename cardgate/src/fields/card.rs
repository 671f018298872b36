//! Card-related parameters: vendor, encrypted card blob, saved-card token.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::{Field, FieldError, FieldSpec, FieldType};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^t[0-9a-f]{40}$").expect("static token pattern compiles"));

static SHORT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{4}[0-9]{4}$").expect("static short-code pattern compiles"));

static CARD_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/=]+$").expect("static card-data pattern compiles"));

/// Card brand accepted by the on-site payment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardVendor {
    /// Visa.
    Visa,
    /// Mastercard.
    Mastercard,
    /// Maestro.
    Maestro,
}

impl CardVendor {
    /// All vendors the gateway's card channel supports.
    pub const ALL: &'static [Self] = &[Self::Visa, Self::Mastercard, Self::Maestro];

    /// Wire value for this vendor.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Maestro => "maestro",
        }
    }
}

impl Field for CardVendor {
    const SPEC: FieldSpec = FieldSpec {
        name: "card_vendor",
        ty: FieldType::Str,
        max_length: None,
        allowed: Some(&["visa", "mastercard", "maestro"]),
    };

    type Raw = String;

    fn parse(raw: String) -> Result<Self, FieldError> {
        match raw.as_str() {
            "visa" => Ok(Self::Visa),
            "mastercard" => Ok(Self::Mastercard),
            "maestro" => Ok(Self::Maestro),
            other => Err(FieldError::NotAllowed {
                field: Self::SPEC.name,
                value: other.to_owned(),
            }),
        }
    }
}

impl FromStr for CardVendor {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

impl fmt::Display for CardVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card data encrypted by the on-site form with the merchant's RSA key.
///
/// The SDK treats the blob as opaque: it only checks that the payload is a
/// non-empty base64 string of plausible size. Decryption happens at the
/// gateway.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncryptedCardData(String);

impl EncryptedCardData {
    /// Returns the encrypted payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Card blobs are sensitive enough to keep out of debug output.
impl fmt::Debug for EncryptedCardData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncryptedCardData").field(&"<redacted>").finish()
    }
}

impl Field for EncryptedCardData {
    const SPEC: FieldSpec = FieldSpec {
        name: "card",
        ty: FieldType::Str,
        max_length: Some(1024),
        allowed: None,
    };

    type Raw = String;

    fn parse(raw: String) -> Result<Self, FieldError> {
        super::require_non_empty(Self::SPEC.name, &raw)?;
        super::check_max_length(&Self::SPEC, &raw)?;
        if !CARD_DATA_RE.is_match(&raw) {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: "encrypted card data must be base64".to_owned(),
            });
        }
        Ok(Self(raw))
    }
}

impl FromStr for EncryptedCardData {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

impl Serialize for EncryptedCardData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EncryptedCardData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Saved-card token (`cli_auth`) issued by the gateway on a successful
/// charge with `save` set.
///
/// Tokens are the letter `t` followed by 40 lowercase hex characters:
///
/// ```text
/// t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4af
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardToken(String);

impl CardToken {
    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Field for CardToken {
    const SPEC: FieldSpec = FieldSpec {
        name: "cli_auth",
        ty: FieldType::Str,
        max_length: Some(41),
        allowed: None,
    };

    type Raw = String;

    fn parse(raw: String) -> Result<Self, FieldError> {
        if !TOKEN_RE.is_match(&raw) {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: "card tokens are 't' followed by 40 hex characters".to_owned(),
            });
        }
        Ok(Self(raw))
    }
}

impl FromStr for CardToken {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

impl fmt::Display for CardToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CardToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CardToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Masked card number shown to the payer when picking a saved card, e.g.
/// `****1111`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardShortCode(String);

impl CardShortCode {
    /// Returns the masked number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Field for CardShortCode {
    const SPEC: FieldSpec = FieldSpec {
        name: "shortCode",
        ty: FieldType::Str,
        max_length: Some(8),
        allowed: None,
    };

    type Raw = String;

    fn parse(raw: String) -> Result<Self, FieldError> {
        if !SHORT_CODE_RE.is_match(&raw) {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: "short codes are '****' followed by the last four digits".to_owned(),
            });
        }
        Ok(Self(raw))
    }
}

impl FromStr for CardShortCode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

impl fmt::Display for CardShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CardShortCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CardShortCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}
