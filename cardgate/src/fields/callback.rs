//! Callback URL parameters.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::{Field, FieldError, FieldSpec, FieldType};

/// An absolute `http(s)` URL the gateway calls back or redirects to.
///
/// Used for the merchant notification endpoint and the payer success/error
/// redirect targets. The original text is preserved byte-for-byte; the URL is
/// only parsed for validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackUrl(String);

impl CallbackUrl {
    /// Returns the validated URL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the URL text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Field for CallbackUrl {
    const SPEC: FieldSpec = FieldSpec {
        name: "url",
        ty: FieldType::Str,
        max_length: Some(512),
        allowed: None,
    };

    type Raw = String;

    fn parse(raw: String) -> Result<Self, FieldError> {
        super::require_non_empty(Self::SPEC.name, &raw)?;
        super::check_max_length(&Self::SPEC, &raw)?;
        let parsed = Url::parse(&raw).map_err(|e| FieldError::Malformed {
            field: Self::SPEC.name,
            reason: format!("'{raw}' is not a valid URL: {e}"),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: format!("callback URLs must be http(s), got '{}'", parsed.scheme()),
            });
        }
        Ok(Self(raw))
    }
}

impl FromStr for CallbackUrl {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

impl fmt::Display for CallbackUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallbackUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for CallbackUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CallbackUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}
