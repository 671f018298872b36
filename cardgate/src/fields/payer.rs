//! Payer contact and address parameters.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::{Field, FieldError, FieldSpec, FieldType, bounded_string};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern compiles")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ]{5,14}$").expect("static phone pattern compiles"));

/// Payer e-mail address, used by the gateway for payment confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PayerEmail(String);

impl PayerEmail {
    /// Returns the validated address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Field for PayerEmail {
    const SPEC: FieldSpec = FieldSpec {
        name: "email",
        ty: FieldType::Str,
        max_length: Some(254),
        allowed: None,
    };

    type Raw = String;

    fn parse(raw: String) -> Result<Self, FieldError> {
        super::require_non_empty(Self::SPEC.name, &raw)?;
        super::check_max_length(&Self::SPEC, &raw)?;
        if !EMAIL_RE.is_match(&raw) {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: format!("'{raw}' is not a valid e-mail address"),
            });
        }
        Ok(Self(raw))
    }
}

impl FromStr for PayerEmail {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

impl fmt::Display for PayerEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PayerEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for PayerEmail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PayerEmail {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

bounded_string!(
    /// Payer's full name.
    PayerName,
    wire = "name",
    max = 96
);

bounded_string!(
    /// Payer's street address.
    StreetAddress,
    wire = "address",
    max = 96
);

bounded_string!(
    /// Payer's postal code.
    PostalCode,
    wire = "code",
    max = 10
);

bounded_string!(
    /// Payer's city.
    City,
    wire = "city",
    max = 64
);

/// Payer phone number: optional leading `+`, then digits, at least six.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PayerPhone(String);

impl PayerPhone {
    /// Returns the validated number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Field for PayerPhone {
    const SPEC: FieldSpec = FieldSpec {
        name: "phone",
        ty: FieldType::Str,
        max_length: Some(16),
        allowed: None,
    };

    type Raw = String;

    fn parse(raw: String) -> Result<Self, FieldError> {
        super::require_non_empty(Self::SPEC.name, &raw)?;
        super::check_max_length(&Self::SPEC, &raw)?;
        if !PHONE_RE.is_match(&raw) {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: format!("'{raw}' is not a valid phone number"),
            });
        }
        Ok(Self(raw))
    }
}

impl FromStr for PayerPhone {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

impl fmt::Display for PayerPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for PayerPhone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PayerPhone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// ISO 3166-1 alpha-2 country code, uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Returns the two-letter code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Validated as ASCII uppercase in `parse`.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl Field for CountryCode {
    const SPEC: FieldSpec = FieldSpec {
        name: "country",
        ty: FieldType::Str,
        max_length: Some(2),
        allowed: None,
    };

    type Raw = String;

    fn parse(raw: String) -> Result<Self, FieldError> {
        let bytes = raw.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: format!("'{raw}' is not a two-letter uppercase country code"),
            });
        }
        Ok(Self([bytes[0], bytes[1]]))
    }
}

impl FromStr for CountryCode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}
