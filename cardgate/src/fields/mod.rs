//! Validated field wrappers for individual gateway API parameters.
//!
//! The gateway documents every request parameter with a wire name, a JSON
//! type, and optional length or allowed-value constraints. This module turns
//! that contract into types: each parameter is a newtype that can only be
//! constructed through [`Field::parse`], which applies the parameter's
//! [`FieldSpec`]. Serialization goes straight through to the validated inner
//! value, and deserialization re-validates, so a value of one of these types
//! is correct by construction on both sides of the wire.
//!
//! # Field Groups
//!
//! - [`transaction`] - Amount, description, language, payment-channel group
//! - [`payer`] - Payer contact and address parameters
//! - [`callback`] - Notification and payer-redirect URLs
//! - [`card`] - Card vendor, encrypted card blob, saved-card token

use std::fmt;

pub mod callback;
pub mod card;
pub mod payer;
pub mod transaction;

pub use callback::CallbackUrl;
pub use card::{CardShortCode, CardToken, CardVendor, EncryptedCardData};
pub use payer::{City, CountryCode, PayerEmail, PayerName, PayerPhone, PostalCode, StreetAddress};
pub use transaction::{Amount, Description, GroupId, HiddenDescription, Language};

/// JSON type of a gateway parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A JSON string.
    Str,
    /// A JSON integer.
    Int,
    /// A JSON number with a fractional part.
    Float,
    /// A JSON boolean.
    Bool,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Float => "number",
            Self::Bool => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// Wire-level constraints for a single gateway parameter.
///
/// Each field type exposes its spec as [`Field::SPEC`], making the
/// per-parameter contract (name, type, length limit, allowed values)
/// inspectable at runtime, e.g. for generating merchant-facing input forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Parameter name as it appears on the wire.
    pub name: &'static str,
    /// Expected JSON type.
    pub ty: FieldType,
    /// Maximum accepted length in UTF-8 bytes, if the gateway bounds it.
    pub max_length: Option<usize>,
    /// Closed set of accepted wire values, if the gateway enumerates them.
    pub allowed: Option<&'static [&'static str]>,
}

/// Validation failure for a single gateway parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The raw value does not have the parameter's JSON type.
    #[error("field '{field}' must be a {expected}")]
    TypeMismatch {
        /// Wire name of the offending parameter.
        field: &'static str,
        /// The JSON type the gateway expects.
        expected: FieldType,
    },

    /// The value exceeds the parameter's length limit.
    #[error("field '{field}' is limited to {max} bytes, got {len}")]
    TooLong {
        /// Wire name of the offending parameter.
        field: &'static str,
        /// Maximum accepted length in bytes.
        max: usize,
        /// Actual length of the rejected value.
        len: usize,
    },

    /// The value is outside the parameter's allowed set.
    #[error("'{value}' is not an accepted value for field '{field}'")]
    NotAllowed {
        /// Wire name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A required parameter was given an empty value.
    #[error("field '{field}' must not be empty")]
    Empty {
        /// Wire name of the offending parameter.
        field: &'static str,
    },

    /// The value has the right type and length but a bad format.
    #[error("field '{field}' is malformed: {reason}")]
    Malformed {
        /// Wire name of the offending parameter.
        field: &'static str,
        /// What the format check rejected.
        reason: String,
    },
}

/// A validated gateway parameter.
///
/// Implementors are newtypes over the raw value, constructible only through
/// [`parse`](Self::parse). The associated [`SPEC`](Self::SPEC) describes the
/// constraints that `parse` enforces.
pub trait Field: Sized {
    /// The parameter's wire contract.
    const SPEC: FieldSpec;

    /// Raw input accepted by [`parse`](Self::parse).
    type Raw;

    /// Validates `raw` against [`SPEC`](Self::SPEC) and wraps it.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] describing the first violated constraint.
    fn parse(raw: Self::Raw) -> Result<Self, FieldError>;
}

pub(crate) fn require_non_empty(field: &'static str, raw: &str) -> Result<(), FieldError> {
    if raw.is_empty() {
        return Err(FieldError::Empty { field });
    }
    Ok(())
}

pub(crate) fn check_max_length(spec: &FieldSpec, raw: &str) -> Result<(), FieldError> {
    if let Some(max) = spec.max_length {
        if raw.len() > max {
            return Err(FieldError::TooLong {
                field: spec.name,
                max,
                len: raw.len(),
            });
        }
    }
    Ok(())
}

pub(crate) fn check_allowed(spec: &FieldSpec, raw: &str) -> Result<(), FieldError> {
    if let Some(allowed) = spec.allowed {
        if !allowed.contains(&raw) {
            return Err(FieldError::NotAllowed {
                field: spec.name,
                value: raw.to_owned(),
            });
        }
    }
    Ok(())
}

/// Declares a length-bounded, non-empty string parameter.
///
/// Expands to a newtype with [`Field`], `FromStr`, `Display`, `AsRef<str>`
/// and validating serde implementations.
macro_rules! bounded_string {
    ($(#[$meta:meta])* $name:ident, wire = $wire:literal, max = $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Returns the validated value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the validated value.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl $crate::fields::Field for $name {
            const SPEC: $crate::fields::FieldSpec = $crate::fields::FieldSpec {
                name: $wire,
                ty: $crate::fields::FieldType::Str,
                max_length: Some($max),
                allowed: None,
            };

            type Raw = String;

            fn parse(raw: String) -> Result<Self, $crate::fields::FieldError> {
                $crate::fields::require_non_empty(Self::SPEC.name, &raw)?;
                $crate::fields::check_max_length(&Self::SPEC, &raw)?;
                Ok(Self(raw))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::fields::FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::fields::Field>::parse(s.to_owned())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <Self as $crate::fields::Field>::parse(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use bounded_string;

#[cfg(test)]
mod tests {
    use super::*;

    bounded_string!(
        /// Test-only bounded field.
        Probe,
        wire = "probe",
        max = 8
    );

    #[test]
    fn test_bounded_string_accepts_within_limit() {
        let probe = Probe::parse("12345678".to_owned()).unwrap();
        assert_eq!(probe.as_str(), "12345678");
    }

    #[test]
    fn test_bounded_string_rejects_over_limit() {
        let err = Probe::parse("123456789".to_owned()).unwrap_err();
        assert_eq!(
            err,
            FieldError::TooLong {
                field: "probe",
                max: 8,
                len: 9
            }
        );
    }

    #[test]
    fn test_bounded_string_rejects_empty() {
        let err = Probe::parse(String::new()).unwrap_err();
        assert_eq!(err, FieldError::Empty { field: "probe" });
    }

    #[test]
    fn test_bounded_string_counts_utf8_bytes() {
        // Four three-byte characters exceed an 8-byte limit even though
        // there are fewer than 8 characters.
        assert!(Probe::parse("ąąąą".to_owned()).is_err());
    }

    #[test]
    fn test_bounded_string_deserialize_validates() {
        let ok: Result<Probe, _> = serde_json::from_str("\"ok\"");
        assert!(ok.is_ok());
        let too_long: Result<Probe, _> = serde_json::from_str("\"123456789\"");
        assert!(too_long.is_err());
    }

    #[test]
    fn test_field_spec_is_inspectable() {
        assert_eq!(Probe::SPEC.name, "probe");
        assert_eq!(Probe::SPEC.ty, FieldType::Str);
        assert_eq!(Probe::SPEC.max_length, Some(8));
        assert!(Probe::SPEC.allowed.is_none());
    }
}
