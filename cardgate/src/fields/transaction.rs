//! Transaction-level parameters: amount, descriptions, language, channel group.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{Field, FieldError, FieldSpec, FieldType, bounded_string};

/// Gross transaction amount in the merchant account's currency.
///
/// The gateway accepts a positive JSON number with at most two fraction
/// digits. Serialized as a number, not a string:
///
/// ```json
/// 0.1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Returns the validated decimal value.
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }
}

impl Field for Amount {
    const SPEC: FieldSpec = FieldSpec {
        name: "amount",
        ty: FieldType::Float,
        max_length: None,
        allowed: None,
    };

    type Raw = Decimal;

    fn parse(raw: Decimal) -> Result<Self, FieldError> {
        if raw <= Decimal::ZERO {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: format!("amount must be positive, got {raw}"),
            });
        }
        if raw.scale() > 2 {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: format!("amount must have at most two fraction digits, got {raw}"),
            });
        }
        Ok(Self(raw))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = FieldError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

// JSON numbers arrive as floats; the value is rounded to cents before
// validation, so float representation noise (0.1 decoding as 0.1000...01)
// does not reject an otherwise valid amount. Anything the gateway would
// not charge — zero, negative — still fails.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::parse(raw.round_dp(2)).map_err(serde::de::Error::custom)
    }
}

bounded_string!(
    /// Human-readable transaction description shown to the payer.
    Description,
    wire = "description",
    max = 128
);

bounded_string!(
    /// Merchant-side order reference, never shown to the payer.
    HiddenDescription,
    wire = "hiddenDescription",
    max = 64
);

/// Language of the hosted payment pages shown to the payer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Polish.
    Pl,
    /// English.
    En,
    /// German.
    De,
}

impl Language {
    /// Wire value for this language.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pl => "pl",
            Self::En => "en",
            Self::De => "de",
        }
    }
}

impl Field for Language {
    const SPEC: FieldSpec = FieldSpec {
        name: "lang",
        ty: FieldType::Str,
        max_length: Some(2),
        allowed: Some(&["pl", "en", "de"]),
    };

    type Raw = String;

    fn parse(raw: String) -> Result<Self, FieldError> {
        super::check_allowed(&Self::SPEC, &raw)?;
        match raw.as_str() {
            "pl" => Ok(Self::Pl),
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            other => Err(FieldError::NotAllowed {
                field: Self::SPEC.name,
                value: other.to_owned(),
            }),
        }
    }
}

impl FromStr for Language {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_owned())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment-channel group selecting how the transaction can be paid.
///
/// Group identifiers are published by the gateway; the card channel used by
/// the on-site form is [`GroupId::CARD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u32);

impl GroupId {
    /// The card payment channel group.
    pub const CARD: Self = Self(103);

    /// Returns the numeric group identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Field for GroupId {
    const SPEC: FieldSpec = FieldSpec {
        name: "groupId",
        ty: FieldType::Int,
        max_length: None,
        allowed: None,
    };

    type Raw = u32;

    fn parse(raw: u32) -> Result<Self, FieldError> {
        if raw == 0 {
            return Err(FieldError::Malformed {
                field: Self::SPEC.name,
                reason: "group identifiers start at 1".to_owned(),
            });
        }
        Ok(Self(raw))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_amount_accepts_two_fraction_digits() {
        let amount = Amount::parse(Decimal::new(10, 2)).unwrap();
        assert_eq!(amount.to_string(), "0.10");
    }

    #[test]
    fn test_amount_rejects_zero_and_negative() {
        assert!(Amount::parse(Decimal::ZERO).is_err());
        assert!(Amount::parse(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_amount_rejects_sub_cent_precision() {
        assert!(Amount::parse(Decimal::new(1001, 3)).is_err());
    }

    #[test]
    fn test_amount_deserialize_rounds_to_cents() {
        // Parsing rejects sub-cent precision, but incoming JSON floats are
        // rounded first so representation noise cannot fail a valid amount.
        let amount: Amount = serde_json::from_str("0.105").unwrap();
        assert_eq!(amount.get(), Decimal::new(10, 2));

        let amount: Amount = serde_json::from_str("0.1").unwrap();
        assert_eq!(amount.get(), Decimal::new(10, 2).normalize());
    }

    #[test]
    fn test_amount_deserialize_still_rejects_non_positive() {
        assert!(serde_json::from_str::<Amount>("0.0").is_err());
        assert!(serde_json::from_str::<Amount>("-1.5").is_err());
    }

    #[test]
    fn test_amount_serializes_as_number() {
        let amount = Amount::parse(Decimal::new(10, 2)).unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "0.1");
    }

    #[test]
    fn test_description_limit_is_128() {
        assert!(Description::parse("x".repeat(128)).is_ok());
        assert!(Description::parse("x".repeat(129)).is_err());
    }

    #[test]
    fn test_language_round_trip() {
        let lang: Language = serde_json::from_str("\"pl\"").unwrap();
        assert_eq!(lang, Language::Pl);
        assert_eq!(serde_json::to_string(&lang).unwrap(), "\"pl\"");
    }

    #[test]
    fn test_language_rejects_unsupported_locale() {
        let err = Language::parse("fr".to_owned()).unwrap_err();
        assert_eq!(
            err,
            FieldError::NotAllowed {
                field: "lang",
                value: "fr".to_owned()
            }
        );
    }

    #[test]
    fn test_group_id_rejects_zero() {
        assert!(GroupId::parse(0).is_err());
        assert_eq!(GroupId::parse(103).unwrap(), GroupId::CARD);
    }

    #[test]
    fn test_group_id_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&GroupId::CARD).unwrap(), "103");
    }
}
