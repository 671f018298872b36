//! Charging a transaction: payment request, gateway result, charge outcome.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::TransactionStatus;
use crate::fields::{Amount, CardToken, EncryptedCardData, GroupId};

/// Card data attached to a payment attempt.
///
/// Either an encrypted blob from the merchant's on-site form (optionally
/// asking the gateway to issue a saved-card token), or a previously issued
/// token. Construct through [`encrypted`](Self::encrypted) or
/// [`saved`](Self::saved); the two shapes are disjoint on the wire:
///
/// ```json
/// { "card": "<blob>", "save": true }
/// { "token": "t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4af" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardPaymentData {
    /// A new card, encrypted by the on-site form.
    Encrypted {
        /// Encrypted card blob.
        card: EncryptedCardData,
        /// Whether the gateway should issue a `cli_auth` token for reuse.
        save: bool,
    },
    /// A saved card referenced by its token.
    Saved {
        /// The `cli_auth` token.
        token: CardToken,
    },
}

impl CardPaymentData {
    /// Payment data for a new card.
    #[must_use]
    pub const fn encrypted(card: EncryptedCardData, save: bool) -> Self {
        Self::Encrypted { card, save }
    }

    /// Payment data for a saved card.
    #[must_use]
    pub const fn saved(token: CardToken) -> Self {
        Self::Saved { token }
    }
}

/// Operation requested on a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Charge the card.
    Sale,
    /// Return funds to the card.
    Refund,
}

/// Body of `POST /transactions/{transactionId}/pay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Payment-channel group, matching the transaction's.
    pub group_id: GroupId,
    /// Card data for this attempt.
    pub card_payment_data: CardPaymentData,
    /// Requested operation.
    pub method: PaymentMethod,
}

impl PaymentRequest {
    /// A sale request for the given channel group and card data.
    #[must_use]
    pub const fn sale(group_id: GroupId, card_payment_data: CardPaymentData) -> Self {
        Self {
            group_id,
            card_payment_data,
            method: PaymentMethod::Sale,
        }
    }

    /// A card-level refund request for the given channel group and card data.
    ///
    /// For refunding by transaction alone, use the transactions API's
    /// refund endpoint with a [`RefundRequest`] instead.
    #[must_use]
    pub const fn refund(group_id: GroupId, card_payment_data: CardPaymentData) -> Self {
        Self {
            group_id,
            card_payment_data,
            method: PaymentMethod::Refund,
        }
    }
}

/// Overall verdict field of a payment response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentVerdict {
    /// The gateway accepted the attempt.
    Success,
    /// The gateway rejected the attempt.
    Failure,
    /// A verdict this SDK version does not recognize.
    Unknown(String),
}

impl PaymentVerdict {
    /// Wire value for this verdict.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Unknown(s) => s,
        }
    }
}

impl FromStr for PaymentVerdict {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "success" => Self::Success,
            "failure" => Self::Failure,
            other => Self::Unknown(other.to_owned()),
        })
    }
}

impl fmt::Display for PaymentVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentVerdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::Unknown(raw)))
    }
}

/// Response to a payment attempt.
///
/// Every field is optional: which ones the gateway fills depends on whether
/// the charge settled immediately, needs 3-D Secure, or failed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    /// Overall verdict of the attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PaymentVerdict>,
    /// Transaction status after the attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    /// 3-D Secure authorization URL, present when the card requires it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_payment_url: Option<String>,
    /// Saved-card token, present when the attempt asked to save the card.
    #[serde(default, rename = "cli_auth", skip_serializing_if = "Option::is_none")]
    pub cli_auth: Option<CardToken>,
}

/// Body of `POST /transactions/{transactionId}/refunds`.
///
/// An absent amount refunds the full transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    /// Partial refund amount; `None` refunds everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
}

/// Merchant-facing verdict of a card charge attempt.
///
/// Encodes the gateway's decision table:
///
/// 1. a failed or missing verdict sends the payer to the hosted paywall to
///    retry with another card;
/// 2. status `correct` means the card was not 3DS-protected and the charge
///    settled, the order can be completed;
/// 3. a payment URL in the response is a successfully generated 3-D Secure
///    authorization link;
/// 4. anything else means the card data was invalid, back to the paywall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    /// The charge settled; carries the final payment result.
    Completed(PaymentResult),
    /// The payer must complete 3-D Secure at this URL.
    RedirectTo3ds(String),
    /// The payer should be sent to the hosted paywall at this URL.
    RedirectToPaywall(String),
}

impl ChargeOutcome {
    /// Resolves a payment result against the transaction's paywall URL.
    #[must_use]
    pub fn resolve(paywall_url: String, result: PaymentResult) -> Self {
        match result.result {
            Some(PaymentVerdict::Failure) | None => return Self::RedirectToPaywall(paywall_url),
            Some(_) => {}
        }
        if result.status.as_ref().is_some_and(TransactionStatus::is_correct) {
            return Self::Completed(result);
        }
        match result.transaction_payment_url {
            Some(url) => Self::RedirectTo3ds(url),
            None => Self::RedirectToPaywall(paywall_url),
        }
    }

    /// Whether the charge settled without any redirect.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;

    fn token() -> CardToken {
        CardToken::parse("t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4af".to_owned()).unwrap()
    }

    fn paywall() -> String {
        "https://secure.cardgate.com/ta_1".to_owned()
    }

    #[test]
    fn test_encrypted_card_wire_shape() {
        let data = CardPaymentData::encrypted(
            EncryptedCardData::parse("aGVsbG8=".to_owned()).unwrap(),
            true,
        );
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value, serde_json::json!({"card": "aGVsbG8=", "save": true}));
    }

    #[test]
    fn test_saved_card_wire_shape() {
        let data = CardPaymentData::saved(token());
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"token": "t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4af"})
        );
    }

    #[test]
    fn test_payment_request_wire_shape() {
        let request = PaymentRequest::sale(
            crate::fields::GroupId::CARD,
            CardPaymentData::saved(token()),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["groupId"], 103);
        assert_eq!(value["method"], "sale");
        assert_eq!(
            value["cardPaymentData"]["token"],
            "t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4af"
        );
    }

    #[test]
    fn test_payment_request_refund_wire_shape() {
        let request = PaymentRequest::refund(
            crate::fields::GroupId::CARD,
            CardPaymentData::saved(token()),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["method"], "refund");
        assert_eq!(value["groupId"], 103);
    }

    #[test]
    fn test_full_refund_request_serializes_empty() {
        // An omitted amount must vanish from the body, not become null.
        let value = serde_json::to_value(RefundRequest::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_partial_refund_request_carries_amount() {
        let request = RefundRequest {
            amount: Some(Amount::parse(rust_decimal::Decimal::new(10, 2)).unwrap()),
        };
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value, serde_json::json!({"amount": 0.1}));
    }

    #[test]
    fn test_outcome_settled_charge_completes() {
        let result = PaymentResult {
            result: Some(PaymentVerdict::Success),
            status: Some(TransactionStatus::Correct),
            ..PaymentResult::default()
        };
        assert!(ChargeOutcome::resolve(paywall(), result).is_completed());
    }

    #[test]
    fn test_outcome_failure_goes_to_paywall() {
        let result = PaymentResult {
            result: Some(PaymentVerdict::Failure),
            status: Some(TransactionStatus::Correct),
            ..PaymentResult::default()
        };
        assert_eq!(
            ChargeOutcome::resolve(paywall(), result),
            ChargeOutcome::RedirectToPaywall(paywall())
        );
    }

    #[test]
    fn test_outcome_missing_verdict_goes_to_paywall() {
        assert_eq!(
            ChargeOutcome::resolve(paywall(), PaymentResult::default()),
            ChargeOutcome::RedirectToPaywall(paywall())
        );
    }

    #[test]
    fn test_outcome_3ds_link_redirects() {
        let result = PaymentResult {
            result: Some(PaymentVerdict::Success),
            status: Some(TransactionStatus::Pending),
            transaction_payment_url: Some("https://3ds.example.com/auth".to_owned()),
            ..PaymentResult::default()
        };
        assert_eq!(
            ChargeOutcome::resolve(paywall(), result),
            ChargeOutcome::RedirectTo3ds("https://3ds.example.com/auth".to_owned())
        );
    }

    #[test]
    fn test_outcome_invalid_card_goes_to_paywall() {
        let result = PaymentResult {
            result: Some(PaymentVerdict::Success),
            status: Some(TransactionStatus::Declined),
            ..PaymentResult::default()
        };
        assert_eq!(
            ChargeOutcome::resolve(paywall(), result),
            ChargeOutcome::RedirectToPaywall(paywall())
        );
    }

    #[test]
    fn test_payment_result_reads_saved_token() {
        let result: PaymentResult = serde_json::from_str(
            r#"{
                "result": "success",
                "status": "correct",
                "cli_auth": "t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4af"
            }"#,
        )
        .unwrap();
        assert_eq!(result.cli_auth, Some(token()));
    }
}
