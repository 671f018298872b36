//! Transaction creation request, its builder, and the transaction response.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::fields::{
    Amount, CallbackUrl, City, CountryCode, Description, Field, FieldError, GroupId,
    HiddenDescription, Language, PayerEmail, PayerName, PayerPhone, PostalCode, StreetAddress,
};

/// The payer section of a transaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payer {
    /// Payer e-mail address.
    pub email: PayerEmail,
    /// Payer full name.
    pub name: PayerName,
    /// Payer phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<PayerPhone>,
    /// Payer street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<StreetAddress>,
    /// Payer postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<PostalCode>,
    /// Payer city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
    /// Payer country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryCode>,
}

impl Payer {
    /// Creates a payer from raw e-mail and name, validating both.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if either value violates its field contract.
    pub fn new(email: &str, name: &str) -> Result<Self, FieldError> {
        Ok(Self {
            email: email.parse()?,
            name: name.parse()?,
            phone: None,
            address: None,
            code: None,
            city: None,
            country: None,
        })
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: PayerPhone) -> Self {
        self.phone = Some(phone);
        self
    }

    /// Sets the street address.
    #[must_use]
    pub fn with_address(mut self, address: StreetAddress) -> Self {
        self.address = Some(address);
        self
    }

    /// Sets the postal code.
    #[must_use]
    pub fn with_code(mut self, code: PostalCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Sets the city.
    #[must_use]
    pub fn with_city(mut self, city: City) -> Self {
        self.city = Some(city);
        self
    }

    /// Sets the country code.
    #[must_use]
    pub fn with_country(mut self, country: CountryCode) -> Self {
        self.country = Some(country);
        self
    }
}

/// Merchant notification endpoint called by the gateway on status changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCallback {
    /// Notification URL.
    pub url: CallbackUrl,
}

/// Where the gateway redirects the payer after the hosted payment flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerUrls {
    /// Redirect target on successful payment.
    pub success: CallbackUrl,
    /// Redirect target on failed payment.
    pub error: CallbackUrl,
}

/// The callbacks section of a transaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Callbacks {
    /// Merchant notification endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationCallback>,
    /// Payer redirect targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_urls: Option<PayerUrls>,
}

/// The pay section of a transaction request, selecting the payment channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayGroup {
    /// Payment-channel group.
    pub group_id: GroupId,
}

/// Body of `POST /transactions`.
///
/// Assemble with [`TransactionRequest::builder`]; every field passes through
/// the validation layer in [`crate::fields`] before the request exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Gross amount to charge.
    pub amount: Amount,
    /// Description shown to the payer.
    pub description: Description,
    /// Merchant-side order reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_description: Option<HiddenDescription>,
    /// The paying customer.
    pub payer: Payer,
    /// Language of the hosted payment pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<Language>,
    /// Notification and redirect URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<Callbacks>,
    /// Payment channel selection.
    pub pay: PayGroup,
}

impl TransactionRequest {
    /// Starts building a transaction request.
    #[must_use]
    pub fn builder() -> TransactionRequestBuilder {
        TransactionRequestBuilder::default()
    }
}

/// Failure to assemble a [`TransactionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A raw input violated its field contract.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A required section was never set.
    #[error("missing required field '{0}'")]
    Missing(&'static str),
}

/// Builder collecting raw inputs for a [`TransactionRequest`].
///
/// Validation happens once, in [`build`](Self::build), so call sites can
/// chain setters without handling per-field errors.
#[derive(Debug, Clone, Default)]
pub struct TransactionRequestBuilder {
    amount: Option<Decimal>,
    description: Option<String>,
    hidden_description: Option<String>,
    payer: Option<Payer>,
    lang: Option<Language>,
    notification_url: Option<String>,
    success_url: Option<String>,
    error_url: Option<String>,
    group_id: Option<u32>,
}

impl TransactionRequestBuilder {
    /// Sets the gross amount.
    #[must_use]
    pub const fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the payer-visible description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the merchant-side order reference.
    #[must_use]
    pub fn hidden_description(mut self, hidden: impl Into<String>) -> Self {
        self.hidden_description = Some(hidden.into());
        self
    }

    /// Sets the payer.
    #[must_use]
    pub fn payer(mut self, payer: Payer) -> Self {
        self.payer = Some(payer);
        self
    }

    /// Sets the hosted-page language.
    #[must_use]
    pub const fn lang(mut self, lang: Language) -> Self {
        self.lang = Some(lang);
        self
    }

    /// Sets the merchant notification URL.
    #[must_use]
    pub fn notification_url(mut self, url: impl Into<String>) -> Self {
        self.notification_url = Some(url.into());
        self
    }

    /// Sets the payer success-redirect URL.
    #[must_use]
    pub fn success_url(mut self, url: impl Into<String>) -> Self {
        self.success_url = Some(url.into());
        self
    }

    /// Sets the payer error-redirect URL.
    #[must_use]
    pub fn error_url(mut self, url: impl Into<String>) -> Self {
        self.error_url = Some(url.into());
        self
    }

    /// Sets the payment-channel group.
    #[must_use]
    pub const fn group_id(mut self, group_id: u32) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Validates every collected input and assembles the request.
    ///
    /// The payer redirect URLs come as a pair: setting only one of
    /// `success_url`/`error_url` is an error.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Missing`] for unset required sections and
    /// [`BuildError::Field`] for inputs that violate their field contract.
    pub fn build(self) -> Result<TransactionRequest, BuildError> {
        let amount = Amount::parse(self.amount.ok_or(BuildError::Missing("amount"))?)?;
        let description =
            Description::parse(self.description.ok_or(BuildError::Missing("description"))?)?;
        let hidden_description = self
            .hidden_description
            .map(HiddenDescription::parse)
            .transpose()?;
        let payer = self.payer.ok_or(BuildError::Missing("payer"))?;
        let group_id = GroupId::parse(self.group_id.ok_or(BuildError::Missing("pay.groupId"))?)?;

        let notification = self
            .notification_url
            .map(CallbackUrl::parse)
            .transpose()?
            .map(|url| NotificationCallback { url });
        let payer_urls = match (self.success_url, self.error_url) {
            (Some(success), Some(error)) => Some(PayerUrls {
                success: CallbackUrl::parse(success)?,
                error: CallbackUrl::parse(error)?,
            }),
            (None, None) => None,
            _ => return Err(BuildError::Missing("callbacks.payerUrls")),
        };
        let callbacks = if notification.is_none() && payer_urls.is_none() {
            None
        } else {
            Some(Callbacks {
                notification,
                payer_urls,
            })
        };

        Ok(TransactionRequest {
            amount,
            description,
            hidden_description,
            payer,
            lang: self.lang,
            callbacks,
            pay: PayGroup { group_id },
        })
    }
}

/// Lifecycle status of a transaction as reported by the gateway.
///
/// Statuses the SDK does not know yet deserialize as
/// [`Unknown`](Self::Unknown) rather than failing, so new gateway statuses do
/// not break merchants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    /// Payment settled successfully.
    Correct,
    /// Awaiting payment or authorization.
    Pending,
    /// Payment was declined.
    Declined,
    /// Processing error on the gateway side.
    Error,
    /// A status this SDK version does not recognize.
    Unknown(String),
}

impl TransactionStatus {
    /// Wire value for this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Correct => "correct",
            Self::Pending => "pending",
            Self::Declined => "declined",
            Self::Error => "error",
            Self::Unknown(s) => s,
        }
    }

    /// Whether the payment settled successfully.
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl FromStr for TransactionStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "correct" => Self::Correct,
            "pending" => Self::Pending,
            "declined" => Self::Declined,
            "error" => Self::Error,
            other => Self::Unknown(other.to_owned()),
        })
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::Unknown(raw)))
    }
}

/// A transaction as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Gateway-assigned transaction identifier.
    pub transaction_id: String,
    /// Gateway-assigned transaction title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Current lifecycle status.
    pub status: TransactionStatus,
    /// Hosted paywall URL for this transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_payment_url: Option<String>,
}
