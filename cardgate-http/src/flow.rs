//! High-level card charge flow: create a transaction, then charge it.
//!
//! Mirrors what a merchant checkout does by hand: `POST /transactions`,
//! then `POST /transactions/{id}/pay` with either a freshly encrypted card
//! blob or a saved-card token, then act on the gateway's answer. The flow
//! returns a [`ChargeOutcome`] instead of acting on it — whether a redirect
//! becomes an HTTP response is the application's business.

use cardgate::fields::{EncryptedCardData, GroupId};
use cardgate::model::{
    CardPaymentData, ChargeOutcome, PaymentRequest, Transaction, TransactionRequest,
};
use cardgate::tokens::{CardRegistry, TokenError};

use crate::client::TransactionsApi;
use crate::error::HttpError;

/// Failure of a charge flow.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// A gateway call failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The created transaction carried no paywall URL to fall back to.
    #[error("transaction '{0}' has no payment URL")]
    MissingPaymentUrl(String),

    /// The requested saved card does not belong to the requesting user.
    #[error("saved-card charge rejected: {0}")]
    UnauthorizedCard(#[from] TokenError),
}

/// Result of a completed flow run: the transaction that was created and
/// what to do next.
#[derive(Debug, Clone)]
pub struct Charge {
    /// The created transaction.
    pub transaction: Transaction,
    /// What the merchant should do with the payer.
    pub outcome: ChargeOutcome,
}

/// Create-then-charge helper over any [`TransactionsApi`].
#[derive(Debug)]
pub struct CardChargeFlow<'a, A> {
    api: &'a A,
    registry: &'a CardRegistry,
    group_id: GroupId,
}

impl<'a, A: TransactionsApi> CardChargeFlow<'a, A> {
    /// Creates a flow over the given API, saved-card registry, and payment
    /// channel group.
    #[must_use]
    pub const fn new(api: &'a A, registry: &'a CardRegistry, group_id: GroupId) -> Self {
        Self {
            api,
            registry,
            group_id,
        }
    }

    /// Charges a new card encrypted by the merchant's on-site form.
    ///
    /// With `save` set, a successful charge also issues a `cli_auth` token
    /// in the payment result; storing it in the registry is up to the
    /// caller, which knows the user.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] if a gateway call fails or the created
    /// transaction is unusable.
    pub async fn charge_new_card(
        &self,
        request: &TransactionRequest,
        card: EncryptedCardData,
        save: bool,
    ) -> Result<Charge, FlowError> {
        self.charge(request, CardPaymentData::encrypted(card, save))
            .await
    }

    /// Charges a card previously saved by `user_id`.
    ///
    /// Ownership is enforced before anything is sent to the gateway: a
    /// `card_id` that does not belong to `user_id` fails with
    /// [`FlowError::UnauthorizedCard`] and no transaction is created.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] on an ownership violation, a failed gateway
    /// call, or an unusable transaction.
    pub async fn charge_saved_card(
        &self,
        request: &TransactionRequest,
        user_id: u64,
        card_id: u64,
    ) -> Result<Charge, FlowError> {
        let token = self.registry.authorize(user_id, card_id).map_err(|err| {
            tracing::warn!(user_id, card_id, "rejected charge of a card the user does not own");
            err
        })?;
        self.charge(request, CardPaymentData::saved(token)).await
    }

    async fn charge(
        &self,
        request: &TransactionRequest,
        data: CardPaymentData,
    ) -> Result<Charge, FlowError> {
        let transaction = self.api.create_transaction(request).await?;
        tracing::debug!(
            transaction_id = %transaction.transaction_id,
            "transaction created, attempting card charge"
        );
        let paywall = transaction
            .transaction_payment_url
            .clone()
            .ok_or_else(|| FlowError::MissingPaymentUrl(transaction.transaction_id.clone()))?;

        let payment = PaymentRequest::sale(self.group_id, data);
        let result = self
            .api
            .create_payment(&transaction.transaction_id, &payment)
            .await?;

        Ok(Charge {
            outcome: ChargeOutcome::resolve(paywall, result),
            transaction,
        })
    }
}
