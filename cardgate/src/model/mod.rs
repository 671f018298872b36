//! Request/response wire types for the gateway's transactions API.
//!
//! # Key Types
//!
//! - [`TransactionRequest`] - Body of `POST /transactions`, assembled through
//!   [`TransactionRequest::builder`]
//! - [`Transaction`] - A created transaction, carrying the transaction ID and
//!   the hosted paywall URL
//! - [`PaymentRequest`] / [`PaymentResult`] - Charging a transaction with card
//!   data or a saved token
//! - [`ChargeOutcome`] - The merchant-facing verdict of a charge attempt

mod payment;
mod transaction;

pub use payment::*;
pub use transaction::*;
