#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP transport for the CardGate payment gateway SDK.
//!
//! This crate carries the typed models from [`cardgate`] over the wire:
//! OAuth2 client-credentials authentication, the transactions API surface,
//! and a high-level card-charge flow.
//!
//! # Example
//!
//! ```no_run
//! use cardgate::model::TransactionRequest;
//! use cardgate_http::auth::Credentials;
//! use cardgate_http::client::{GatewayClient, GatewayConfig, TransactionsApi};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::new("merchant-client-id", "merchant-client-secret");
//! let client = GatewayClient::new(GatewayConfig::sandbox(credentials));
//!
//! let request = TransactionRequest::builder()
//!     .amount(rust_decimal::Decimal::new(10, 2))
//!     .description("test transaction")
//!     .payer(cardgate::model::Payer::new("customer@example.com", "John Doe")?)
//!     .group_id(103)
//!     .build()?;
//!
//! let transaction = client.create_transaction(&request).await?;
//! println!("pay at {:?}", transaction.transaction_payment_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`auth`] - Credentials and bearer-token caching
//! - [`client`] - [`client::GatewayClient`] and the [`client::TransactionsApi`] trait
//! - [`flow`] - [`flow::CardChargeFlow`], the create-then-charge helper
//! - [`constants`] - Endpoint URLs and timing defaults

pub mod auth;
pub mod client;
pub mod constants;
pub mod error;
pub mod flow;

pub use error::HttpError;
