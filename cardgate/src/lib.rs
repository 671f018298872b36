#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core typed fields and wire models for the CardGate payment gateway.
//!
//! This crate provides the foundational types used by merchant applications
//! integrating with the CardGate HTTP API. Every API parameter is represented
//! by a validated field wrapper that enforces the gateway's per-parameter
//! contract (type, maximum length, allowed values) at construction time, so
//! invalid requests are rejected before they ever reach the wire.
//!
//! # Overview
//!
//! A card charge against the gateway has three moving parts:
//!
//! 1. A **transaction** is created from a [`model::TransactionRequest`] and
//!    identified by a transaction ID.
//! 2. A **payment attempt** charges the transaction, either with an encrypted
//!    card blob from the merchant's on-site form or with a saved card token
//!    (`cli_auth`).
//! 3. The gateway's answer maps to a [`model::ChargeOutcome`]: the charge
//!    completed, or the payer must be redirected (3-D Secure or the hosted
//!    paywall).
//!
//! # Modules
//!
//! - [`fields`] - Validated field wrappers for individual API parameters
//! - [`model`] - Request/response wire types and the transaction builder
//! - [`tokens`] - Merchant-side registry of saved cards and their tokens
//!
//! The HTTP transport lives in the companion `cardgate-http` crate.

pub mod fields;
pub mod model;
pub mod tokens;
