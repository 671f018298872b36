//! The gateway API client.

use std::time::Duration;

use async_trait::async_trait;
use cardgate::model::{
    PaymentRequest, PaymentResult, RefundRequest, Transaction, TransactionRequest,
};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::{Credentials, TokenCache};
use crate::constants::{DEFAULT_TIMEOUT, PRODUCTION_URL, SANDBOX_URL, TRANSACTIONS_PATH};
use crate::error::HttpError;

/// Configuration for [`GatewayClient`].
pub struct GatewayConfig {
    /// Gateway base URL (without trailing slash).
    pub base_url: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Merchant API credentials.
    pub credentials: Credentials,

    /// Optional pre-configured reqwest client. If `None`, a new client is
    /// created with the configured timeout.
    pub http_client: Option<reqwest::Client>,
}

impl GatewayConfig {
    /// Configuration for the production gateway.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: PRODUCTION_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            credentials,
            http_client: None,
        }
    }

    /// Configuration for the sandbox gateway.
    #[must_use]
    pub fn sandbox(credentials: Credentials) -> Self {
        Self {
            base_url: SANDBOX_URL.to_owned(),
            ..Self::new(credentials)
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("credentials", &self.credentials)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

/// The transactions API surface of the gateway.
///
/// [`GatewayClient`] is the HTTP implementation; the trait exists so
/// higher-level helpers like [`crate::flow::CardChargeFlow`] can be tested
/// against an in-memory gateway.
#[async_trait]
pub trait TransactionsApi: Send + Sync {
    /// Creates a transaction.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] on network failure or gateway rejection.
    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<Transaction, HttpError>;

    /// Fetches a transaction by its identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] on network failure or gateway rejection.
    async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, HttpError>;

    /// Attempts a card payment on an existing transaction.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] on network failure or gateway rejection.
    async fn create_payment(
        &self,
        transaction_id: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResult, HttpError>;

    /// Refunds a settled transaction, fully or partially.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] on network failure or gateway rejection.
    async fn refund(
        &self,
        transaction_id: &str,
        request: &RefundRequest,
    ) -> Result<PaymentResult, HttpError>;
}

/// Async HTTP client for the gateway's transactions API.
///
/// Authentication is transparent: the client fetches and caches a bearer
/// token on first use and refreshes it before expiry.
pub struct GatewayClient {
    base_url: String,
    credentials: Credentials,
    client: reqwest::Client,
    tokens: TokenCache,
}

impl GatewayClient {
    /// Creates a client from the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if no [`GatewayConfig::http_client`] is supplied and the
    /// default reqwest client cannot be constructed (e.g. the TLS backend
    /// fails to initialize).
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        let client = config.http_client.unwrap_or_else(|| {
            reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .expect("failed to build reqwest::Client")
        });

        Self {
            base_url,
            credentials: config.credentials,
            client,
            tokens: TokenCache::default(),
        }
    }

    /// Returns the gateway base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn bearer(&self) -> Result<String, HttpError> {
        self.tokens
            .bearer(&self.client, &self.base_url, &self.credentials)
            .await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HttpError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "gateway rejected request");
            return Err(HttpError::Status { status, body });
        }
        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TransactionsApi for GatewayClient {
    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<Transaction, HttpError> {
        self.post_json(TRANSACTIONS_PATH, request).await
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, HttpError> {
        self.get_json(&format!("{TRANSACTIONS_PATH}/{transaction_id}"))
            .await
    }

    async fn create_payment(
        &self,
        transaction_id: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResult, HttpError> {
        self.post_json(&format!("{TRANSACTIONS_PATH}/{transaction_id}/pay"), request)
            .await
    }

    async fn refund(
        &self,
        transaction_id: &str,
        request: &RefundRequest,
    ) -> Result<PaymentResult, HttpError> {
        self.post_json(
            &format!("{TRANSACTIONS_PATH}/{transaction_id}/refunds"),
            request,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardgate::fields::{Amount, CardToken, Field, GroupId};
    use cardgate::model::{CardPaymentData, Payer, PaymentVerdict, TransactionStatus};
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_auth(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/oauth/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test-token",
                "token_type": "Bearer",
                "expires_in": 7200
            })))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> GatewayClient {
        let credentials = Credentials::new("merchant-1", "secret");
        GatewayClient::new(GatewayConfig::new(credentials).with_base_url(server.uri()))
    }

    fn sample_request() -> TransactionRequest {
        TransactionRequest::builder()
            .amount(Decimal::new(10, 2))
            .description("test transaction")
            .payer(Payer::new("customer@example.com", "John Doe").unwrap())
            .group_id(103)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_transaction_sends_bearer_and_body() {
        let server = MockServer::start().await;
        mock_auth(&server).await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "amount": 0.1,
                "description": "test transaction",
                "pay": {"groupId": 103}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transactionId": "ta_1",
                "status": "pending",
                "transactionPaymentUrl": "https://secure.example.com/ta_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let transaction = client.create_transaction(&sample_request()).await.unwrap();
        assert_eq!(transaction.transaction_id, "ta_1");
        assert_eq!(transaction.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_bearer_token_is_reused_across_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test-token",
                "token_type": "Bearer",
                "expires_in": 7200
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transactions/ta_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transactionId": "ta_1",
                "status": "correct"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.get_transaction("ta_1").await.unwrap();
        client.get_transaction("ta_1").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_payment_posts_to_pay_path() {
        let server = MockServer::start().await;
        mock_auth(&server).await;
        Mock::given(method("POST"))
            .and(path("/transactions/ta_1/pay"))
            .and(body_partial_json(json!({
                "method": "sale",
                "cardPaymentData": {"token": "t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4af"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "status": "correct"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token =
            CardToken::parse("t5ca63654a3c44a8fac1dea7f1227b9f5d8dc4af".to_owned()).unwrap();
        let request = PaymentRequest::sale(GroupId::CARD, CardPaymentData::saved(token));
        let result = client.create_payment("ta_1", &request).await.unwrap();
        assert_eq!(result.result, Some(PaymentVerdict::Success));
        assert_eq!(result.status, Some(TransactionStatus::Correct));
    }

    #[tokio::test]
    async fn test_full_refund_posts_empty_body() {
        let server = MockServer::start().await;
        mock_auth(&server).await;
        Mock::given(method("POST"))
            .and(path("/transactions/ta_1/refunds"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "status": "correct"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.refund("ta_1", &RefundRequest::default()).await.unwrap();
        assert_eq!(result.result, Some(PaymentVerdict::Success));
    }

    #[tokio::test]
    async fn test_partial_refund_sends_amount() {
        let server = MockServer::start().await;
        mock_auth(&server).await;
        Mock::given(method("POST"))
            .and(path("/transactions/ta_1/refunds"))
            .and(body_json(json!({"amount": 0.1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "status": "correct"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = RefundRequest {
            amount: Some(Amount::parse(Decimal::new(10, 2)).unwrap()),
        };
        let result = client.refund("ta_1", &request).await.unwrap();
        assert_eq!(result.status, Some(TransactionStatus::Correct));
    }

    #[tokio::test]
    async fn test_gateway_rejection_surfaces_status_and_body() {
        let server = MockServer::start().await;
        mock_auth(&server).await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"errors":["amount too low"]}"#),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.create_transaction(&sample_request()).await.unwrap_err();
        match err {
            HttpError::Status { status, body } => {
                assert_eq!(status, http::StatusCode::BAD_REQUEST);
                assert!(body.contains("amount too low"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_auth_failure_is_reported_as_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/auth"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_transaction("ta_1").await.unwrap_err();
        assert!(matches!(err, HttpError::Auth(_)));
    }
}
