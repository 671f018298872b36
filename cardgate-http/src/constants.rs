//! Endpoint URLs and timing defaults.

use std::time::Duration;

/// Production gateway API.
pub const PRODUCTION_URL: &str = "https://api.cardgate.com";

/// Sandbox gateway API for integration testing.
pub const SANDBOX_URL: &str = "https://api.sandbox.cardgate.com";

/// OAuth2 token endpoint path.
pub const AUTH_PATH: &str = "/oauth/auth";

/// Transactions API path.
pub const TRANSACTIONS_PATH: &str = "/transactions";

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long before its declared expiry a cached bearer token is refreshed.
pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
