//! Merchant credentials and the token derived from them.

use crate::error::{GatewayError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::env;
use std::fmt;

/// Environment variable holding the merchant secret key.
pub const SECRET_KEY_VAR: &str = "TXNPAY_SECRET_KEY";

/// Environment variable holding the merchant api key.
pub const API_KEY_VAR: &str = "TXNPAY_API_KEY";

/// Derives the bearer token for a secret key.
///
/// The token is the standard (padded) base64 encoding of the key bytes.
///
/// # Examples
///
/// ```
/// use txnpay::generate_token;
///
/// assert_eq!(generate_token(Some("secret")).unwrap(), "c2VjcmV0");
/// assert!(generate_token(None).is_err());
/// ```
pub fn generate_token(secret_key: Option<&str>) -> Result<String> {
    match secret_key {
        Some(key) => Ok(BASE64.encode(key.as_bytes())),
        None => Err(GatewayError::Configuration(
            "secret key cannot be empty".to_string(),
        )),
    }
}

/// A merchant's secret key and api key.
///
/// Immutable once constructed. `Debug` output never shows the keys.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    secret_key: String,
    api_key: String,
}

impl Credentials {
    /// Creates credentials, failing if either key is absent.
    pub fn new(secret_key: Option<&str>, api_key: Option<&str>) -> Result<Self> {
        match (secret_key, api_key) {
            (Some(secret_key), Some(api_key)) => Ok(Credentials {
                secret_key: secret_key.to_string(),
                api_key: api_key.to_string(),
            }),
            _ => Err(GatewayError::Configuration(
                "secret key and api key cannot be empty".to_string(),
            )),
        }
    }

    /// Reads `TXNPAY_SECRET_KEY` and `TXNPAY_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let secret_key = env::var(SECRET_KEY_VAR).ok();
        let api_key = env::var(API_KEY_VAR).ok();
        Credentials::new(secret_key.as_deref(), api_key.as_deref())
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base64 token used in the `Authorization: Basic` header.
    pub fn token(&self) -> String {
        BASE64.encode(self.secret_key.as_bytes())
    }

    /// Headers sent with every authenticated request.
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("Basic {}", self.token())),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_key", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
