//! The gateway client.
//!
//! Every operation is a single validate, sign, send cycle. The client holds
//! only its credentials, configuration and transport, none of which change
//! after construction, so one instance can be shared across threads.

use crate::config::GatewayConfig;
use crate::credentials::Credentials;
use crate::error::{GatewayError, Result};
use crate::models::{Bank, BankAccount, Otp, Payout};
use crate::request::{CashInRequest, CashOutRequest, LinkBankAccountRequest};
use crate::signing::SignedPayload;
use crate::transport::{
    ensure_success, HttpResponse, HttpTransport, ReqwestTransport, RequestBody,
};
use log::{debug, warn};
use serde_json::Value;

/// Hosted payment-form endpoint.
pub const PAYFORM_LINK_PATH: &str = "payform-link";
/// Bank list endpoint.
pub const BANKS_PATH: &str = "banks/";
/// Linked bank accounts endpoint.
pub const BANK_ACCOUNT_PATH: &str = "payout/bank-account/";
/// Payout OTP endpoint.
pub const OTP_PATH: &str = "payout/bank-payout/get-otp/";
/// Bank payout endpoint.
pub const PAYOUT_PATH: &str = "payout/bank-payout/";

/// Client for the TraxionPay gateway.
///
/// # Authentication
///
/// [`fetch_banks`](Self::fetch_banks) needs no credentials. Every other
/// operation fails with [`GatewayError::MissingAuthentication`] on a client
/// built with [`unauthenticated`](Self::unauthenticated).
pub struct GatewayClient {
    credentials: Option<Credentials>,
    config: GatewayConfig,
    transport: Box<dyn HttpTransport>,
}

impl GatewayClient {
    /// Creates a client for the sandbox gateway using the reqwest transport.
    ///
    /// Fails with [`GatewayError::Configuration`] if either key is absent.
    pub fn new(secret_key: Option<&str>, api_key: Option<&str>) -> Result<Self> {
        let credentials = Credentials::new(secret_key, api_key)?;
        Ok(GatewayClient::with_transport(
            credentials,
            GatewayConfig::default(),
            ReqwestTransport::new()?,
        ))
    }

    /// Creates a client from `TXNPAY_SECRET_KEY`, `TXNPAY_API_KEY` and `TXNPAY_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let credentials = Credentials::from_env()?;
        Ok(GatewayClient::with_transport(
            credentials,
            GatewayConfig::from_env(),
            ReqwestTransport::new()?,
        ))
    }

    /// Creates an authenticated client over the given transport.
    pub fn with_transport(
        credentials: Credentials,
        config: GatewayConfig,
        transport: impl HttpTransport + 'static,
    ) -> Self {
        GatewayClient {
            credentials: Some(credentials),
            config,
            transport: Box::new(transport),
        }
    }

    /// Creates a client without credentials.
    pub fn unauthenticated(
        config: GatewayConfig,
        transport: impl HttpTransport + 'static,
    ) -> Self {
        GatewayClient {
            credentials: None,
            config,
            transport: Box::new(transport),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> Result<&Credentials> {
        self.credentials
            .as_ref()
            .ok_or(GatewayError::MissingAuthentication)
    }

    /// Creates a hosted payment form and returns its URL.
    ///
    /// The request is validated, signed and posted as
    /// `form_data=base64(json(payload))`. The gateway redirects to the form;
    /// the URL after redirects is returned.
    pub fn cash_in(&self, request: &CashInRequest) -> Result<String> {
        let fields = request.validate()?;
        let credentials = self.credentials()?;
        let payload = SignedPayload::sign(fields, credentials)?;

        let url = self.config.endpoint(PAYFORM_LINK_PATH);
        debug!("POST {}", url);
        let response = self
            .transport
            .post(&url, RequestBody::Form(payload.form_data()?), &[])?;
        let response = self.check(&url, response)?;

        debug!("Payment form created at {}", response.url());
        Ok(response.url().to_string())
    }

    /// Lists the banks payouts can be sent to.
    pub fn fetch_banks(&self) -> Result<Vec<Bank>> {
        let url = self.config.endpoint(BANKS_PATH);
        debug!("GET {}", url);
        let response = self.transport.get(&url, &[])?;
        self.check(&url, response)?.json()
    }

    /// Lists the bank accounts linked to the merchant.
    pub fn fetch_bank_accounts(&self) -> Result<Vec<BankAccount>> {
        let headers = self.credentials()?.auth_headers();
        let url = self.config.endpoint(BANK_ACCOUNT_PATH);
        debug!("GET {}", url);
        let response = self.transport.get(&url, &headers)?;
        self.check(&url, response)?.json()
    }

    /// Links a bank account for payouts and returns it.
    pub fn link_bank_account(&self, request: &LinkBankAccountRequest) -> Result<BankAccount> {
        let body = request.validate()?;
        let headers = self.credentials()?.auth_headers();
        let url = self.config.endpoint(BANK_ACCOUNT_PATH);
        debug!("POST {}", url);
        let response = self
            .transport
            .post(&url, RequestBody::Json(Value::Object(body)), &headers)?;
        self.check(&url, response)?.json()
    }

    /// Requests the one-time password needed by [`cash_out`](Self::cash_out).
    pub fn fetch_otp(&self) -> Result<Otp> {
        let headers = self.credentials()?.auth_headers();
        let url = self.config.endpoint(OTP_PATH);
        debug!("POST {}", url);
        let response = self.transport.post(&url, RequestBody::Empty, &headers)?;
        self.check(&url, response)?.json()
    }

    /// Pays out from the merchant wallet to a linked bank account.
    pub fn cash_out(&self, request: &CashOutRequest) -> Result<Payout> {
        let body = request.validate()?;
        let headers = self.credentials()?.auth_headers();
        let url = self.config.endpoint(PAYOUT_PATH);
        debug!("POST {}", url);
        let response = self
            .transport
            .post(&url, RequestBody::Json(Value::Object(body)), &headers)?;
        self.check(&url, response)?.json()
    }

    fn check(&self, url: &str, response: HttpResponse) -> Result<HttpResponse> {
        if !response.is_success() {
            warn!("{} returned status {}", url, response.status());
        }
        ensure_success(response)
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
