//! # txnpay
//!
//! A client for the TraxionPay payment gateway.
//!
//! - **Cash in**: [`GatewayClient::cash_in`] validates and signs a payment
//!   request and returns the URL of the hosted payment form.
//! - **Cash out**: [`GatewayClient::cash_out`] pays out from the merchant
//!   wallet to a linked bank account, authorized by an OTP from
//!   [`GatewayClient::fetch_otp`].
//!
//! ## Design Principles
//!
//! - **Table-driven validation**: each request is an ordered list of
//!   [`FieldSpec`] rules checked by a single routine
//! - **Deterministic signing**: HMAC-SHA256 over fixed fields, no salt
//! - **Injectable transport**: all HTTP goes through [`HttpTransport`]
//!
//! ## Example
//!
//! ```no_run
//! use txnpay::{CashInRequest, GatewayClient};
//!
//! let client = GatewayClient::new(Some("secret-key"), Some("api-key")).unwrap();
//! let request = CashInRequest::new(6328, "ABC123DEF456", "My test payment", 1500.0)
//!     .set("success_page_url", "https://shop.example/thanks");
//! let url = client.cash_in(&request).unwrap();
//! println!("{}", url);
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fields;
pub mod models;
pub mod request;
pub mod signing;
pub mod transport;

pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use credentials::{generate_token, Credentials};
pub use error::{GatewayError, Result};
pub use fields::{FieldKind, FieldSpec, FieldValue, FieldValues};
pub use models::{Bank, BankAccount, Otp, Payout};
pub use request::{BillingDetails, CashInRequest, CashOutRequest, LinkBankAccountRequest};
pub use signing::{encode_additional_data, is_additional_data_valid, SignedPayload};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, RequestBody};
