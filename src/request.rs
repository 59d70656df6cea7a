//! Request builders and their field tables.
//!
//! Field values are held as [`FieldValue`]s wrapping [`serde_json::Value`] so
//! that a value of the wrong type is reported as a type error by the gateway
//! client instead of being ruled out at compile time. `Value::Null` is treated
//! as an absent field.

use crate::error::{GatewayError, Result};
use crate::fields::{validate, FieldKind, FieldSpec, FieldValue, FieldValues};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accepted values for a bank account's type.
pub const BANK_TYPES: &[&str] = &["savings", "checkings"];

/// Cash-in fields in the order they are validated and sent.
pub const CASH_IN_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("merchant_id", FieldKind::Integer),
    FieldSpec::required("merchant_ref_no", FieldKind::String).max_len(100),
    FieldSpec::required("description", FieldKind::String).max_len(500),
    FieldSpec::required("amount", FieldKind::Number),
    FieldSpec::optional("merchant_additional_data", ""),
    FieldSpec::optional("currency", "PHP"),
    FieldSpec::optional("billing_email", ""),
    FieldSpec::optional("billing_first_name", ""),
    FieldSpec::optional("billing_last_name", ""),
    FieldSpec::optional("billing_middle_name", ""),
    FieldSpec::optional("billing_phone", ""),
    FieldSpec::optional("billing_mobile", ""),
    FieldSpec::optional("billing_address", ""),
    FieldSpec::optional("billing_address2", ""),
    FieldSpec::optional("billing_city", ""),
    FieldSpec::optional("billing_state", ""),
    FieldSpec::optional("billing_zip", ""),
    FieldSpec::optional("billing_country", "PH"),
    FieldSpec::optional("billing_remark", ""),
    FieldSpec::optional("payment_method", ""),
    FieldSpec::optional("status_notification_url", ""),
    FieldSpec::optional("success_page_url", ""),
    FieldSpec::optional("failure_page_url", ""),
    FieldSpec::optional("cancel_page_url", ""),
    FieldSpec::optional("pending_page_url", ""),
];

/// Cash-out fields.
pub const CASH_OUT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("otp", FieldKind::String).sent_as("OTP"),
    FieldSpec::required("amount", FieldKind::Number),
    FieldSpec::required("bank_account", FieldKind::Integer),
];

/// Bank-account linking fields.
pub const LINK_BANK_ACCOUNT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("bank_code", FieldKind::String).sent_as("bank"),
    FieldSpec::required("bank_type", FieldKind::String).allowed(BANK_TYPES),
    FieldSpec::required("account_number", FieldKind::String),
    FieldSpec::required("account_name", FieldKind::String).max_len(50),
];

/// Optional customer billing details attached to a cash-in.
///
/// Each field is sent as `billing_<name>`. Unset fields fall back to the
/// gateway defaults (empty, or `"PH"` for the country).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingDetails {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub remark: Option<String>,
}

impl BillingDetails {
    fn entries(&self) -> [(&'static str, &Option<String>); 13] {
        [
            ("billing_email", &self.email),
            ("billing_first_name", &self.first_name),
            ("billing_last_name", &self.last_name),
            ("billing_middle_name", &self.middle_name),
            ("billing_phone", &self.phone),
            ("billing_mobile", &self.mobile),
            ("billing_address", &self.address),
            ("billing_address2", &self.address2),
            ("billing_city", &self.city),
            ("billing_state", &self.state),
            ("billing_zip", &self.zip),
            ("billing_country", &self.country),
            ("billing_remark", &self.remark),
        ]
    }
}

/// Fields of a hosted payment-form request.
///
/// # Examples
///
/// ```
/// use txnpay::{BillingDetails, CashInRequest};
///
/// let request = CashInRequest::new(6328, "ABC123DEF456", "My test payment", 1500.0)
///     .set("success_page_url", "https://shop.example/ok")
///     .billing(BillingDetails {
///         email: Some("juan@example.com".to_string()),
///         ..Default::default()
///     });
///
/// let fields = request.validate().unwrap();
/// assert_eq!(fields["currency"], "PHP");
/// assert_eq!(fields["billing_email"], "juan@example.com");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashInRequest {
    fields: FieldValues,
}

impl CashInRequest {
    /// Creates a request with the four mandatory fields.
    pub fn new(
        merchant_id: impl Into<FieldValue>,
        merchant_ref_no: impl Into<FieldValue>,
        description: impl Into<FieldValue>,
        amount: impl Into<FieldValue>,
    ) -> Self {
        CashInRequest::empty()
            .set("merchant_id", merchant_id)
            .set("merchant_ref_no", merchant_ref_no)
            .set("description", description)
            .set("amount", amount)
    }

    /// Creates a request with no fields set.
    pub fn empty() -> Self {
        CashInRequest::default()
    }

    /// Sets a field by name. Setting `Value::Null` marks it absent.
    pub fn set(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Removes a field.
    pub fn unset(mut self, name: &str) -> Self {
        self.fields.remove(name);
        self
    }

    /// Copies every set billing detail into the request.
    pub fn billing(mut self, billing: BillingDetails) -> Self {
        for (name, value) in billing.entries() {
            if let Some(value) = value {
                self.fields
                    .insert(name.to_string(), FieldValue::from(value.as_str()));
            }
        }
        self
    }

    /// Builds a request from a JSON object.
    ///
    /// A nested `billing` object is flattened into `billing_<name>` fields
    /// without type coercion, so its values are checked like any other field.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(GatewayError::WrongType {
                field: "cash_in",
                expected: "dict",
            });
        };

        let mut fields: FieldValues = map
            .into_iter()
            .map(|(name, value)| (name, FieldValue::Json(value)))
            .collect();

        match fields.remove("billing") {
            Some(FieldValue::Json(Value::Object(billing))) => {
                for (name, value) in billing {
                    fields.insert(format!("billing_{}", name), FieldValue::Json(value));
                }
            }
            Some(FieldValue::Json(Value::Null)) | None => {}
            Some(_) => {
                return Err(GatewayError::WrongType {
                    field: "billing",
                    expected: "dict",
                })
            }
        }

        Ok(CashInRequest { fields })
    }

    /// Returns the raw value of a field, if set.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Validates every field and fills in defaults.
    pub fn validate(&self) -> Result<Map<String, Value>> {
        validate(CASH_IN_FIELDS, &self.fields)
    }
}

/// Fields of a payout to a linked bank account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashOutRequest {
    pub otp: Option<FieldValue>,
    pub amount: Option<FieldValue>,
    pub bank_account: Option<FieldValue>,
}

impl CashOutRequest {
    pub fn new(
        otp: impl Into<FieldValue>,
        amount: impl Into<FieldValue>,
        bank_account: impl Into<FieldValue>,
    ) -> Self {
        CashOutRequest {
            otp: Some(otp.into()),
            amount: Some(amount.into()),
            bank_account: Some(bank_account.into()),
        }
    }

    /// Validates the request and returns the JSON body `{OTP, amount, bank_account}`.
    pub fn validate(&self) -> Result<Map<String, Value>> {
        let input = collect([
            ("otp", &self.otp),
            ("amount", &self.amount),
            ("bank_account", &self.bank_account),
        ]);
        validate(CASH_OUT_FIELDS, &input)
    }
}

/// Fields of a bank account to link for payouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkBankAccountRequest {
    pub bank_code: Option<FieldValue>,
    pub bank_type: Option<FieldValue>,
    pub account_number: Option<FieldValue>,
    pub account_name: Option<FieldValue>,
}

impl LinkBankAccountRequest {
    pub fn new(
        bank_code: impl Into<FieldValue>,
        bank_type: impl Into<FieldValue>,
        account_number: impl Into<FieldValue>,
        account_name: impl Into<FieldValue>,
    ) -> Self {
        LinkBankAccountRequest {
            bank_code: Some(bank_code.into()),
            bank_type: Some(bank_type.into()),
            account_number: Some(account_number.into()),
            account_name: Some(account_name.into()),
        }
    }

    /// Validates the request and returns the JSON body
    /// `{bank, bank_type, account_number, account_name}`.
    pub fn validate(&self) -> Result<Map<String, Value>> {
        let input = collect([
            ("bank_code", &self.bank_code),
            ("bank_type", &self.bank_type),
            ("account_number", &self.account_number),
            ("account_name", &self.account_name),
        ]);
        validate(LINK_BANK_ACCOUNT_FIELDS, &input)
    }
}

fn collect<const N: usize>(entries: [(&str, &Option<FieldValue>); N]) -> FieldValues {
    entries
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|v| (name.to_string(), v)))
        .collect()
}
