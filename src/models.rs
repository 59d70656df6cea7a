//! Records returned by the gateway.

use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::io::Write;

/// A bank that payouts can be sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// A bank account linked to the merchant for payouts.
///
/// Only `id` is relied upon; every other field is kept as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: i64,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// One-time password authorizing a cash-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Otp {
    /// The code to pass to `cash_out`. Numeric codes are kept as their decimal text.
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a successful cash-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub ref_no: Value,
    pub transaction_id: Value,
    pub remittance_id: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}

/// Writes banks as CSV with an `id,code,name` header.
pub fn write_banks<W: Write>(banks: &[Bank], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["id", "code", "name"])?;
    for bank in banks {
        csv_writer.write_record([bank.id.to_string(), bank.code.clone(), bank.name.clone()])?;
    }

    csv_writer.flush()?;
    Ok(())
}
