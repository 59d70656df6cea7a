//! Request signing and payload encoding.
//!
//! A cash-in payload carries two HMAC-SHA256 signatures keyed by the merchant
//! secret key:
//!
//! - `secure_hash` over `merchant_ref_no ++ amount ++ "PHP" ++ description`
//! - `auth_hash` over the api key
//!
//! Both are lowercase hex. The signed field map is serialized to JSON and
//! base64-encoded into the `form_data` form field.

use crate::credentials::Credentials;
use crate::error::{GatewayError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use serde_json::{Map, Number, Value};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Algorithm tag sent alongside the signatures.
pub const ALGORITHM: &str = "HS256";

/// Currency code the secure hash is computed over, regardless of the
/// request's `currency` field.
pub const HASH_CURRENCY: &str = "PHP";

/// HMAC-SHA256 of `message` keyed by `key`, hex-encoded.
pub fn hmac_sha256_hex(key: &str, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| GatewayError::Configuration(format!("invalid signing key: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Renders an amount the way it appears in the hashed string.
///
/// Integers render without a fractional part (`1500`), floats always carry
/// one (`1500.0`).
pub fn amount_repr(amount: &Number) -> String {
    amount.to_string()
}

/// Signature proving the integrity of a cash-in's transaction fields.
pub fn secure_hash(
    secret_key: &str,
    merchant_ref_no: &str,
    amount: &Number,
    description: &str,
) -> Result<String> {
    let data = format!(
        "{}{}{}{}",
        merchant_ref_no,
        amount_repr(amount),
        HASH_CURRENCY,
        description
    );
    hmac_sha256_hex(secret_key, &data)
}

/// Signature proving the caller holds the api key.
pub fn auth_hash(secret_key: &str, api_key: &str) -> Result<String> {
    hmac_sha256_hex(secret_key, api_key)
}

/// A validated cash-in field map with `secure_hash`, `auth_hash` and `alg` attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedPayload {
    fields: Map<String, Value>,
}

impl SignedPayload {
    /// Signs validated cash-in fields.
    ///
    /// `fields` must contain `merchant_ref_no`, `amount` and `description`.
    pub fn sign(mut fields: Map<String, Value>, credentials: &Credentials) -> Result<Self> {
        let merchant_ref_no = fields
            .get("merchant_ref_no")
            .and_then(Value::as_str)
            .ok_or(GatewayError::MissingField {
                field: "merchant_ref_no",
            })?;
        let amount = match fields.get("amount") {
            Some(Value::Number(amount)) => amount,
            Some(_) => {
                return Err(GatewayError::WrongType {
                    field: "amount",
                    expected: "float",
                })
            }
            None => return Err(GatewayError::MissingField { field: "amount" }),
        };
        let description = fields
            .get("description")
            .and_then(Value::as_str)
            .ok_or(GatewayError::MissingField {
                field: "description",
            })?;

        let secure = secure_hash(
            credentials.secret_key(),
            merchant_ref_no,
            amount,
            description,
        )?;
        let auth = auth_hash(credentials.secret_key(), credentials.api_key())?;

        fields.insert("secure_hash".to_string(), Value::String(secure));
        fields.insert("auth_hash".to_string(), Value::String(auth));
        fields.insert("alg".to_string(), Value::String(ALGORITHM.to_string()));

        Ok(SignedPayload { fields })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn secure_hash(&self) -> &str {
        self.fields
            .get("secure_hash")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn auth_hash(&self) -> &str {
        self.fields
            .get("auth_hash")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Base64 of the JSON-serialized field map.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(&self.fields)?;
        Ok(BASE64.encode(json))
    }

    /// The form body posted to the payment-form endpoint.
    pub fn form_data(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![("form_data".to_string(), self.encode()?)])
    }
}

/// Encodes merchant additional data for the `merchant_additional_data` field.
///
/// Only JSON objects are accepted.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use txnpay::encode_additional_data;
///
/// let encoded = encode_additional_data(&json!({"payment_code": "ABC"})).unwrap();
/// assert_eq!(encoded, "eyJwYXltZW50X2NvZGUiOiJBQkMifQ==");
/// ```
pub fn encode_additional_data(additional_data: &Value) -> Result<String> {
    if !additional_data.is_object() {
        return Err(GatewayError::WrongType {
            field: "additional_data",
            expected: "dict",
        });
    }
    let json = serde_json::to_vec(additional_data)?;
    Ok(BASE64.encode(json))
}

/// Returns `true` if `encoded` is canonical base64 of a JSON object.
pub fn is_additional_data_valid(encoded: &str) -> bool {
    let Ok(decoded) = BASE64.decode(encoded) else {
        return false;
    };
    if BASE64.encode(&decoded) != encoded {
        return false;
    }
    matches!(
        serde_json::from_slice::<Value>(&decoded),
        Ok(Value::Object(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "cxl+hwc%97h6+4#lx1au*ut=ml+=!fx85w94iuf*06=rf383xs";
    const API_KEY: &str = "7)5dmcfy^dp*9bdrcfcm$k-n=p7b!x(t)_f^i8mxl@v_+rno*x";

    #[test]
    fn test_hmac_known_vector() {
        assert_eq!(
            hmac_sha256_hex("key", "The quick brown fox jumps over the lazy dog").unwrap(),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    fn number(value: Value) -> Number {
        match value {
            Value::Number(n) => n,
            other => panic!("Expected number, got {}", other),
        }
    }

    #[test]
    fn test_secure_hash() {
        let amount = number(json!(1500.0));
        let hash = secure_hash(SECRET, "ABC123DEF456", &amount, "My test payment").unwrap();
        assert_eq!(
            hash,
            "c5d53f82e5f615dad7d027fc788b9504d8c6a6859fea1fa4e0c87faaa64a9bbe"
        );
        let again = secure_hash(SECRET, "ABC123DEF456", &amount, "My test payment").unwrap();
        assert_eq!(hash, again);
    }

    #[test]
    fn test_auth_hash() {
        assert_eq!(
            auth_hash(SECRET, API_KEY).unwrap(),
            "a6e2e678d349b1e8cc279a2bf4557acf711572d6d50dabb23a21d415e79ed169"
        );
    }

    #[test]
    fn test_amount_repr() {
        assert_eq!(amount_repr(&number(json!(1500.0))), "1500.0");
        assert_eq!(amount_repr(&number(json!(1500))), "1500");
        assert_eq!(amount_repr(&number(json!(99.95))), "99.95");
    }

    #[test]
    fn test_sign_appends_derived_fields_last() {
        let creds = Credentials::new(Some(SECRET), Some(API_KEY)).unwrap();
        let mut fields = Map::new();
        fields.insert("merchant_ref_no".to_string(), json!("ABC123DEF456"));
        fields.insert("description".to_string(), json!("My test payment"));
        fields.insert("amount".to_string(), json!(1500.0));

        let payload = SignedPayload::sign(fields, &creds).unwrap();
        let keys: Vec<&str> = payload.fields().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "merchant_ref_no",
                "description",
                "amount",
                "secure_hash",
                "auth_hash",
                "alg"
            ]
        );
        assert_eq!(payload.fields()["alg"], json!("HS256"));
        assert_eq!(
            payload.secure_hash(),
            "c5d53f82e5f615dad7d027fc788b9504d8c6a6859fea1fa4e0c87faaa64a9bbe"
        );
    }

    #[test]
    fn test_encode_round_trips_to_fields() {
        let creds = Credentials::new(Some(SECRET), Some(API_KEY)).unwrap();
        let mut fields = Map::new();
        fields.insert("merchant_ref_no".to_string(), json!("R"));
        fields.insert("description".to_string(), json!("D"));
        fields.insert("amount".to_string(), json!(1));
        let payload = SignedPayload::sign(fields, &creds).unwrap();

        let form = payload.form_data().unwrap();
        assert_eq!(form[0].0, "form_data");
        let decoded = BASE64.decode(&form[0].1).unwrap();
        let value: Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(&value, &Value::Object(payload.fields().clone()));
    }

    #[test]
    fn test_sign_requires_hashed_fields() {
        let creds = Credentials::new(Some(SECRET), Some(API_KEY)).unwrap();
        let err = SignedPayload::sign(Map::new(), &creds).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::MissingField {
                field: "merchant_ref_no"
            }
        ));
    }

    #[test]
    fn test_sign_rejects_text_amount() {
        let creds = Credentials::new(Some(SECRET), Some(API_KEY)).unwrap();
        let mut fields = Map::new();
        fields.insert("merchant_ref_no".to_string(), json!("R"));
        fields.insert("description".to_string(), json!("D"));
        fields.insert("amount".to_string(), json!("1500"));

        let err = SignedPayload::sign(fields, &creds).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::WrongType {
                field: "amount",
                expected: "float"
            }
        ));
    }

    #[test]
    fn test_additional_data_helpers() {
        let encoded = encode_additional_data(&json!({"payment_code": "ABC123DEF456"})).unwrap();
        assert!(is_additional_data_valid(&encoded));

        assert!(encode_additional_data(&json!("plain")).is_err());
        assert!(!is_additional_data_valid("not base64!"));
        // base64 of a JSON array
        assert!(!is_additional_data_valid("WzEsMl0="));
    }
}
