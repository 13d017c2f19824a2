//! JSON envelopes returned by the storefront endpoints.
//!
//! Every endpoint answers with an object carrying `success` and, when it
//! declines, an optional `error`. The remaining fields depend on the endpoint.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::ids::ProductId;
use crate::services::StorefrontError;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Split a response into its payload or a decline. A missing `success`
/// counts as a decline.
pub fn decode_envelope<T: DeserializeOwned>(value: Value) -> Result<T, StorefrontError> {
    let envelope = Envelope::deserialize(&value)
        .map_err(|e| StorefrontError::Decode(e.to_string()))?;

    if !envelope.success {
        return Err(StorefrontError::Declined {
            message: envelope.error,
        });
    }

    T::deserialize(value).map_err(|e| StorefrontError::Decode(e.to_string()))
}

/// Amounts may be serialized as numbers or as decimal strings.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {s}"))),
    }
}

/// `/update-cart/{line}/` payload for both update and remove.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartTotals {
    #[serde(deserialize_with = "deserialize_amount")]
    pub total: f64,
    pub cart_count: u32,
}

/// `/add-to-cart/{product}/` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartCount {
    pub cart_count: u32,
}

/// `/update-stock/{product}/` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StockUpdated {
    pub product: ProductStock,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductStock {
    pub id: ProductId,
    pub stock: u32,
}

/// `/clear-cart/` carries nothing the page reads.
pub type Acknowledged = IgnoredAny;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_payload() {
        let totals: CartTotals =
            decode_envelope(json!({"success": true, "total": 300, "cart_count": 2})).unwrap();
        assert_eq!(totals, CartTotals { total: 300.0, cart_count: 2 });
    }

    #[test]
    fn test_decimal_string_total() {
        let totals: CartTotals =
            decode_envelope(json!({"success": true, "total": "149.50", "cart_count": 1})).unwrap();
        assert_eq!(totals.total, 149.5);
    }

    #[test]
    fn test_decline_carries_message() {
        let err = decode_envelope::<Acknowledged>(json!({"success": false, "error": "locked"}))
            .unwrap_err();
        assert_eq!(
            err,
            StorefrontError::Declined {
                message: Some("locked".into())
            }
        );
    }

    #[test]
    fn test_missing_success_is_a_decline() {
        let err = decode_envelope::<Acknowledged>(json!({"status": "ok"})).unwrap_err();
        assert_eq!(err, StorefrontError::Declined { message: None });
    }

    #[test]
    fn test_non_object_or_incomplete_payload_fails_to_decode() {
        assert!(matches!(
            decode_envelope::<CartCount>(json!("<html>")),
            Err(StorefrontError::Decode(_))
        ));
        assert!(matches!(
            decode_envelope::<CartCount>(json!({"success": true})),
            Err(StorefrontError::Decode(_))
        ));
    }

    #[test]
    fn test_stock_payload_with_numeric_id() {
        let updated: StockUpdated =
            decode_envelope(json!({"success": true, "product": {"id": 42, "stock": 0}})).unwrap();
        assert_eq!(updated.product.id, ProductId::from("42"));
        assert_eq!(updated.product.stock, 0);
    }
}
