use serde::{Deserialize, Deserializer};
use std::fmt;

/// Ids arrive as strings from `data-*` attributes and as numbers from JSON
/// responses; both normalize to the same string form.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s.trim().to_string(),
    })
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into().trim().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserialize_id(deserializer).map(Self)
            }
        }
    };
}

opaque_id!(
    /// Cart-item id, distinct from the product id of the item.
    CartLineId
);
opaque_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_and_string_ids_agree() {
        let from_json: ProductId = serde_json::from_str("42").unwrap();
        let from_text: ProductId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_json, from_text);
        assert_eq!(from_json, ProductId::from("42"));
        assert_eq!(from_json, ProductId::from(42u64));
    }

    #[test]
    fn test_attribute_whitespace_is_ignored() {
        assert_eq!(CartLineId::new(" 7 ").as_str(), "7");
    }
}
