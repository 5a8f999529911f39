//! Strongly-typed identifiers used across the catalog.
//!
//! Catalog records are keyed by integer ids assigned by the authoritative
//! store. `0` conventionally means "not yet persisted".

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::VariantError;

/// Identifier of an attribute type (e.g. color, text size).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(i64);

/// Identifier of a single attribute value (e.g. "Đỏ", "XL").
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeValueId(i64);

/// Identifier of a base product (product template).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(i64);

/// Identifier of a locally stored variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(i64);

/// Identifier assigned to a variant by the remote catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteVariantId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> i64 {
                self.0
            }

            /// `true` for the placeholder id of a record that was never persisted.
            pub const fn is_unsaved(&self) -> bool {
                self.0 == 0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = VariantError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| VariantError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(AttributeId, "AttributeId");
impl_int_newtype!(AttributeValueId, "AttributeValueId");
impl_int_newtype!(TemplateId, "TemplateId");
impl_int_newtype!(VariantId, "VariantId");
impl_int_newtype!(RemoteVariantId, "RemoteVariantId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_round_trip() {
        let id: TemplateId = " 1042 ".parse().unwrap();
        assert_eq!(id, TemplateId::new(1042));
        assert_eq!(id.to_string(), "1042");
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = "abc".parse::<VariantId>().unwrap_err();
        match err {
            VariantError::InvalidId(msg) => assert!(msg.starts_with("VariantId")),
            _ => panic!("Expected InvalidId error"),
        }
    }

    #[test]
    fn zero_is_unsaved() {
        assert!(VariantId::new(0).is_unsaved());
        assert!(!VariantId::new(7).is_unsaved());
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&AttributeValueId::new(12)).unwrap();
        assert_eq!(json, "12");
    }
}
