//! Base products and the variants generated from them.

use serde::{Deserialize, Serialize};

use skuforge_core::{TemplateId, VariantId};

use crate::attribute::AttributeValue;
use crate::signature::{Signature, signature_of};

/// The parent catalog entry a variant set is expanded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseProduct {
    pub id: TemplateId,
    pub name: String,
    pub default_code: String,
    pub list_price: f64,
}

impl BaseProduct {
    pub fn new(
        id: impl Into<TemplateId>,
        name: impl Into<String>,
        default_code: impl Into<String>,
        list_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default_code: default_code.into(),
            list_price,
        }
    }
}

/// A concrete, sellable combination of one value per attribute line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVariant {
    /// `0` until the variant is persisted.
    pub id: VariantId,
    pub name: String,
    pub name_get: String,
    pub default_code: String,
    pub attribute_values: Vec<AttributeValue>,
    pub active: bool,
    pub product_template_id: TemplateId,
    pub price_variant: f64,
}

impl GeneratedVariant {
    pub fn is_persisted(&self) -> bool {
        !self.id.is_unsaved()
    }

    /// Order-independent identity derived from the attribute value ids.
    pub fn signature(&self) -> Signature {
        signature_of(&self.attribute_values)
    }
}
