//! Attribute reference data: values, lines, and the typed catalog registry.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use skuforge_core::{AttributeId, AttributeValueId, VariantError, VariantResult};

/// The three attribute types that participate in variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeKind {
    TextSize,
    Color,
    NumberSize,
}

impl AttributeKind {
    /// Canonical line order used when several kinds are combined.
    pub const ALL: [AttributeKind; 3] = [
        AttributeKind::TextSize,
        AttributeKind::Color,
        AttributeKind::NumberSize,
    ];

    pub fn attribute_id(self) -> AttributeId {
        match self {
            AttributeKind::TextSize => AttributeId::new(1),
            AttributeKind::Color => AttributeId::new(3),
            AttributeKind::NumberSize => AttributeId::new(4),
        }
    }

    pub fn attribute_name(self) -> &'static str {
        match self {
            AttributeKind::TextSize => "Size Chữ",
            AttributeKind::Color => "Màu",
            AttributeKind::NumberSize => "Size Số",
        }
    }

    /// Short machine label, used in logs and lookup-miss warnings.
    pub fn label(self) -> &'static str {
        match self {
            AttributeKind::TextSize => "size-text",
            AttributeKind::Color => "color",
            AttributeKind::NumberSize => "size-number",
        }
    }
}

impl core::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single attribute value (e.g. color "Đỏ", size "XL").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub id: AttributeValueId,
    pub name: String,
    /// Short code used when deriving variant codes. Empty when absent.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub sequence: Option<i32>,
    pub attribute_id: AttributeId,
    pub attribute_name: String,
}

impl AttributeValue {
    pub fn new(
        kind: AttributeKind,
        id: impl Into<AttributeValueId>,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            sequence: None,
            attribute_id: kind.attribute_id(),
            attribute_name: kind.attribute_name().to_string(),
        }
    }

    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence = Some(sequence);
        self
    }
}

/// The chosen values of one attribute type for a product.
///
/// Value order is significant: it drives combination order, code
/// concatenation and name composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeLine {
    pub attribute_id: AttributeId,
    pub attribute_name: String,
    pub values: Vec<AttributeValue>,
}

impl AttributeLine {
    pub fn new(
        attribute_id: AttributeId,
        attribute_name: impl Into<String>,
        values: Vec<AttributeValue>,
    ) -> Self {
        Self {
            attribute_id,
            attribute_name: attribute_name.into(),
            values,
        }
    }

    pub fn for_kind(kind: AttributeKind, values: Vec<AttributeValue>) -> Self {
        Self::new(kind.attribute_id(), kind.attribute_name(), values)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Typed, total lookup of attribute values by name.
///
/// Every lookup returns `None` for unknown names; none of them fail.
pub trait AttributeRegistry: Send + Sync {
    fn by_color(&self, name: &str) -> Option<AttributeValue>;
    fn by_text_size(&self, name: &str) -> Option<AttributeValue>;
    fn by_number_size(&self, name: &str) -> Option<AttributeValue>;

    fn lookup(&self, kind: AttributeKind, name: &str) -> Option<AttributeValue> {
        match kind {
            AttributeKind::TextSize => self.by_text_size(name),
            AttributeKind::Color => self.by_color(name),
            AttributeKind::NumberSize => self.by_number_size(name),
        }
    }
}

impl<R> AttributeRegistry for Arc<R>
where
    R: AttributeRegistry + ?Sized,
{
    fn by_color(&self, name: &str) -> Option<AttributeValue> {
        (**self).by_color(name)
    }

    fn by_text_size(&self, name: &str) -> Option<AttributeValue> {
        (**self).by_text_size(name)
    }

    fn by_number_size(&self, name: &str) -> Option<AttributeValue> {
        (**self).by_number_size(name)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse attribute catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate {kind} value name '{name}'")]
    DuplicateName { kind: AttributeKind, name: String },
}

/// Normalized lookup key: trimmed and lower-cased.
pub(crate) fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Default)]
struct Registry {
    values: Vec<AttributeValue>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
}

impl Registry {
    fn build(kind: AttributeKind, values: Vec<AttributeValue>) -> Result<Self, CatalogError> {
        let mut registry = Registry::default();
        for value in values {
            let idx = registry.values.len();
            let name_key = lookup_key(&value.name);
            if registry.by_name.insert(name_key, idx).is_some() {
                return Err(CatalogError::DuplicateName {
                    kind,
                    name: value.name,
                });
            }
            if !value.code.trim().is_empty() {
                registry.by_code.entry(lookup_key(&value.code)).or_insert(idx);
            }
            registry.values.push(value);
        }
        Ok(registry)
    }

    fn find(&self, name: &str) -> Option<AttributeValue> {
        let key = lookup_key(name);
        if key.is_empty() {
            return None;
        }
        self.by_name
            .get(&key)
            .or_else(|| self.by_code.get(&key))
            .map(|&idx| self.values[idx].clone())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: i64,
    name: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    sequence: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDocument {
    #[serde(default)]
    colors: Vec<CatalogEntry>,
    #[serde(default)]
    text_sizes: Vec<CatalogEntry>,
    #[serde(default)]
    number_sizes: Vec<CatalogEntry>,
}

/// In-memory attribute catalog partitioned by attribute type.
///
/// Names are matched case-insensitively after trimming; a value's code is
/// accepted as an alias of its name.
#[derive(Debug, Clone, Default)]
pub struct StaticAttributeCatalog {
    colors: Registry,
    text_sizes: Registry,
    number_sizes: Registry,
}

impl StaticAttributeCatalog {
    pub fn new(
        colors: Vec<AttributeValue>,
        text_sizes: Vec<AttributeValue>,
        number_sizes: Vec<AttributeValue>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            colors: Registry::build(AttributeKind::Color, colors)?,
            text_sizes: Registry::build(AttributeKind::TextSize, text_sizes)?,
            number_sizes: Registry::build(AttributeKind::NumberSize, number_sizes)?,
        })
    }

    /// Load a catalog from a JSON document shaped as
    /// `{"colors": [...], "textSizes": [...], "numberSizes": [...]}` where each
    /// entry is `{"id", "name", "code"?, "sequence"?}`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        let convert = |kind: AttributeKind, entries: Vec<CatalogEntry>| -> Vec<AttributeValue> {
            entries
                .into_iter()
                .map(|e| AttributeValue {
                    id: AttributeValueId::new(e.id),
                    name: e.name,
                    code: e.code,
                    sequence: e.sequence,
                    attribute_id: kind.attribute_id(),
                    attribute_name: kind.attribute_name().to_string(),
                })
                .collect()
        };

        Self::new(
            convert(AttributeKind::Color, doc.colors),
            convert(AttributeKind::TextSize, doc.text_sizes),
            convert(AttributeKind::NumberSize, doc.number_sizes),
        )
    }

    /// Default registries: common colors, letter sizes and numeric sizes 1..=44.
    pub fn builtin() -> Self {
        const TEXT_SIZES: [(&str, &str); 8] = [
            ("XS", "XS"),
            ("S", "S"),
            ("M", "M"),
            ("L", "L"),
            ("XL", "XL"),
            ("XXL", "XXL"),
            ("XXXL", "XXXL"),
            ("Freesize", "FS"),
        ];
        const COLORS: [(&str, &str); 14] = [
            ("Trắng", "trang"),
            ("Đen", "den"),
            ("Đỏ", "do"),
            ("Xanh", "xanh"),
            ("Xanh Dương", "xanhduong"),
            ("Xanh Lá", "xanhla"),
            ("Vàng", "vang"),
            ("Hồng", "hong"),
            ("Tím", "tim"),
            ("Xám", "xam"),
            ("Nâu", "nau"),
            ("Cam", "cam"),
            ("Be", "be"),
            ("Kem", "kem"),
        ];

        let text_sizes = TEXT_SIZES
            .iter()
            .enumerate()
            .map(|(i, (name, code))| {
                AttributeValue::new(AttributeKind::TextSize, 10 + i as i64, *name, *code)
                    .with_sequence(i as i32)
            })
            .collect();
        let colors = COLORS
            .iter()
            .enumerate()
            .map(|(i, (name, code))| {
                AttributeValue::new(AttributeKind::Color, 100 + i as i64, *name, *code)
                    .with_sequence(i as i32)
            })
            .collect();
        let number_sizes = (1..=44)
            .map(|n: i64| {
                AttributeValue::new(AttributeKind::NumberSize, 200 + n, n.to_string(), n.to_string())
                    .with_sequence(n as i32)
            })
            .collect();

        let catalog = Self::new(colors, text_sizes, number_sizes);
        debug_assert!(catalog.is_ok(), "builtin attribute names must be distinct per kind");
        catalog.unwrap_or_default()
    }

    pub fn values(&self, kind: AttributeKind) -> &[AttributeValue] {
        match kind {
            AttributeKind::TextSize => &self.text_sizes.values,
            AttributeKind::Color => &self.colors.values,
            AttributeKind::NumberSize => &self.number_sizes.values,
        }
    }

    /// Build a line from value names, failing on the first unknown name.
    pub fn line_for(&self, kind: AttributeKind, names: &[&str]) -> VariantResult<AttributeLine> {
        let values = names
            .iter()
            .map(|name| {
                self.lookup(kind, name)
                    .ok_or_else(|| VariantError::lookup_miss(kind.label(), *name))
            })
            .collect::<VariantResult<Vec<_>>>()?;
        Ok(AttributeLine::for_kind(kind, values))
    }
}

impl AttributeRegistry for StaticAttributeCatalog {
    fn by_color(&self, name: &str) -> Option<AttributeValue> {
        self.colors.find(name)
    }

    fn by_text_size(&self, name: &str) -> Option<AttributeValue> {
        self.text_sizes.find(name)
    }

    fn by_number_size(&self, name: &str) -> Option<AttributeValue> {
        self.number_sizes.find(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_resolves_each_kind() {
        let catalog = StaticAttributeCatalog::builtin();

        let red = catalog.by_color("đỏ").unwrap();
        assert_eq!(red.name, "Đỏ");
        assert_eq!(red.attribute_id, AttributeKind::Color.attribute_id());

        let xl = catalog.by_text_size(" xl ").unwrap();
        assert_eq!(xl.code, "XL");

        let n28 = catalog.by_number_size("28").unwrap();
        assert_eq!(n28.attribute_name, "Size Số");
        assert_eq!(catalog.values(AttributeKind::NumberSize).len(), 44);
    }

    #[test]
    fn builtin_catalog_is_complete_for_every_kind() {
        let catalog = StaticAttributeCatalog::builtin();
        let expected = [
            (AttributeKind::TextSize, 8),
            (AttributeKind::Color, 14),
            (AttributeKind::NumberSize, 44),
        ];

        for (kind, count) in expected {
            let values = catalog.values(kind);
            assert_eq!(values.len(), count, "{kind} value count");
            for value in values {
                let found = catalog.lookup(kind, &value.name).unwrap();
                assert_eq!(found.id, value.id, "{kind} '{}' resolves to itself", value.name);
                assert_eq!(found.attribute_id, kind.attribute_id());
            }
        }
    }

    #[test]
    fn lookups_are_total() {
        let catalog = StaticAttributeCatalog::builtin();
        assert!(catalog.by_color("Cầu vồng").is_none());
        assert!(catalog.by_text_size("").is_none());
        assert!(catalog.by_number_size("99").is_none());
        assert!(catalog.lookup(AttributeKind::Color, "   ").is_none());
    }

    #[test]
    fn code_is_accepted_as_alias() {
        let catalog = StaticAttributeCatalog::builtin();
        assert_eq!(catalog.by_color("den").unwrap().name, "Đen");
    }

    #[test]
    fn kinds_do_not_leak_into_each_other() {
        let catalog = StaticAttributeCatalog::builtin();
        assert!(catalog.by_color("XL").is_none());
        assert!(catalog.by_text_size("Đỏ").is_none());
    }

    #[test]
    fn from_json_builds_registries() {
        let json = r#"{
            "colors": [{"id": 7, "name": "Olive", "code": "olv"}],
            "textSizes": [{"id": 8, "name": "Big", "sequence": 2}]
        }"#;
        let catalog = StaticAttributeCatalog::from_json(json).unwrap();

        let olive = catalog.by_color("OLIVE").unwrap();
        assert_eq!(olive.id, AttributeValueId::new(7));
        assert_eq!(olive.code, "olv");

        let big = catalog.by_text_size("big").unwrap();
        assert_eq!(big.code, "");
        assert_eq!(big.sequence, Some(2));
        assert!(catalog.values(AttributeKind::NumberSize).is_empty());
    }

    #[test]
    fn from_json_rejects_duplicate_names() {
        let json = r#"{"colors": [{"id": 1, "name": "Đỏ"}, {"id": 2, "name": "đỏ"}]}"#;
        match StaticAttributeCatalog::from_json(json) {
            Err(CatalogError::DuplicateName { kind, .. }) => assert_eq!(kind, AttributeKind::Color),
            other => panic!("Expected DuplicateName error, got {other:?}"),
        }
    }

    #[test]
    fn from_json_reports_parse_errors() {
        assert!(matches!(
            StaticAttributeCatalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn line_for_preserves_order_and_reports_misses() {
        let catalog = StaticAttributeCatalog::builtin();
        let line = catalog
            .line_for(AttributeKind::TextSize, &["M", "S"])
            .unwrap();
        let names: Vec<_> = line.values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["M", "S"]);
        assert_eq!(line.attribute_name, "Size Chữ");

        let err = catalog
            .line_for(AttributeKind::Color, &["Đỏ", "Cầu vồng"])
            .unwrap_err();
        assert_eq!(err, VariantError::lookup_miss("color", "Cầu vồng"));
    }
}
