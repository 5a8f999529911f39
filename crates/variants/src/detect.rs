//! Classification of free-text variant tokens into attribute types.

use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeKind, AttributeRegistry};

/// Tokens found in a piece of text, partitioned by attribute type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub colors: Vec<String>,
    pub size_text: Vec<String>,
    pub size_number: Vec<String>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.size_text.is_empty() && self.size_number.is_empty()
    }

    pub fn tokens(&self, kind: AttributeKind) -> &[String] {
        match kind {
            AttributeKind::TextSize => &self.size_text,
            AttributeKind::Color => &self.colors,
            AttributeKind::NumberSize => &self.size_number,
        }
    }

    /// Record a token, ignoring duplicates within its kind.
    pub fn push(&mut self, kind: AttributeKind, token: impl Into<String>) {
        let token = token.into();
        let list = match kind {
            AttributeKind::TextSize => &mut self.size_text,
            AttributeKind::Color => &mut self.colors,
            AttributeKind::NumberSize => &mut self.size_number,
        };
        if !list.contains(&token) {
            list.push(token);
        }
    }

    pub fn merge(&mut self, other: Detection) {
        for kind in AttributeKind::ALL {
            for token in other.tokens(kind) {
                self.push(kind, token.clone());
            }
        }
    }

    /// Kinds with at least one token, in canonical order.
    pub fn kinds(&self) -> Vec<AttributeKind> {
        AttributeKind::ALL
            .into_iter()
            .filter(|k| !self.tokens(*k).is_empty())
            .collect()
    }

    /// The single kind a one-token detection belongs to.
    pub fn primary_kind(&self) -> Option<AttributeKind> {
        self.kinds().into_iter().next()
    }
}

/// Turns free text into candidate attribute tokens.
///
/// Implementations must be total: unrecognized text yields an empty
/// [`Detection`], never an error.
pub trait AttributeDetector: Send + Sync {
    fn detect(&self, text: &str) -> Detection;
}

const SEPARATORS: [char; 5] = [',', '/', ';', '+', '-'];

/// Detector backed by an attribute registry.
///
/// Text is split on common separators; each piece is classified as a text
/// size, then a numeric size, then a color. Pieces that match nothing are
/// retried word by word. Detected tokens carry the catalog's canonical name.
#[derive(Debug, Clone)]
pub struct CatalogDetector<R> {
    registry: R,
}

impl<R: AttributeRegistry> CatalogDetector<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn classify(&self, piece: &str, out: &mut Detection) -> bool {
        const ORDER: [AttributeKind; 3] = [
            AttributeKind::TextSize,
            AttributeKind::NumberSize,
            AttributeKind::Color,
        ];
        for kind in ORDER {
            if let Some(value) = self.registry.lookup(kind, piece) {
                out.push(kind, value.name);
                return true;
            }
        }
        false
    }
}

impl<R: AttributeRegistry> AttributeDetector for CatalogDetector<R> {
    fn detect(&self, text: &str) -> Detection {
        let mut detection = Detection::default();
        if self.classify(text, &mut detection) {
            return detection;
        }

        for piece in text.split(SEPARATORS).map(str::trim).filter(|p| !p.is_empty()) {
            if self.classify(piece, &mut detection) {
                continue;
            }
            for word in piece.split_whitespace() {
                self.classify(word, &mut detection);
            }
        }
        detection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::StaticAttributeCatalog;

    fn detector() -> CatalogDetector<StaticAttributeCatalog> {
        CatalogDetector::new(StaticAttributeCatalog::builtin())
    }

    #[test]
    fn single_tokens_land_in_one_kind() {
        let d = detector();
        assert_eq!(d.detect("Đỏ").colors, vec!["Đỏ"]);
        assert_eq!(d.detect("xl").size_text, vec!["XL"]);
        assert_eq!(d.detect("30").size_number, vec!["30"]);
        assert_eq!(d.detect("Đỏ").primary_kind(), Some(AttributeKind::Color));
    }

    #[test]
    fn multi_word_names_match_whole() {
        let detection = detector().detect("Xanh Dương");
        assert_eq!(detection.colors, vec!["Xanh Dương"]);
        assert!(detection.size_text.is_empty());
    }

    #[test]
    fn mixed_text_is_split() {
        let detection = detector().detect("S, Đỏ / 28 - M");
        assert_eq!(detection.size_text, vec!["S", "M"]);
        assert_eq!(detection.colors, vec!["Đỏ"]);
        assert_eq!(detection.size_number, vec!["28"]);
        assert_eq!(
            detection.kinds(),
            vec![AttributeKind::TextSize, AttributeKind::Color, AttributeKind::NumberSize]
        );
    }

    #[test]
    fn unknown_words_fall_back_word_by_word() {
        let detection = detector().detect("áo màu Đen size L");
        assert_eq!(detection.colors, vec!["Đen"]);
        assert_eq!(detection.size_text, vec!["L"]);
    }

    #[test]
    fn unrecognized_text_is_empty_not_error() {
        assert!(detector().detect("hàng mới về").is_empty());
        assert!(detector().detect("").is_empty());
    }

    #[test]
    fn merge_deduplicates() {
        let mut a = detector().detect("S");
        a.merge(detector().detect("S, Đen"));
        assert_eq!(a.size_text, vec!["S"]);
        assert_eq!(a.colors, vec!["Đen"]);
    }
}
