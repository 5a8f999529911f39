//! Display names for generated variants.

use crate::attribute::AttributeValue;

/// `"{base} ({v1}, {v2}, ...)"` in tuple order; the bare base name when the
/// tuple is empty.
pub fn compose_name(base_name: &str, tuple: &[AttributeValue]) -> String {
    if tuple.is_empty() {
        return base_name.to_string();
    }
    let values: Vec<&str> = tuple.iter().map(|v| v.name.as_str()).collect();
    format!("{} ({})", base_name, values.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeKind;

    #[test]
    fn joins_values_in_tuple_order() {
        let tuple = vec![
            AttributeValue::new(AttributeKind::Color, 1, "Đỏ", "do"),
            AttributeValue::new(AttributeKind::NumberSize, 2, "30", "30"),
        ];
        assert_eq!(compose_name("Quần jean", &tuple), "Quần jean (Đỏ, 30)");
    }

    #[test]
    fn empty_tuple_keeps_base_name() {
        assert_eq!(compose_name("Shirt", &[]), "Shirt");
    }
}
