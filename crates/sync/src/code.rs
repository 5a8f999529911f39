//! Code normalization for cross-system matching.

/// Strip `[`/`]`, trim and upper-case, so `"[n497d28] "` and `"N497D28"`
/// compare equal.
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| *c != '[' && *c != ']')
        .collect::<String>()
        .trim()
        .to_uppercase()
}
