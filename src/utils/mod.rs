pub mod error;

/// Treats absent, empty and whitespace-only strings alike.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
