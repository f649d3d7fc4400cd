//! Helpers for building backend filter expressions.

/// Renders `field = "value"`, escaping the value so arbitrary text stays
/// inside the string literal.
pub fn filter_eq(field: &str, value: &str) -> String {
    format!("{field} = \"{}\"", escape_literal(value))
}

fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '"' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
