//! Identifier and string escaping.

use super::errors::SurqlGeneratorError;

/// ASCII letters, digits and `_`, not starting with a digit.
fn is_plain_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Table, field and alias names. Anything but a plain identifier is wrapped in backticks.
pub fn escape_ident(name: &str) -> Result<String, SurqlGeneratorError> {
    if name.is_empty() {
        return Err(SurqlGeneratorError::EmptyIdentifier);
    }
    if is_plain_ident(name) {
        Ok(name.to_string())
    } else {
        Ok(format!(
            "`{}`",
            name.replace('\\', "\\\\").replace('`', "\\`")
        ))
    }
}

/// Object literal keys are double-quoted unless they are plain identifiers.
pub fn escape_key(key: &str) -> String {
    if is_plain_ident(key) {
        key.to_string()
    } else {
        quote_str(key)
    }
}

/// Record-id keys use `⟨…⟩` when they are not plain identifiers.
pub fn escape_record_key(key: &str) -> String {
    if is_plain_ident(key) {
        key.to_string()
    } else {
        format!("⟨{}⟩", key.replace('⟩', "\\⟩"))
    }
}

pub fn quote_str(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn quote_char(value: char) -> String {
    match value {
        '"' => "'\"'".to_string(),
        '\\' => "\"\\\\\"".to_string(),
        c => format!("\"{}\"", c),
    }
}
