//! Deterministic scalar quoting.

use wag_model::Scalar;

/// Words YAML loaders interpret as booleans or null when unquoted.
const AMBIGUOUS_WORDS: &[&str] = &[
    "true", "false", "null", "~", "yes", "no", "on", "off", "True", "False", "Null", "Yes",
    "No", "On", "Off", "TRUE", "FALSE", "NULL", "YES", "NO", "ON", "OFF",
];

/// Render a string value, quoting only when the plain form would change
/// meaning. Single quotes are preferred; double quotes appear only when
/// control characters force escaping.
pub fn quote(value: &str) -> String {
    if plain_ok(value) {
        return value.to_string();
    }
    if value.chars().any(|c| c.is_control()) {
        return double_quoted(value);
    }
    format!("'{}'", value.replace('\'', "''"))
}

/// Render a scalar value. Numbers and booleans stay bare; strings go
/// through [`quote`].
pub fn render(value: &Scalar) -> String {
    match value {
        Scalar::String(text) => quote(text),
        Scalar::Int(v) => v.to_string(),
        Scalar::Float(v) => v.to_string(),
        Scalar::Bool(v) => v.to_string(),
    }
}

fn plain_ok(value: &str) -> bool {
    if value.is_empty()
        || AMBIGUOUS_WORDS.contains(&value)
        || value.parse::<f64>().is_ok()
    {
        return false;
    }
    let Some(first) = value.chars().next() else {
        return false;
    };
    if "!&*?|>%@`\"'#,[]{}".contains(first) {
        return false;
    }
    if (first == '-' || first == ':')
        && (value.len() == 1 || value.as_bytes()[1] == b' ')
    {
        return false;
    }
    if value.starts_with(' ') || value.ends_with(' ') || value.starts_with('\t') {
        return false;
    }
    if value.contains(": ") || value.ends_with(':') || value.contains(" #") {
        return false;
    }
    !value.chars().any(char::is_control)
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other if other.is_control() => {
                out.push_str(&format!("\\u{:04x}", other as u32));
            }
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_strings_stay_bare() {
        assert_eq!(quote("ubuntu-latest"), "ubuntu-latest");
        assert_eq!(quote("echo hello"), "echo hello");
        assert_eq!(quote("${{ github.sha }}"), "${{ github.sha }}");
        assert_eq!(quote("refs/heads/main"), "refs/heads/main");
    }

    #[test]
    fn test_ambiguous_values_quoted() {
        assert_eq!(quote("1.22"), "'1.22'");
        assert_eq!(quote("true"), "'true'");
        assert_eq!(quote("on"), "'on'");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("-v"), "-v");
        assert_eq!(quote("- main"), "'- main'");
        assert_eq!(quote("*.rs"), "'*.rs'");
        assert_eq!(quote("key: value"), "'key: value'");
    }

    #[test]
    fn test_single_quote_escaping() {
        assert_eq!(quote("it's on"), "it's on");
        assert_eq!(quote("'quoted'"), "'''quoted'''");
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(render(&Scalar::Int(2)), "2");
        assert_eq!(render(&Scalar::Bool(false)), "false");
        assert_eq!(render(&Scalar::String("1.22".into())), "'1.22'");
    }
}
