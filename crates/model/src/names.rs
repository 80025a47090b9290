//! Identifier, filename, and YAML key-name normalization.
//!
//! Both the emitter and the importer go through this module, so the
//! source-side identifier set and the YAML key set stay in one-to-one
//! correspondence.

/// Rust keywords that generated symbols must not collide with.
///
/// A normalized identifier whose lowercase form appears here gets a `Job`
/// suffix, e.g. a job id of `type` becomes the symbol `TypeJob`.
const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "union", "unsafe", "use", "where", "while",
];

/// Multi-word model attributes and their GitHub-conventional kebab-case keys.
///
/// Event names and the snake_case keys GitHub itself uses are deliberately
/// absent: they map to themselves. The table is checked for bijectivity in
/// tests.
const KEBAB_KEYS: &[(&str, &str)] = &[
    ("runs_on", "runs-on"),
    ("timeout_minutes", "timeout-minutes"),
    ("continue_on_error", "continue-on-error"),
    ("working_directory", "working-directory"),
    ("branches_ignore", "branches-ignore"),
    ("paths_ignore", "paths-ignore"),
    ("tags_ignore", "tags-ignore"),
    ("id_token", "id-token"),
    ("pull_requests", "pull-requests"),
    ("repository_projects", "repository-projects"),
    ("security_events", "security-events"),
    ("fail_fast", "fail-fast"),
    ("max_parallel", "max-parallel"),
    ("cancel_in_progress", "cancel-in-progress"),
];

/// Keys that keep their snake_case spelling in YAML (event names and a few
/// GitHub-defined keys).
const SNAKE_KEYS: &[&str] = &[
    "pull_request",
    "pull_request_target",
    "workflow_dispatch",
    "workflow_call",
    "workflow_run",
    "repository_dispatch",
    "issue_comment",
    "page_build",
    "project_card",
    "project_column",
    "pull_request_review",
    "pull_request_review_comment",
    "check_run",
    "check_suite",
    "discussion_comment",
    "merge_group",
];

/// Map a model attribute identifier to its YAML key.
///
/// Multi-word attributes become kebab-case; event names and single-word
/// attributes pass through unchanged.
#[must_use]
pub fn yaml_key(field: &str) -> &str {
    for (ident, key) in KEBAB_KEYS {
        if *ident == field {
            return key;
        }
    }
    field
}

/// Map a YAML key back to its model attribute identifier.
#[must_use]
pub fn field_for_key(key: &str) -> String {
    for (ident, kebab) in KEBAB_KEYS {
        if *kebab == key {
            return (*ident).to_string();
        }
    }
    key.to_string()
}

/// Normalize an arbitrary string (workflow name, job id, event payload name)
/// into a valid PascalCase Rust identifier.
///
/// The transform, in order: punctuation from `(),!?'":;/.@` becomes `_`;
/// `++` maps to `pp`, `+` to `Plus`, `#` to `Sharp`, `&` to `And`; any
/// remaining non-alphanumeric character becomes `_`; the result is split on
/// `-`, `_` and space and each segment is capitalized; a leading non-letter
/// gains an `X` prefix; a reserved-word collision gains a `Job` suffix.
///
/// The output is a valid identifier for any non-empty printable input.
#[must_use]
pub fn identifier(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '(' | ')' | ',' | '!' | '?' | '\'' | '"' | ':' | ';' | '/' | '.' | '@' => {
                cleaned.push('_');
            }
            '+' => {
                if chars.peek() == Some(&'+') {
                    chars.next();
                    cleaned.push_str("pp");
                } else {
                    cleaned.push_str("Plus");
                }
            }
            '#' => cleaned.push_str("Sharp"),
            '&' => cleaned.push_str("And"),
            c if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' => cleaned.push(c),
            _ => cleaned.push('_'),
        }
    }

    let mut out = String::with_capacity(cleaned.len());
    for segment in cleaned.split(['-', '_', ' ']) {
        let mut seg_chars = segment.chars();
        if let Some(first) = seg_chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(seg_chars.as_str());
        }
    }

    if !out.chars().next().is_some_and(char::is_alphabetic) {
        out.insert(0, 'X');
    }
    if RESERVED.contains(&out.to_lowercase().as_str()) {
        out.push_str("Job");
    }
    out
}

/// Normalize a workflow name into an output filename stem.
///
/// A `-` is inserted at each lowercase/digit→uppercase boundary, the result
/// is lowercased, runs of non-alphanumerics collapse to a single `-`, and
/// leading/trailing `-` are trimmed. The transform is idempotent.
#[must_use]
pub fn filename(input: &str) -> String {
    let mut dashed = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;
    for ch in input.chars() {
        if ch.is_uppercase()
            && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
        {
            dashed.push('-');
        }
        dashed.push(ch);
        prev = Some(ch);
    }

    let lowered = dashed.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for ch in lowered.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_identifier_basic() {
        assert_eq!(identifier("build"), "Build");
        assert_eq!(identifier("deploy-prod"), "DeployProd");
        assert_eq!(identifier("unit tests"), "UnitTests");
    }

    #[test]
    fn test_identifier_c_cpp_ci() {
        assert_eq!(identifier("C/C++ CI"), "CCppCI");
    }

    #[test]
    fn test_identifier_special_chars() {
        assert_eq!(identifier("C# build"), "CSharpBuild");
        assert_eq!(identifier("lint & test"), "LintAndTest");
        assert_eq!(identifier("a+b"), "APlusb");
    }

    #[test]
    fn test_identifier_reserved_word() {
        assert_eq!(identifier("type"), "TypeJob");
        assert_eq!(identifier("match"), "MatchJob");
    }

    #[test]
    fn test_identifier_leading_digit() {
        assert_eq!(identifier("3d-render"), "X3dRender");
    }

    #[test]
    fn test_filename_basic() {
        assert_eq!(filename("CI"), "ci");
        assert_eq!(filename("C/C++ CI"), "c-c-ci");
        assert_eq!(filename("DeployProd"), "deploy-prod");
        assert_eq!(filename("  release  "), "release");
    }

    #[test]
    fn test_yaml_key_mapping() {
        assert_eq!(yaml_key("runs_on"), "runs-on");
        assert_eq!(yaml_key("pull_request"), "pull_request");
        assert_eq!(yaml_key("push"), "push");
        assert_eq!(field_for_key("timeout-minutes"), "timeout_minutes");
    }

    #[test]
    fn test_key_table_is_bijective() {
        let idents: HashSet<_> = KEBAB_KEYS.iter().map(|(i, _)| *i).collect();
        let keys: HashSet<_> = KEBAB_KEYS.iter().map(|(_, k)| *k).collect();
        assert_eq!(idents.len(), KEBAB_KEYS.len());
        assert_eq!(keys.len(), KEBAB_KEYS.len());
        // Snake-retained keys must not collide with a kebab mapping.
        for key in SNAKE_KEYS {
            assert!(!keys.contains(key), "{key} appears in both tables");
            assert_eq!(field_for_key(key), *key);
        }
    }

    proptest! {
        #[test]
        fn prop_filename_is_idempotent(input in "\\PC{0,40}") {
            let once = filename(&input);
            prop_assert_eq!(filename(&once), once);
        }

        #[test]
        fn prop_identifier_is_valid(input in "\\PC{1,40}") {
            let ident = identifier(&input);
            prop_assert!(!ident.is_empty());
            let mut chars = ident.chars();
            let first = chars.next().unwrap();
            prop_assert!(first.is_alphabetic());
            prop_assert!(ident.chars().all(|c| c.is_alphanumeric() || c == '_'));
            prop_assert!(!RESERVED.contains(&ident.to_lowercase().as_str()));
        }
    }
}
