//! CODEOWNERS import and source generation.
//!
//! The grammar is line-oriented: a non-comment line is a pattern followed
//! by its owners. Full-line comments directly above a rule attach to it;
//! an inline `" #"` introduces a per-rule comment. Blank lines reset any
//! pending comment.

use crate::codegen::GeneratedFile;
use wag_model::{CodeOwners, OwnerRule};

/// Parse CODEOWNERS text into the IR.
///
/// Malformed lines (a pattern with no owners) are skipped; the format has
/// no error channel of its own.
#[must_use]
pub fn import_codeowners(source: &str) -> CodeOwners {
    let mut owners = CodeOwners::new();
    let mut pending: Vec<String> = Vec::new();
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            pending.clear();
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            pending.push(comment.trim().to_string());
            continue;
        }

        let (rule_text, inline) = match trimmed.split_once(" #") {
            Some((rule, comment)) => (rule.trim(), Some(comment.trim().to_string())),
            None => (trimmed, None),
        };
        let mut tokens = rule_text.split_whitespace();
        let Some(pattern) = tokens.next() else {
            continue;
        };
        let owner_list: Vec<&str> = tokens.collect();
        if owner_list.is_empty() {
            pending.clear();
            continue;
        }

        let mut rule = OwnerRule::new(pattern, owner_list);
        if !pending.is_empty() {
            rule = rule.comment(pending.join("\n"));
        } else if let Some(comment) = inline {
            rule = rule.comment(comment);
        }
        pending.clear();
        owners = owners.rule(rule);
    }
    owners
}

/// Generate typed source declaring the parsed rules as one symbol.
#[must_use]
pub fn generate_codeowners_source(owners: &CodeOwners) -> GeneratedFile {
    let mut contents = String::new();
    contents.push_str("#![allow(non_upper_case_globals)]\n\n");
    contents.push_str("use std::sync::LazyLock;\n\n");
    contents.push_str("use wag_model::{CodeOwners, OwnerRule};\n\n");
    contents.push_str("pub static Owners: LazyLock<CodeOwners> = LazyLock::new(|| {\n");
    contents.push_str("    CodeOwners::new()\n");
    for rule in &owners.rules {
        let owner_list: Vec<String> = rule.owners.iter().map(|o| format!("{o:?}")).collect();
        match &rule.comment {
            Some(comment) => {
                contents.push_str(&format!(
                    "        .rule(OwnerRule::new({:?}, [{}]).comment({:?}))\n",
                    rule.pattern,
                    owner_list.join(", "),
                    comment
                ));
            }
            None => {
                contents.push_str(&format!(
                    "        .own({:?}, [{}])\n",
                    rule.pattern,
                    owner_list.join(", ")
                ));
            }
        }
    }
    contents.push_str("});\n");
    GeneratedFile {
        name: "owners.rs".to_string(),
        contents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules_and_comments() {
        let source = "\
# Default owners
* @org/maintainers

# Rust sources
# are owned by the backend team
*.rs @rust-team @backend

/docs @writer # inline note
";
        let owners = import_codeowners(source);
        assert_eq!(owners.rules.len(), 3);
        assert_eq!(owners.rules[0].pattern, "*");
        assert_eq!(owners.rules[0].comment.as_deref(), Some("Default owners"));
        assert_eq!(owners.rules[1].owners, vec!["@rust-team", "@backend"]);
        assert_eq!(
            owners.rules[1].comment.as_deref(),
            Some("Rust sources\nare owned by the backend team")
        );
        assert_eq!(owners.rules[2].comment.as_deref(), Some("inline note"));
    }

    #[test]
    fn test_blank_line_detaches_comment() {
        let source = "# stale comment\n\n* @owner\n";
        let owners = import_codeowners(source);
        assert_eq!(owners.rules[0].comment, None);
    }

    #[test]
    fn test_owner_less_line_skipped() {
        let owners = import_codeowners("*.md\n* @owner\n");
        assert_eq!(owners.rules.len(), 1);
        assert_eq!(owners.rules[0].pattern, "*");
    }

    #[test]
    fn test_parse_generate_parse_is_stable() {
        let source = "# Default owners\n* @org/maintainers\n*.rs @rust-team\n";
        let owners = import_codeowners(source);
        let regenerated = owners.generate();
        assert_eq!(import_codeowners(&regenerated), owners);
    }

    #[test]
    fn test_generated_source_shape() {
        let owners = import_codeowners("* @org/maintainers\n# Rust\n*.rs @rust-team\n");
        let file = generate_codeowners_source(&owners);
        assert_eq!(file.name, "owners.rs");
        assert!(file.contents.contains(".own(\"*\", [\"@org/maintainers\"])"));
        assert!(file
            .contents
            .contains(".rule(OwnerRule::new(\"*.rs\", [\"@rust-team\"]).comment(\"Rust\"))"));
    }
}
