//! The WAG002 automatic rewrite.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static SET_OUTPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"echo "::set-output name=([A-Za-z0-9_-]+)::(.*)""#)
        .expect("set-output pattern compiles")
});

static SAVE_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"echo "::save-state name=([A-Za-z0-9_-]+)::(.*)""#)
        .expect("save-state pattern compiles")
});

/// Rewrite deprecated `::set-output` and `::save-state` workflow commands
/// to the `$GITHUB_OUTPUT`/`$GITHUB_STATE` file form.
///
/// Only the common `echo "::set-output name=key::value"` shape is
/// rewritten; anything else is left for the author.
#[must_use]
pub fn rewrite_deprecated_commands(source: &str) -> Cow<'_, str> {
    match SET_OUTPUT.replace_all(source, r#"echo "$1=$2" >> "$$GITHUB_OUTPUT""#) {
        Cow::Borrowed(text) => {
            SAVE_STATE.replace_all(text, r#"echo "$1=$2" >> "$$GITHUB_STATE""#)
        }
        Cow::Owned(owned) => Cow::Owned(
            SAVE_STATE
                .replace_all(&owned, r#"echo "$1=$2" >> "$$GITHUB_STATE""#)
                .into_owned(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_output_rewrite() {
        let input = r#"echo "::set-output name=sha::$GITHUB_SHA""#;
        assert_eq!(
            rewrite_deprecated_commands(input),
            r#"echo "sha=$GITHUB_SHA" >> "$GITHUB_OUTPUT""#
        );
    }

    #[test]
    fn test_save_state_rewrite() {
        let input = r#"echo "::save-state name=dir::$PWD""#;
        assert_eq!(
            rewrite_deprecated_commands(input),
            r#"echo "dir=$PWD" >> "$GITHUB_STATE""#
        );
    }

    #[test]
    fn test_untouched_text_borrows() {
        let input = "echo hello";
        assert!(matches!(
            rewrite_deprecated_commands(input),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_multiline_script() {
        let input = "set -e\necho \"::set-output name=a::1\"\necho \"::set-output name=b::2\"\n";
        let fixed = rewrite_deprecated_commands(input);
        assert_eq!(
            fixed,
            "set -e\necho \"a=1\" >> \"$GITHUB_OUTPUT\"\necho \"b=2\" >> \"$GITHUB_OUTPUT\"\n"
        );
    }
}
