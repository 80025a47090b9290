//! Package scaffolding for imported and freshly initialized projects.

use crate::codegen::{GeneratedFile, SourceLayout};
use wag_model::names::filename;

/// The support files for a typed-workflow package: a manifest, a README,
/// a `.gitignore`, and a `src/lib.rs` re-exporting the generated modules.
///
/// Generated source files themselves land under `src/`; callers prefix
/// their names accordingly.
#[must_use]
pub fn scaffold(name: &str, layout: SourceLayout) -> Vec<GeneratedFile> {
    let package = filename(name);
    let manifest = format!(
        "[package]\nname = \"{package}\"\nversion = \"0.1.0\"\nedition = \"2021\"\npublish = false\n\n[dependencies]\nindexmap = \"2\"\nwag-model = \"0.3\"\n"
    );
    let readme = format!(
        "# {name}\n\nTyped GitHub Actions workflow declarations.\n\nEdit the declarations under `src/` and regenerate the YAML with:\n\n```console\n$ wag build . -o .github/workflows\n```\n"
    );
    let lib = match layout {
        SourceLayout::SingleFile => {
            "pub mod workflows;\n\npub use workflows::*;\n".to_string()
        }
        SourceLayout::Split => {
            "pub mod jobs;\npub mod steps;\npub mod triggers;\npub mod workflows;\n\npub use workflows::*;\n"
                .to_string()
        }
    };

    vec![
        GeneratedFile {
            name: "Cargo.toml".to_string(),
            contents: manifest,
        },
        GeneratedFile {
            name: "README.md".to_string(),
            contents: readme,
        },
        GeneratedFile {
            name: ".gitignore".to_string(),
            contents: "/target\n".to_string(),
        },
        GeneratedFile {
            name: "src/lib.rs".to_string(),
            contents: lib,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_files() {
        let files = scaffold("C/C++ CI", SourceLayout::SingleFile);
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Cargo.toml", "README.md", ".gitignore", "src/lib.rs"]);
        assert!(files[0].contents.contains("name = \"c-c-ci\""));
        assert!(files[3].contents.contains("pub mod workflows;"));
    }

    #[test]
    fn test_split_lib_lists_all_modules() {
        let files = scaffold("ci", SourceLayout::Split);
        let lib = &files[3].contents;
        for module in ["jobs", "steps", "triggers", "workflows"] {
            assert!(lib.contains(&format!("pub mod {module};")));
        }
    }
}
