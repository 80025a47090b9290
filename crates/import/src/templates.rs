//! Issue form and pull request template import.
//!
//! Issue forms are YAML with a `body` of tagged elements; the `type:` key
//! discriminates the variant. Pull request templates are raw markdown and
//! only get wrapped.

use crate::codegen::GeneratedFile;
use serde_yaml::Value;
use wag_model::names::identifier;
use wag_model::{Diagnostic, DiagnosticKind, FormElement, IssueTemplate, PullRequestTemplate};

/// Decode an issue form template.
pub fn import_issue_template(source: &str) -> Result<IssueTemplate, Diagnostic> {
    let value: Value = serde_yaml::from_str(source).map_err(|err| {
        Diagnostic::error(DiagnosticKind::ImportError, format!("invalid YAML: {err}"))
    })?;
    let Value::Mapping(root) = value else {
        return Err(Diagnostic::error(
            DiagnosticKind::ImportError,
            "issue template document is not a mapping",
        ));
    };

    let mut template = IssueTemplate {
        name: text(root.get("name")),
        description: text(root.get("description")),
        title: root.get("title").and_then(Value::as_str).map(String::from),
        labels: string_list(root.get("labels")),
        assignees: string_list(root.get("assignees")),
        body: Vec::new(),
    };

    if let Some(Value::Sequence(body)) = root.get("body") {
        for (index, entry) in body.iter().enumerate() {
            template.body.push(form_element(entry, index)?);
        }
    }
    Ok(template)
}

fn form_element(entry: &Value, index: usize) -> Result<FormElement, Diagnostic> {
    let kind = entry.get("type").and_then(Value::as_str).ok_or_else(|| {
        Diagnostic::error(
            DiagnosticKind::ImportError,
            format!("body element {index} has no type"),
        )
    })?;
    let id = entry.get("id").and_then(Value::as_str).map(String::from);
    let attributes = entry.get("attributes");
    let attr = |key: &str| attributes.and_then(|a| a.get(key));
    let required = entry
        .get("validations")
        .and_then(|v| v.get("required"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let element = match kind {
        "markdown" => FormElement::Markdown {
            value: text(attr("value")),
        },
        "input" => FormElement::Input {
            id,
            label: text(attr("label")),
            description: attr("description").and_then(Value::as_str).map(String::from),
            placeholder: attr("placeholder").and_then(Value::as_str).map(String::from),
            required,
        },
        "textarea" => FormElement::Textarea {
            id,
            label: text(attr("label")),
            description: attr("description").and_then(Value::as_str).map(String::from),
            placeholder: attr("placeholder").and_then(Value::as_str).map(String::from),
            render: attr("render").and_then(Value::as_str).map(String::from),
            required,
        },
        "dropdown" => FormElement::Dropdown {
            id,
            label: text(attr("label")),
            description: attr("description").and_then(Value::as_str).map(String::from),
            options: string_list(attr("options")),
            multiple: attr("multiple").and_then(Value::as_bool).unwrap_or(false),
            required,
        },
        "checkboxes" => {
            let mut options = Vec::new();
            if let Some(Value::Sequence(entries)) = attr("options") {
                for option in entries {
                    let label = text(option.get("label"));
                    let checked = option
                        .get("required")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    options.push((label, checked));
                }
            }
            FormElement::Checkboxes {
                id,
                label: text(attr("label")),
                description: attr("description").and_then(Value::as_str).map(String::from),
                options,
            }
        }
        other => {
            return Err(Diagnostic::error(
                DiagnosticKind::ImportError,
                format!("unknown form element type '{other}' at body element {index}"),
            ));
        }
    };
    Ok(element)
}

fn text(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Generate typed source declaring the template as one symbol.
#[must_use]
pub fn generate_issue_template_source(template: &IssueTemplate) -> GeneratedFile {
    let symbol = identifier(&template.name);
    let mut contents = String::new();
    contents.push_str("#![allow(non_upper_case_globals)]\n\n");
    contents.push_str("use std::sync::LazyLock;\n\n");
    contents.push_str("use wag_model::{FormElement, IssueTemplate};\n\n");
    contents.push_str(&format!(
        "pub static {symbol}: LazyLock<IssueTemplate> = LazyLock::new(|| IssueTemplate {{\n"
    ));
    contents.push_str(&format!("    name: {:?}.to_string(),\n", template.name));
    contents.push_str(&format!(
        "    description: {:?}.to_string(),\n",
        template.description
    ));
    if let Some(title) = &template.title {
        contents.push_str(&format!("    title: Some({title:?}.to_string()),\n"));
    }
    if !template.labels.is_empty() {
        contents.push_str(&format!("    labels: {},\n", vec_literal(&template.labels)));
    }
    if !template.assignees.is_empty() {
        contents.push_str(&format!(
            "    assignees: {},\n",
            vec_literal(&template.assignees)
        ));
    }
    contents.push_str("    body: vec![\n");
    for element in &template.body {
        element_literal(&mut contents, element);
    }
    contents.push_str("    ],\n");
    contents.push_str("    ..IssueTemplate::default()\n");
    contents.push_str("});\n");
    GeneratedFile {
        name: format!("{}.rs", wag_model::names::filename(&template.name)).replace('-', "_"),
        contents,
    }
}

fn element_literal(contents: &mut String, element: &FormElement) {
    match element {
        FormElement::Markdown { value } => {
            contents.push_str(&format!(
                "        FormElement::Markdown {{ value: {}.to_string() }},\n",
                raw_or_escaped(value)
            ));
        }
        FormElement::Input {
            id,
            label,
            description,
            placeholder,
            required,
        } => {
            contents.push_str("        FormElement::Input {\n");
            contents.push_str(&format!("            id: {},\n", opt_string(id.as_deref())));
            contents.push_str(&format!("            label: {label:?}.to_string(),\n"));
            contents.push_str(&format!(
                "            description: {},\n",
                opt_string(description.as_deref())
            ));
            contents.push_str(&format!(
                "            placeholder: {},\n",
                opt_string(placeholder.as_deref())
            ));
            contents.push_str(&format!("            required: {required},\n"));
            contents.push_str("        },\n");
        }
        FormElement::Textarea {
            id,
            label,
            description,
            placeholder,
            render,
            required,
        } => {
            contents.push_str("        FormElement::Textarea {\n");
            contents.push_str(&format!("            id: {},\n", opt_string(id.as_deref())));
            contents.push_str(&format!("            label: {label:?}.to_string(),\n"));
            contents.push_str(&format!(
                "            description: {},\n",
                opt_string(description.as_deref())
            ));
            contents.push_str(&format!(
                "            placeholder: {},\n",
                opt_string(placeholder.as_deref())
            ));
            contents.push_str(&format!(
                "            render: {},\n",
                opt_string(render.as_deref())
            ));
            contents.push_str(&format!("            required: {required},\n"));
            contents.push_str("        },\n");
        }
        FormElement::Dropdown {
            id,
            label,
            description,
            options,
            multiple,
            required,
        } => {
            contents.push_str("        FormElement::Dropdown {\n");
            contents.push_str(&format!("            id: {},\n", opt_string(id.as_deref())));
            contents.push_str(&format!("            label: {label:?}.to_string(),\n"));
            contents.push_str(&format!(
                "            description: {},\n",
                opt_string(description.as_deref())
            ));
            contents.push_str(&format!("            options: {},\n", vec_literal(options)));
            contents.push_str(&format!("            multiple: {multiple},\n"));
            contents.push_str(&format!("            required: {required},\n"));
            contents.push_str("        },\n");
        }
        FormElement::Checkboxes {
            id,
            label,
            description,
            options,
        } => {
            contents.push_str("        FormElement::Checkboxes {\n");
            contents.push_str(&format!("            id: {},\n", opt_string(id.as_deref())));
            contents.push_str(&format!("            label: {label:?}.to_string(),\n"));
            contents.push_str(&format!(
                "            description: {},\n",
                opt_string(description.as_deref())
            ));
            let rendered: Vec<String> = options
                .iter()
                .map(|(label, checked)| format!("({label:?}.to_string(), {checked})"))
                .collect();
            contents.push_str(&format!(
                "            options: vec![{}],\n",
                rendered.join(", ")
            ));
            contents.push_str("        },\n");
        }
    }
}

fn raw_or_escaped(text: &str) -> String {
    if text.contains('\n') && !text.contains("\"#") {
        format!("r#\"{text}\"#")
    } else {
        format!("{text:?}")
    }
}

fn opt_string(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("Some({text:?}.to_string())"),
        None => "None".to_string(),
    }
}

fn vec_literal(items: &[String]) -> String {
    let rendered: Vec<String> = items
        .iter()
        .map(|item| format!("{item:?}.to_string()"))
        .collect();
    format!("vec![{}]", rendered.join(", "))
}

/// Wrap pull request template markdown in its typed carrier.
#[must_use]
pub fn import_pull_request_template(content: &str) -> PullRequestTemplate {
    PullRequestTemplate::new(content)
}

/// Generate typed source declaring a pull request template.
#[must_use]
pub fn generate_pull_request_template_source(template: &PullRequestTemplate) -> GeneratedFile {
    let mut contents = String::new();
    contents.push_str("#![allow(non_upper_case_globals)]\n\n");
    contents.push_str("use std::sync::LazyLock;\n\n");
    contents.push_str("use wag_model::PullRequestTemplate;\n\n");
    contents.push_str(&format!(
        "pub static PullRequest: LazyLock<PullRequestTemplate> =\n    LazyLock::new(|| PullRequestTemplate::new({}));\n",
        raw_or_escaped(&template.content)
    ));
    GeneratedFile {
        name: "pull_request.rs".to_string(),
        contents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = "\
name: Bug report
description: File a bug
title: '[bug]: '
labels:
  - bug
body:
  - type: markdown
    attributes:
      value: Thanks for reporting!
  - type: input
    id: version
    attributes:
      label: Version
      placeholder: 1.0.0
    validations:
      required: true
  - type: dropdown
    attributes:
      label: Severity
      options:
        - low
        - high
  - type: checkboxes
    attributes:
      label: Checks
      options:
        - label: I searched existing issues
          required: true
";

    #[test]
    fn test_decode_form_elements() {
        let template = import_issue_template(FORM).unwrap();
        assert_eq!(template.name, "Bug report");
        assert_eq!(template.title.as_deref(), Some("[bug]: "));
        assert_eq!(template.labels, vec!["bug"]);
        assert_eq!(template.body.len(), 4);
        assert_eq!(template.body[0].kind(), "markdown");
        match &template.body[1] {
            FormElement::Input { id, required, .. } => {
                assert_eq!(id.as_deref(), Some("version"));
                assert!(required);
            }
            other => panic!("expected an input, found {}", other.kind()),
        }
        match &template.body[3] {
            FormElement::Checkboxes { options, .. } => {
                assert_eq!(options[0], ("I searched existing issues".to_string(), true));
            }
            other => panic!("expected checkboxes, found {}", other.kind()),
        }
    }

    #[test]
    fn test_unknown_element_type_is_an_error() {
        let err = import_issue_template("name: x\nbody:\n  - type: slider\n").unwrap_err();
        assert!(err.message.contains("slider"));
    }

    #[test]
    fn test_generated_source_shape() {
        let template = import_issue_template(FORM).unwrap();
        let file = generate_issue_template_source(&template);
        assert_eq!(file.name, "bug_report.rs");
        assert!(file
            .contents
            .contains("pub static BugReport: LazyLock<IssueTemplate>"));
        assert!(file.contents.contains("label: \"Version\".to_string(),"));
        assert!(file.contents.contains("required: true,"));
    }

    #[test]
    fn test_pull_request_template_wrapping() {
        let template = import_pull_request_template("## Summary\n");
        let file = generate_pull_request_template_source(&template);
        assert!(file.contents.contains("PullRequestTemplate::new(r#\"## Summary\n\"#)"));
    }
}
