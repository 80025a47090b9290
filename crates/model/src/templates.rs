//! Issue form and pull request template entities.

/// One element of an issue form body.
///
/// Mirrors the GitHub issue forms schema; each variant carries only the
/// attributes that element type supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormElement {
    /// Static markdown rendered in the form.
    Markdown {
        /// The markdown text.
        value: String,
    },
    /// A single-line text input.
    Input {
        /// Element id, unique within the form.
        id: Option<String>,
        /// Field label.
        label: String,
        /// Help text below the label.
        description: Option<String>,
        /// Placeholder shown when empty.
        placeholder: Option<String>,
        /// Whether the field must be filled.
        required: bool,
    },
    /// A multi-line text area.
    Textarea {
        /// Element id, unique within the form.
        id: Option<String>,
        /// Field label.
        label: String,
        /// Help text below the label.
        description: Option<String>,
        /// Placeholder shown when empty.
        placeholder: Option<String>,
        /// Language for syntax highlighting of the submitted text.
        render: Option<String>,
        /// Whether the field must be filled.
        required: bool,
    },
    /// A single- or multi-select dropdown.
    Dropdown {
        /// Element id, unique within the form.
        id: Option<String>,
        /// Field label.
        label: String,
        /// Help text below the label.
        description: Option<String>,
        /// Selectable options, in order.
        options: Vec<String>,
        /// Allow selecting more than one option.
        multiple: bool,
        /// Whether a selection is required.
        required: bool,
    },
    /// A checkbox group.
    Checkboxes {
        /// Element id, unique within the form.
        id: Option<String>,
        /// Field label.
        label: String,
        /// Help text below the label.
        description: Option<String>,
        /// Checkbox labels paired with whether each one must be checked.
        options: Vec<(String, bool)>,
    },
}

impl FormElement {
    /// Create a markdown element.
    pub fn markdown(value: impl Into<String>) -> Self {
        Self::Markdown {
            value: value.into(),
        }
    }

    /// Create a required single-line input.
    pub fn input(label: impl Into<String>) -> Self {
        Self::Input {
            id: None,
            label: label.into(),
            description: None,
            placeholder: None,
            required: true,
        }
    }

    /// Create a required text area.
    pub fn textarea(label: impl Into<String>) -> Self {
        Self::Textarea {
            id: None,
            label: label.into(),
            description: None,
            placeholder: None,
            render: None,
            required: true,
        }
    }

    /// The `type:` discriminator used in the emitted YAML.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Markdown { .. } => "markdown",
            Self::Input { .. } => "input",
            Self::Textarea { .. } => "textarea",
            Self::Dropdown { .. } => "dropdown",
            Self::Checkboxes { .. } => "checkboxes",
        }
    }
}

/// An issue form template, emitted under `.github/ISSUE_TEMPLATE/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueTemplate {
    /// Template name shown in the chooser.
    pub name: String,
    /// Template description shown in the chooser.
    pub description: String,
    /// Default issue title.
    pub title: Option<String>,
    /// Labels applied to created issues.
    pub labels: Vec<String>,
    /// Users assigned to created issues.
    pub assignees: Vec<String>,
    /// Form body elements, in order.
    pub body: Vec<FormElement>,
}

impl IssueTemplate {
    /// Create a template with a chooser name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Append a body element.
    #[must_use]
    pub fn element(mut self, element: FormElement) -> Self {
        self.body.push(element);
        self
    }

    /// Add a label applied to created issues.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// A pull request template: raw markdown written verbatim to
/// `.github/pull_request_template.md`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestTemplate {
    /// The markdown content.
    pub content: String,
}

impl PullRequestTemplate {
    /// Create a template from its markdown content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kinds() {
        assert_eq!(FormElement::markdown("hi").kind(), "markdown");
        assert_eq!(FormElement::input("Version").kind(), "input");
        assert_eq!(FormElement::textarea("Steps").kind(), "textarea");
    }

    #[test]
    fn test_template_builder() {
        let template = IssueTemplate::new("Bug report", "File a bug")
            .label("bug")
            .element(FormElement::textarea("What happened?"));
        assert_eq!(template.labels, vec!["bug"]);
        assert_eq!(template.body.len(), 1);
    }
}
