//! Dependabot configuration import and source generation.

use crate::codegen::GeneratedFile;
use serde_yaml::Value;
use wag_model::{
    Dependabot, DependabotSchedule, DependabotUpdate, Diagnostic, DiagnosticKind,
};

/// Decode `dependabot.yml` into the IR.
pub fn import_dependabot(source: &str) -> Result<Dependabot, Diagnostic> {
    let value: Value = serde_yaml::from_str(source).map_err(|err| {
        Diagnostic::error(DiagnosticKind::ImportError, format!("invalid YAML: {err}"))
    })?;
    let Value::Mapping(root) = value else {
        return Err(Diagnostic::error(
            DiagnosticKind::ImportError,
            "dependabot document is not a mapping",
        ));
    };

    let mut config = Dependabot::new();
    if let Some(version) = root.get("version").and_then(Value::as_u64) {
        config.version = u32::try_from(version).unwrap_or(2);
    }
    let Some(Value::Sequence(updates)) = root.get("updates") else {
        return Err(Diagnostic::error(
            DiagnosticKind::ImportError,
            "dependabot updates must be a list",
        ));
    };
    for entry in updates {
        let ecosystem = entry
            .get("package-ecosystem")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Diagnostic::error(
                    DiagnosticKind::ImportError,
                    "update entry is missing package-ecosystem",
                )
            })?;
        let directory = entry.get("directory").and_then(Value::as_str).unwrap_or("/");
        let mut update = DependabotUpdate::new(ecosystem, directory);

        if let Some(schedule) = entry.get("schedule") {
            let interval = schedule
                .get("interval")
                .and_then(Value::as_str)
                .unwrap_or("weekly");
            let mut decoded = DependabotSchedule::interval(interval);
            decoded.day = schedule.get("day").and_then(Value::as_str).map(String::from);
            decoded.time = schedule.get("time").and_then(Value::as_str).map(String::from);
            decoded.timezone = schedule
                .get("timezone")
                .and_then(Value::as_str)
                .map(String::from);
            update = update.schedule(decoded);
        }
        update.labels = string_list(entry.get("labels"));
        update.reviewers = string_list(entry.get("reviewers"));
        update.open_pull_requests_limit = entry
            .get("open-pull-requests-limit")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok());
        update.commit_message_prefix = entry
            .get("commit-message")
            .and_then(|m| m.get("prefix"))
            .and_then(Value::as_str)
            .map(String::from);
        config = config.update(update);
    }
    Ok(config)
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

/// Generate typed source declaring the configuration as one symbol.
#[must_use]
pub fn generate_dependabot_source(config: &Dependabot) -> GeneratedFile {
    let mut contents = String::new();
    contents.push_str("#![allow(non_upper_case_globals)]\n\n");
    contents.push_str("use std::sync::LazyLock;\n\n");
    contents.push_str(
        "use wag_model::{Dependabot, DependabotSchedule, DependabotUpdate};\n\n",
    );
    contents.push_str("pub static Updates: LazyLock<Dependabot> = LazyLock::new(|| {\n");
    contents.push_str("    Dependabot::new()\n");
    for update in &config.updates {
        contents.push_str("        .update(\n");
        contents.push_str(&format!(
            "            DependabotUpdate {{\n                package_ecosystem: {:?}.to_string(),\n                directory: {:?}.to_string(),\n",
            update.package_ecosystem, update.directory
        ));
        contents.push_str(&format!(
            "                schedule: DependabotSchedule {{\n                    interval: {:?}.to_string(),\n                    day: {},\n                    time: {},\n                    timezone: {},\n                }},\n",
            update.schedule.interval,
            opt_string(update.schedule.day.as_deref()),
            opt_string(update.schedule.time.as_deref()),
            opt_string(update.schedule.timezone.as_deref()),
        ));
        contents.push_str(&format!(
            "                labels: {},\n                reviewers: {},\n",
            vec_literal(&update.labels),
            vec_literal(&update.reviewers)
        ));
        contents.push_str(&format!(
            "                open_pull_requests_limit: {},\n",
            match update.open_pull_requests_limit {
                Some(limit) => format!("Some({limit})"),
                None => "None".to_string(),
            }
        ));
        contents.push_str(&format!(
            "                commit_message_prefix: {},\n",
            opt_string(update.commit_message_prefix.as_deref())
        ));
        contents.push_str("            },\n");
        contents.push_str("        )\n");
    }
    contents.push_str("});\n");
    GeneratedFile {
        name: "updates.rs".to_string(),
        contents,
    }
}

fn opt_string(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("Some({text:?}.to_string())"),
        None => "None".to_string(),
    }
}

fn vec_literal(items: &[String]) -> String {
    if items.is_empty() {
        return "Vec::new()".to_string();
    }
    let rendered: Vec<String> = items
        .iter()
        .map(|item| format!("{item:?}.to_string()"))
        .collect();
    format!("vec![{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
version: 2
updates:
  - package-ecosystem: cargo
    directory: /
    schedule:
      interval: daily
      time: '04:00'
    labels:
      - dependencies
    open-pull-requests-limit: 5
  - package-ecosystem: github-actions
    directory: /
    schedule:
      interval: weekly
      day: monday
";

    #[test]
    fn test_decode_updates() {
        let config = import_dependabot(SAMPLE).unwrap();
        assert_eq!(config.version, 2);
        assert_eq!(config.updates.len(), 2);
        assert_eq!(config.updates[0].package_ecosystem, "cargo");
        assert_eq!(config.updates[0].schedule.time.as_deref(), Some("04:00"));
        assert_eq!(config.updates[0].open_pull_requests_limit, Some(5));
        assert_eq!(config.updates[1].schedule.day.as_deref(), Some("monday"));
    }

    #[test]
    fn test_missing_ecosystem_is_an_error() {
        let err = import_dependabot("version: 2\nupdates:\n  - directory: /\n").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::ImportError);
        assert!(err.message.contains("package-ecosystem"));
    }

    #[test]
    fn test_generated_source_shape() {
        let config = import_dependabot(SAMPLE).unwrap();
        let file = generate_dependabot_source(&config);
        assert_eq!(file.name, "updates.rs");
        assert!(file.contents.contains("package_ecosystem: \"cargo\".to_string(),"));
        assert!(file.contents.contains("interval: \"daily\".to_string(),"));
        assert!(file.contents.contains("labels: vec![\"dependencies\".to_string()],"));
        assert!(file.contents.contains("open_pull_requests_limit: Some(5),"));
    }
}
