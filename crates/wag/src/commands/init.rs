//! `wag init`: a fresh typed-workflow package.

use crate::errors::CliError;
use std::fs;
use std::path::Path;
use wag_import::{generate_workflows, scaffold, SourceLayout};
use wag_model::names::filename;
use wag_model::{Job, PushTrigger, Step, Workflow};

pub fn run(name: &str, out_dir: &Path) -> Result<u8, CliError> {
    let root = out_dir.join(filename(name));
    if root.exists() {
        return Err(CliError::AlreadyExists { path: root });
    }

    let mut files = scaffold(name, SourceLayout::SingleFile);
    for generated in generate_workflows(&[starter(name)], SourceLayout::SingleFile) {
        files.push(wag_import::GeneratedFile {
            name: format!("src/{}", generated.name),
            contents: generated.contents,
        });
    }

    for generated in &files {
        let target = root.join(&generated.name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| CliError::io("create", parent, e))?;
        }
        fs::write(&target, &generated.contents)
            .map_err(|e| CliError::io("write", &target, e))?;
    }

    println!("created {}", root.display());
    Ok(0)
}

/// The starter workflow: push-to-main, one build job.
fn starter(name: &str) -> Workflow {
    let mut workflow = Workflow::named(name);
    workflow.on.push = Some(PushTrigger {
        branches: vec!["main".to_string()],
        ..PushTrigger::default()
    });
    let mut build = Job::on(
        "ubuntu-latest",
        [
            Step::uses("actions/checkout@v4"),
            Step::run("echo hello").with_name("Say hello"),
        ],
    );
    build.timeout_minutes = Some(10);
    workflow.jobs.insert("build".to_string(), build);
    workflow
}

#[cfg(test)]
mod tests {
    use super::*;
    use wag_model::validate;

    #[test]
    fn test_starter_is_valid() {
        let workflow = starter("CI");
        assert!(validate(&workflow).is_empty());
        assert_eq!(workflow.jobs.len(), 1);
    }
}
