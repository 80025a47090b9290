//! `wag import`: existing YAML to typed source.

use crate::cli::ImportType;
use crate::errors::CliError;
use std::fs;
use std::path::Path;
use wag_import::{
    generate_codeowners_source, generate_dependabot_source, generate_workflows,
    import_codeowners, import_dependabot, import_workflow, scaffold, SourceLayout,
};

pub fn run(
    file: &Path,
    out_dir: &Path,
    single_file: bool,
    no_scaffold: bool,
    input_type: ImportType,
) -> Result<u8, CliError> {
    if !file.is_file() {
        return Err(CliError::MissingInput { path: file.into() });
    }
    let source = fs::read_to_string(file).map_err(|e| CliError::io("read", file, e))?;
    let layout = if single_file {
        SourceLayout::SingleFile
    } else {
        SourceLayout::Split
    };

    let (had_errors, sources, package_name) = match input_type {
        ImportType::Workflow => {
            let imported = match import_workflow(&source) {
                Ok(imported) => imported,
                Err(fatal) => {
                    eprintln!("{}", fatal.in_file(file));
                    return Ok(1);
                }
            };
            for error in &imported.errors {
                eprintln!("{}", error.clone().in_file(file));
            }
            let sources = generate_workflows(std::slice::from_ref(&imported.workflow), layout);
            (
                imported.has_errors(),
                sources,
                imported.workflow.name.clone(),
            )
        }
        ImportType::Dependabot => {
            let config = match import_dependabot(&source) {
                Ok(config) => config,
                Err(fatal) => {
                    eprintln!("{}", fatal.in_file(file));
                    return Ok(1);
                }
            };
            (
                false,
                vec![generate_dependabot_source(&config)],
                String::new(),
            )
        }
        ImportType::Codeowners => {
            let owners = import_codeowners(&source);
            (false, vec![generate_codeowners_source(&owners)], String::new())
        }
    };

    // Scaffolding only makes sense for workflow packages; dependabot and
    // CODEOWNERS sources are single files meant to join an existing one.
    let with_scaffold = !no_scaffold && input_type == ImportType::Workflow;
    let mut files: Vec<(String, String)> = Vec::new();
    if with_scaffold {
        for support in scaffold(&package_name, layout) {
            files.push((support.name, support.contents));
        }
        for generated in sources {
            files.push((format!("src/{}", generated.name), generated.contents));
        }
    } else {
        for generated in sources {
            files.push((generated.name, generated.contents));
        }
    }

    for (name, contents) in &files {
        let target = out_dir.join(name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| CliError::io("create", parent, e))?;
        }
        fs::write(&target, contents).map_err(|e| CliError::io("write", &target, e))?;
        println!("wrote {}", target.display());
    }

    Ok(u8::from(had_errors))
}
