//! Command-line argument definitions.

use crate::logging::LogLevel;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Typed GitHub Actions workflows: build, import, validate, and lint.
#[derive(Debug, Parser)]
#[command(name = "wag", version, about, propagate_version = true)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Log verbosity (stderr only).
    #[arg(short = 'l', long, global = true, value_enum, default_value = "warn")]
    pub level: LogLevel,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

/// All wag subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate typed declarations and write canonical workflow YAML.
    #[command(about = "Build YAML workflows from typed declarations")]
    Build {
        /// Root of the typed-workflow source tree.
        path: PathBuf,
        /// Directory the YAML files are written to.
        #[arg(short = 'o', long = "out-dir", default_value = ".github/workflows")]
        out_dir: PathBuf,
        /// Report what would be written without touching the filesystem.
        #[arg(long)]
        dry_run: bool,
        /// Report format.
        #[arg(long, value_enum, default_value = "yaml")]
        format: BuildFormat,
    },

    /// Turn an existing YAML configuration file into typed source.
    #[command(about = "Import a YAML file as typed declarations")]
    Import {
        /// The YAML file to import.
        file: PathBuf,
        /// Directory the generated package or sources are written to.
        #[arg(short = 'o', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
        /// Generate one workflows.rs instead of split modules.
        #[arg(long)]
        single_file: bool,
        /// Generate only source files, no package scaffolding.
        #[arg(long)]
        no_scaffold: bool,
        /// What kind of configuration the file holds.
        #[arg(long = "type", value_enum, default_value = "workflow")]
        input_type: ImportType,
    },

    /// Validate a workflow YAML file.
    #[command(about = "Validate a workflow YAML file")]
    Validate {
        /// The YAML file to check.
        file: PathBuf,
        /// Report format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the workflows a source tree declares.
    #[command(about = "List discovered workflows and their job counts")]
    List {
        /// Root of the typed-workflow source tree.
        path: PathBuf,
    },

    /// Run the style rules over a source tree.
    #[command(about = "Lint typed workflow declarations")]
    Lint {
        /// Root of the typed-workflow source tree.
        path: PathBuf,
        /// Apply automatic rewrites for fixable findings.
        #[arg(long)]
        fix: bool,
        /// Report format.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Compare two workflows semantically.
    #[command(about = "Diff two workflows (sources or YAML files)")]
    Diff {
        /// First workflow: a YAML file or a source tree.
        path1: PathBuf,
        /// Second workflow: a YAML file or a source tree.
        path2: PathBuf,
        /// Also show a line diff of the emitted YAML.
        #[arg(long)]
        yaml: bool,
        /// Report format.
        #[arg(long, value_enum, default_value = "text")]
        format: DiffFormat,
    },

    /// Render the job dependency graph.
    #[command(about = "Render job dependency graphs")]
    Graph {
        /// Root of the typed-workflow source tree.
        path: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value = "dot")]
        format: GraphFormat,
        /// Layout direction.
        #[arg(long, value_enum, default_value = "TB")]
        direction: Direction,
    },

    /// Create a new typed-workflow package.
    #[command(about = "Create a new typed-workflow package")]
    Init {
        /// Workflow name; also determines the package directory.
        name: String,
        /// Directory the package is created under.
        #[arg(short = 'o', long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Rebuild whenever the source tree changes.
    #[command(about = "Watch a source tree and rebuild on change")]
    Watch {
        /// Root of the typed-workflow source tree.
        path: PathBuf,
        /// Directory the YAML files are written to.
        #[arg(short = 'o', long = "out-dir", default_value = ".github/workflows")]
        out_dir: PathBuf,
        /// Quiet period in milliseconds before a rebuild fires.
        #[arg(short = 'd', long, default_value_t = 300)]
        debounce: u64,
        /// Only lint, never write YAML.
        #[arg(long)]
        lint_only: bool,
    },
}

/// `build` report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuildFormat {
    /// Human-readable listing; the YAML itself goes to files (or stdout
    /// with `--dry-run`).
    Yaml,
    /// Machine-readable JSON envelope.
    Json,
}

/// Text-or-JSON report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one finding per line.
    Text,
    /// Machine-readable JSON envelope.
    Json,
}

/// What an imported file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportType {
    /// A GitHub Actions workflow.
    Workflow,
    /// A dependabot configuration.
    Dependabot,
    /// A CODEOWNERS file.
    Codeowners,
}

/// `diff` report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiffFormat {
    /// Plain text.
    Text,
    /// Machine-readable JSON envelope.
    Json,
    /// Markdown suitable for a PR comment.
    Markdown,
}

/// `graph` output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    /// Graphviz DOT.
    Dot,
    /// Mermaid flowchart.
    Mermaid,
    /// Machine-readable JSON envelope.
    Json,
}

/// Graph layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Top to bottom.
    #[value(name = "TB", alias = "tb")]
    Tb,
    /// Left to right.
    #[value(name = "LR", alias = "lr")]
    Lr,
}

impl Direction {
    /// The keyword DOT and Mermaid both use.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Tb => "TB",
            Self::Lr => "LR",
        }
    }
}

/// Parse the process arguments, exiting with clap's usage error (status 2)
/// on bad input.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let cli = Cli::try_parse_from(["wag", "build", "."]).unwrap();
        let Commands::Build {
            path,
            out_dir,
            dry_run,
            format,
        } = cli.command
        else {
            panic!("expected build");
        };
        assert_eq!(path, PathBuf::from("."));
        assert_eq!(out_dir, PathBuf::from(".github/workflows"));
        assert!(!dry_run);
        assert_eq!(format, BuildFormat::Yaml);
    }

    #[test]
    fn test_graph_direction_values() {
        let cli = Cli::try_parse_from(["wag", "graph", ".", "--direction", "LR"]).unwrap();
        let Commands::Graph { direction, .. } = cli.command else {
            panic!("expected graph");
        };
        assert_eq!(direction, Direction::Lr);
    }

    #[test]
    fn test_import_type_flag() {
        let cli =
            Cli::try_parse_from(["wag", "import", "dependabot.yml", "--type", "dependabot"])
                .unwrap();
        let Commands::Import { input_type, .. } = cli.command else {
            panic!("expected import");
        };
        assert_eq!(input_type, ImportType::Dependabot);
    }

    #[test]
    fn test_global_level_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["wag", "list", ".", "--level", "debug"]).unwrap();
        assert_eq!(cli.level, LogLevel::Debug);
    }

    #[test]
    fn test_missing_subcommand_is_usage_error() {
        assert!(Cli::try_parse_from(["wag"]).is_err());
    }
}
