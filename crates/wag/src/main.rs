//! wag: typed GitHub Actions workflows.
//!
//! Workflows are declared as Rust values, evaluated into an intermediate
//! representation, validated, and emitted as canonical YAML. The reverse
//! direction imports existing YAML into generated typed source.

mod cli;
mod commands;
mod errors;
mod logging;

use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::parse();
    logging::init(cli.level, cli.json);
    match commands::run(cli.command) {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            let code = error.exit_code();
            eprintln!("{:?}", miette::Report::new(error));
            ExitCode::from(code)
        }
    }
}
