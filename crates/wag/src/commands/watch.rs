//! `wag watch`: rebuild on source changes.
//!
//! Events are debounced with a quiet period; each firing runs the same
//! pipeline as `wag build` (or `wag lint` with `--lint-only`) from
//! scratch, so a broken intermediate state never leaves stale YAML
//! behind.

use crate::cli::{BuildFormat, OutputFormat};
use crate::commands::{build, lint};
use crate::errors::CliError;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

pub fn run(path: &Path, out_dir: &Path, debounce: u64, lint_only: bool) -> Result<u8, CliError> {
    if !path.exists() {
        return Err(CliError::MissingInput { path: path.into() });
    }

    rebuild(path, out_dir, lint_only)?;

    let (sender, receiver) = mpsc::channel();
    let mut watcher: RecommendedWatcher =
        notify::recommended_watcher(move |event: Result<Event, notify::Error>| {
            let _ = sender.send(event);
        })
        .map_err(|source| CliError::Watch {
            path: path.into(),
            source,
        })?;
    watcher
        .watch(path, RecursiveMode::Recursive)
        .map_err(|source| CliError::Watch {
            path: path.into(),
            source,
        })?;
    eprintln!("watching {} (Ctrl-C to stop)", path.display());

    let quiet = Duration::from_millis(debounce);
    while let Ok(event) = receiver.recv() {
        let mut relevant = is_relevant(&event);
        // Swallow the burst; editors produce several events per save.
        loop {
            match receiver.recv_timeout(quiet) {
                Ok(event) => relevant |= is_relevant(&event),
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(0),
            }
        }
        if relevant {
            rebuild(path, out_dir, lint_only)?;
        }
    }

    Ok(0)
}

/// Only Rust source changes trigger a rebuild; the output directory and
/// editor temp files stay out of the loop.
fn is_relevant(event: &Result<Event, notify::Error>) -> bool {
    match event {
        Ok(event) => event
            .paths
            .iter()
            .any(|path| path.extension().is_some_and(|ext| ext == "rs")),
        // Watcher errors are rare enough that a spurious rebuild is the
        // safer reaction.
        Err(error) => {
            tracing::warn!(%error, "watch error");
            true
        }
    }
}

/// One watch iteration. Failures are reported but keep the watcher
/// alive; only filesystem errors abort.
fn rebuild(path: &Path, out_dir: &Path, lint_only: bool) -> Result<(), CliError> {
    let code = if lint_only {
        lint::run(path, false, OutputFormat::Text)?
    } else {
        build::run(path, out_dir, false, BuildFormat::Yaml)?
    };
    if code == 0 {
        eprintln!("ok");
    } else {
        eprintln!("failed; waiting for changes");
    }
    Ok(())
}
