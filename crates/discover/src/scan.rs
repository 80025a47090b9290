//! Tree walking and per-file declaration extraction.

use crate::decl::{Decl, DeclKind, DiscoveryResult};
use crate::refs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use wag_model::{CancelToken, Diagnostic, DiagnosticKind};
use walkdir::{DirEntry, WalkDir};

/// Scan a source tree for top-level workflow declarations.
///
/// Hidden directories, `target/`, and `*_test.rs` files are skipped. Files
/// that fail to parse are reported and do not stop the scan. When `cancel`
/// fires, partial results are discarded and the single cancellation
/// diagnostic is returned instead.
#[must_use]
pub fn discover(root: &Path, cancel: &CancelToken) -> DiscoveryResult {
    let mut result = DiscoveryResult::default();

    if !root.is_dir() {
        result.errors.push(
            Diagnostic::error(
                DiagnosticKind::DiscoveryError,
                format!("source tree '{}' is not a readable directory", root.display()),
            )
            .in_file(root),
        );
        return result;
    }

    let mut seen: HashMap<String, (PathBuf, usize)> = HashMap::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry));

    for entry in walker {
        if cancel.is_cancelled() {
            let mut cancelled = DiscoveryResult::default();
            cancelled.errors.push(Diagnostic::cancelled());
            return cancelled;
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                result.errors.push(Diagnostic::error(
                    DiagnosticKind::IoError,
                    err.to_string(),
                ));
                continue;
            }
        };
        if !is_source_file(&entry) {
            continue;
        }
        scan_file(entry.path(), &mut result, &mut seen);
    }

    if result.workflows.is_empty() {
        result.errors.push(Diagnostic::error(
            DiagnosticKind::DiscoveryError,
            format!(
                "no workflow declarations found under '{}'",
                root.display()
            ),
        ));
    }

    check_unknown_references(&mut result);
    result
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || name == "target")
}

fn is_source_file(entry: &DirEntry) -> bool {
    if !entry.file_type().is_file() {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    name.ends_with(".rs") && !name.ends_with("_test.rs")
}

fn scan_file(
    path: &Path,
    result: &mut DiscoveryResult,
    seen: &mut HashMap<String, (PathBuf, usize)>,
) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            result.errors.push(
                Diagnostic::error(DiagnosticKind::IoError, err.to_string()).in_file(path),
            );
            return;
        }
    };
    let file = match syn::parse_file(&source) {
        Ok(file) => file,
        Err(err) => {
            let location = err.span().start();
            result.errors.push(
                Diagnostic::error(DiagnosticKind::DiscoveryError, err.to_string()).at(
                    path,
                    location.line,
                    location.column + 1,
                ),
            );
            return;
        }
    };

    for item in file.items {
        let (ident, ty, init) = match item {
            syn::Item::Static(item) => (item.ident, *item.ty, *item.expr),
            syn::Item::Const(item) => (item.ident, *item.ty, *item.expr),
            _ => continue,
        };
        let Some(kind) = declared_kind(&ty) else {
            continue;
        };
        let name = ident.to_string();
        let line = ident.span().start().line;

        if let Some((first_file, first_line)) = seen.get(&name) {
            result.errors.push(
                Diagnostic::error(
                    DiagnosticKind::DiscoveryError,
                    format!(
                        "symbol '{name}' is already declared at {}:{first_line}; keeping the first declaration",
                        first_file.display()
                    ),
                )
                .at(path, line, 1),
            );
            continue;
        }
        seen.insert(name.clone(), (path.to_path_buf(), line));

        let init = unwrap_lazy(init);
        let mentions = refs::collect(&init);
        debug!(symbol = %name, kind = kind.as_str(), references = mentions.len(), "discovered declaration");
        result.references.insert(name.clone(), mentions);

        let decl = Decl {
            name,
            file: path.to_path_buf(),
            line,
            kind,
            init,
        };
        match kind {
            DeclKind::Workflow => result.workflows.push(decl),
            DeclKind::Job => result.jobs.push(decl),
            DeclKind::Triggers => result.triggers.push(decl),
            DeclKind::Steps => result.step_lists.push(decl),
            DeclKind::Dependabot | DeclKind::IssueTemplate | DeclKind::CodeOwners => {
                result.others.push(decl);
            }
        }
    }
}

/// Resolve a declared type to a kind, looking through `LazyLock<T>`.
fn declared_kind(ty: &syn::Type) -> Option<DeclKind> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let name = segment.ident.to_string();

    if name == "LazyLock" || name == "Lazy" {
        return declared_kind(first_type_argument(segment)?);
    }
    if name == "Vec" {
        let inner = first_type_argument(segment)?;
        let syn::Type::Path(inner_path) = inner else {
            return None;
        };
        if inner_path.path.segments.last()?.ident == "Step" {
            return Some(DeclKind::Steps);
        }
        return None;
    }
    DeclKind::from_type_name(&name)
}

fn first_type_argument(segment: &syn::PathSegment) -> Option<&syn::Type> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        syn::GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

/// Strip a `LazyLock::new(|| …)` wrapper, leaving the closure body as the
/// initializer handle.
fn unwrap_lazy(expr: syn::Expr) -> syn::Expr {
    let syn::Expr::Call(call) = &expr else {
        return expr;
    };
    let syn::Expr::Path(func) = call.func.as_ref() else {
        return expr;
    };
    let segments: Vec<String> = func
        .path
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect();
    let is_lazy_new = segments.len() >= 2
        && segments[segments.len() - 1] == "new"
        && matches!(segments[segments.len() - 2].as_str(), "LazyLock" | "Lazy");
    if !is_lazy_new || call.args.len() != 1 {
        return expr;
    }
    match call.args.first() {
        Some(syn::Expr::Closure(closure)) => (*closure.body).clone(),
        // `LazyLock::new(Triggers::default)` passes the function itself;
        // normalize to a zero-argument call.
        Some(syn::Expr::Path(path)) => syn::Expr::Call(syn::ExprCall {
            attrs: Vec::new(),
            func: Box::new(syn::Expr::Path(path.clone())),
            paren_token: syn::token::Paren::default(),
            args: syn::punctuated::Punctuated::new(),
        }),
        _ => expr,
    }
}

/// Warn about references that resolve to no discovered symbol. The
/// evaluator re-checks these with full information, so they stay warnings.
fn check_unknown_references(result: &mut DiscoveryResult) {
    let known: Vec<String> = result.references.keys().cloned().collect();
    let mut warnings = Vec::new();
    for (name, mentions) in &result.references {
        for mention in mentions {
            if !known.iter().any(|k| k == mention) {
                let location = result
                    .symbol(name)
                    .map(|decl| (decl.file.clone(), decl.line));
                let mut diagnostic = Diagnostic::warning(
                    DiagnosticKind::ReferenceError,
                    format!("'{name}' references unknown name '{mention}'"),
                );
                if let Some((file, line)) = location {
                    diagnostic = diagnostic.at(file, line, 1);
                }
                warnings.push(diagnostic);
            }
        }
    }
    result.errors.extend(warnings);
}
