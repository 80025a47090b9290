//! Reference collection over initializer expressions.

use syn::visit::{self, Visit};

/// Names that read like symbols but belong to the language or the entity
/// API, never to a user declaration.
const NON_SYMBOLS: &[&str] = &[
    "Some", "None", "Ok", "Err", "Default", "Self", "String", "Box", "Vec",
];

/// Collect the top-level symbol names an initializer mentions, in
/// first-mention order.
///
/// A mention is a bare expression-position path in PascalCase, such as the
/// `Build` in `needs: vec![Build.clone()]`. Qualified paths like
/// `RunsOn::Label` and struct literal heads are type usage, not symbol
/// references, and are skipped.
#[must_use]
pub fn collect(init: &syn::Expr) -> Vec<String> {
    let mut collector = ReferenceCollector { found: Vec::new() };
    collector.visit_expr(init);
    collector.found
}

struct ReferenceCollector {
    found: Vec<String>,
}

impl ReferenceCollector {
    fn record(&mut self, name: &str) {
        if looks_like_symbol(name) && !self.found.iter().any(|n| n == name) {
            self.found.push(name.to_string());
        }
    }
}

impl<'ast> Visit<'ast> for ReferenceCollector {
    fn visit_expr_path(&mut self, node: &'ast syn::ExprPath) {
        if node.qself.is_none() && node.path.segments.len() == 1 {
            self.record(&node.path.segments[0].ident.to_string());
        }
        visit::visit_expr_path(self, node);
    }

    fn visit_expr_struct(&mut self, node: &'ast syn::ExprStruct) {
        // Visit field values and the update tail, but not the struct path:
        // `Workflow { .. }` names a type, not a symbol.
        for field in &node.fields {
            self.visit_expr(&field.expr);
        }
        if let Some(rest) = &node.rest {
            self.visit_expr(rest);
        }
    }

    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        // syn does not descend into macro token streams; `vec![...]` is the
        // one macro step lists are built with, so parse its elements.
        if node.path.segments.last().is_some_and(|s| s.ident == "vec") {
            if let Ok(elements) = node.parse_body_with(
                syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated,
            ) {
                for element in &elements {
                    self.visit_expr(element);
                }
            }
        }
    }
}

fn looks_like_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    let pascal = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().any(|c| c.is_ascii_lowercase());
    pascal && !NON_SYMBOLS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs_in(source: &str) -> Vec<String> {
        let expr: syn::Expr = syn::parse_str(source).unwrap();
        collect(&expr)
    }

    #[test]
    fn test_collects_bare_symbols() {
        let refs = refs_in(
            r#"Workflow {
                name: "CI".into(),
                on: CiTriggers.clone(),
                jobs: IndexMap::from([("build".into(), Build.clone())]),
                ..Default::default()
            }"#,
        );
        assert_eq!(refs, vec!["CiTriggers", "Build"]);
    }

    #[test]
    fn test_skips_qualified_paths_and_type_heads() {
        let refs = refs_in("Job { runs_on: RunsOn::Label(\"ubuntu-latest\".into()), ..Default::default() }");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_descends_into_vec_macro() {
        let refs = refs_in("vec![CheckoutStep.clone(), Step::run(\"cargo test\")]");
        assert_eq!(refs, vec!["CheckoutStep"]);
    }

    #[test]
    fn test_deduplicates_in_order() {
        let refs = refs_in("vec![Build.clone(), Test.clone(), Build.clone()]");
        assert_eq!(refs, vec!["Build", "Test"]);
    }
}
