//! Which variable declarations travel with the hoisted calls.
//!
//! Two independent rules:
//!
//! 1. Naming convention: `const` declarations whose bound names are all
//!    mock-prefixed and simply or array-destructured, transitively closed
//!    over their own mock-prefixed references so a mock built from another
//!    mock-prefixed helper hoists together with it, in dependency order.
//! 2. Purity: `const` declarations whose names are all pure constants, when
//!    at least one name is used by a hoisted factory or call argument.

use std::collections::HashSet;

use swc_ecma_ast::*;

use crate::config::HoistConfig;
use crate::view::StatementView;
use crate::walk::free_references_in_var_decl;

pub(crate) struct ExtractedVariables<S> {
    pub mock: Vec<S>,
    pub pure: Vec<S>,
    pub remaining: Vec<S>,
}

struct MockCandidate {
    names: Vec<String>,
    refs: HashSet<String>,
}

/// Partition `rest` into naming-convention hoists, purity hoists and the
/// untouched remainder, preserving source order inside each group.
pub(crate) fn extract_variables<S: StatementView>(
    rest: Vec<S>,
    seed: &HashSet<String>,
    pure_refs: &HashSet<String>,
    pure_constants: &HashSet<String>,
    config: &HoistConfig,
) -> ExtractedVariables<S> {
    let candidates: Vec<Option<MockCandidate>> = rest
        .iter()
        .map(|item| item.var_decl().and_then(|var| mock_candidate(var, config)))
        .collect();
    let hoist_names = resolve_transitive(&candidates, seed);

    let mut mock = Vec::new();
    let mut pure = Vec::new();
    let mut remaining = Vec::new();
    for (item, candidate) in rest.into_iter().zip(candidates) {
        if candidate
            .map(|candidate| candidate.names.iter().any(|name| hoist_names.contains(name)))
            .unwrap_or(false)
        {
            mock.push(item);
        } else if is_referenced_pure_constant(&item, pure_refs, pure_constants) {
            pure.push(item);
        } else {
            remaining.push(item);
        }
    }

    ExtractedVariables {
        mock,
        pure,
        remaining,
    }
}

/// Bound names of a declarator eligible for convention hoisting: a simple
/// identifier, or an array pattern of identifiers (holes permitted). Nested
/// patterns, object patterns and empty patterns disqualify.
fn declaration_names(pat: &Pat) -> Option<Vec<String>> {
    match pat {
        Pat::Ident(name) => Some(vec![name.id.sym.to_string()]),
        Pat::Array(array) => {
            let mut names = Vec::new();
            for elem in array.elems.iter().flatten() {
                match elem {
                    Pat::Ident(name) => names.push(name.id.sym.to_string()),
                    _ => return None,
                }
            }
            if names.is_empty() {
                None
            } else {
                Some(names)
            }
        }
        _ => None,
    }
}

fn mock_candidate(var: &VarDecl, config: &HoistConfig) -> Option<MockCandidate> {
    if var.kind != VarDeclKind::Const {
        return None;
    }
    let mut all_names = Vec::new();
    for declarator in &var.decls {
        let bound = declaration_names(&declarator.name)?;
        if !bound.iter().all(|name| config.matches_mock_prefix(name)) {
            return None;
        }
        all_names.extend(bound);
    }
    if all_names.is_empty() {
        return None;
    }
    let own: HashSet<String> = all_names.iter().cloned().collect();
    let refs = free_references_in_var_decl(var, &own)
        .into_iter()
        .filter(|name| config.matches_mock_prefix(name))
        .collect();
    Some(MockCandidate {
        names: all_names,
        refs,
    })
}

/// Fixed-point closure: once a candidate's name is in the hoist set, its own
/// mock-prefixed references must hoist too.
fn resolve_transitive(
    candidates: &[Option<MockCandidate>],
    seed: &HashSet<String>,
) -> HashSet<String> {
    let mut hoist_names = seed.clone();
    let mut changed = true;
    while changed {
        changed = false;
        for candidate in candidates.iter().flatten() {
            if !candidate.names.iter().any(|name| hoist_names.contains(name)) {
                continue;
            }
            for name in &candidate.refs {
                if hoist_names.insert(name.clone()) {
                    changed = true;
                }
            }
        }
    }
    hoist_names
}

fn is_referenced_pure_constant<S: StatementView>(
    item: &S,
    pure_refs: &HashSet<String>,
    pure_constants: &HashSet<String>,
) -> bool {
    let Some(var) = item.var_decl() else {
        return false;
    };
    if var.kind != VarDeclKind::Const {
        return false;
    }
    let all_pure = var.decls.iter().all(|declarator| match &declarator.name {
        Pat::Ident(name) => pure_constants.contains(name.id.sym.as_ref()),
        _ => false,
    });
    if !all_pure {
        return false;
    }
    var.decls.iter().any(|declarator| match &declarator.name {
        Pat::Ident(name) => pure_refs.contains(name.id.sym.as_ref()),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{parse_module, print_module};

    fn extract(
        source: &str,
        seed: &[&str],
        pure_refs: &[&str],
        pure_constants: &[&str],
    ) -> (Vec<String>, Vec<String>, Vec<String>) {
        let config = HoistConfig::default();
        let module = parse_module(source);
        let seed = seed.iter().map(|s| s.to_string()).collect();
        let pure_refs = pure_refs.iter().map(|s| s.to_string()).collect();
        let pure_constants = pure_constants.iter().map(|s| s.to_string()).collect();
        let extracted =
            extract_variables(module.body, &seed, &pure_refs, &pure_constants, &config);
        let print = |items: Vec<ModuleItem>| {
            items
                .into_iter()
                .map(|item| {
                    print_module(&Module {
                        span: Default::default(),
                        body: vec![item],
                        shebang: None,
                    })
                    .trim()
                    .to_string()
                })
                .collect()
        };
        (
            print(extracted.mock),
            print(extracted.pure),
            print(extracted.remaining),
        )
    }

    #[test]
    fn seeded_mock_variable_is_extracted() {
        let (mock, _, remaining) = extract(
            "const mockFoo = create();\nconst other = 1;",
            &["mockFoo"],
            &[],
            &[],
        );
        assert_eq!(mock, ["const mockFoo = create();"]);
        assert_eq!(remaining, ["const other = 1;"]);
    }

    #[test]
    fn unreferenced_mock_variable_stays() {
        let (mock, _, remaining) = extract("const mockFoo = create();", &[], &[], &[]);
        assert!(mock.is_empty());
        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn transitive_dependencies_hoist_in_order() {
        let (mock, _, remaining) = extract(
            "const mockA = make();\nconst mockB = mockA.child(\"x\");\nconst plain = 0;",
            &["mockB"],
            &[],
            &[],
        );
        assert_eq!(
            mock,
            ["const mockA = make();", "const mockB = mockA.child(\"x\");"]
        );
        assert_eq!(remaining, ["const plain = 0;"]);
    }

    #[test]
    fn array_destructuring_with_holes_qualifies() {
        let (mock, _, _) = extract(
            "const [mockA, , mockB] = makeBoth();",
            &["mockA"],
            &[],
            &[],
        );
        assert_eq!(mock.len(), 1);
    }

    #[test]
    fn nested_and_object_patterns_do_not_qualify() {
        let (mock, _, remaining) = extract(
            "const [[mockA]] = x;\nconst { mockB } = y;\nconst [] = z;",
            &["mockA", "mockB"],
            &[],
            &[],
        );
        assert!(mock.is_empty());
        assert_eq!(remaining.len(), 3);
    }

    #[test]
    fn let_never_qualifies() {
        let (mock, _, remaining) = extract("let mockFoo = create();", &["mockFoo"], &[], &[]);
        assert!(mock.is_empty());
        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn mixed_name_declaration_does_not_qualify() {
        let (mock, _, _) = extract("const mockA = 1, other = 2;", &["mockA"], &[], &[]);
        assert!(mock.is_empty());
    }

    #[test]
    fn referenced_pure_constant_is_extracted() {
        let (_, pure, remaining) = extract(
            "const BASE = 42;\nconst UNUSED = 1;",
            &[],
            &["BASE"],
            &["BASE", "UNUSED"],
        );
        assert_eq!(pure, ["const BASE = 42;"]);
        assert_eq!(remaining, ["const UNUSED = 1;"]);
    }

    #[test]
    fn convention_claims_win_over_purity() {
        let (mock, pure, _) = extract(
            "const mockN = 1;",
            &["mockN"],
            &["mockN"],
            &["mockN"],
        );
        assert_eq!(mock.len(), 1);
        assert!(pure.is_empty());
    }
}
