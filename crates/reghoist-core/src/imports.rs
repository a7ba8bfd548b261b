//! Imports that hoisted material still needs.
//!
//! After calls and supporting variables are pulled up, any import that
//! supplies a binding they reference must come up too — but only such
//! imports; unrelated ones keep their place even when they precede a
//! hoisted call in source order.

use std::collections::HashSet;

use swc_ecma_ast::*;

use crate::calls::{chain_links, is_registration_stmt};
use crate::config::HoistConfig;
use crate::names::TrackedNames;
use crate::view::StatementView;
use crate::walk::{free_references, free_references_in_var_decl, local_bindings};

/// Module specifiers targeted by any recognized call in `items`, seen
/// through `as`-casts. Bindings of these modules must not leak into
/// factories, so they are excluded from the import allowance.
pub(crate) fn collect_mock_targets<S: StatementView>(
    items: &[S],
    names: &TrackedNames,
    config: &HoistConfig,
) -> HashSet<String> {
    let mut targets = HashSet::new();
    for item in items {
        let Some(stmt) = item.as_stmt() else {
            continue;
        };
        if !is_registration_stmt(stmt, names, config) {
            continue;
        }
        for link in chain_links(stmt) {
            if let Some(specifier) = link.target_specifier() {
                targets.insert(specifier);
            }
        }
    }
    targets
}

/// Local names bound by import declarations other than the handle module
/// and the excluded (mocked) specifiers.
pub(crate) fn collect_import_bindings(
    items: &[ModuleItem],
    config: &HoistConfig,
    excluded_specifiers: &HashSet<String>,
) -> HashSet<String> {
    let mut bindings = HashSet::new();
    for item in items {
        let Some(import) = item.import_decl() else {
            continue;
        };
        let specifier = import.src.value.as_ref();
        if specifier == config.handle_module || excluded_specifiers.contains(specifier) {
            continue;
        }
        add_import_bindings(import, &mut bindings);
    }
    bindings
}

fn add_import_bindings(import: &ImportDecl, out: &mut HashSet<String>) {
    for specifier in &import.specifiers {
        match specifier {
            ImportSpecifier::Named(named) => {
                out.insert(named.local.sym.to_string());
            }
            ImportSpecifier::Default(default) => {
                out.insert(default.local.sym.to_string());
            }
            ImportSpecifier::Namespace(namespace) => {
                out.insert(namespace.local.sym.to_string());
            }
        }
    }
}

/// Free identifiers referenced by hoisted call arguments and hoisted
/// variable initializers — the names whose imports must move.
pub(crate) fn collect_hoisted_identifiers<'a>(
    hoisted: impl IntoIterator<Item = &'a ModuleItem>,
    variables: impl IntoIterator<Item = &'a ModuleItem>,
) -> HashSet<String> {
    let empty = HashSet::new();
    let mut ids = HashSet::new();

    for item in hoisted {
        let Some(stmt) = item.as_stmt() else {
            continue;
        };
        for link in chain_links(stmt) {
            for arg in &link.call.args {
                let expr = arg.expr.as_ref();
                // A factory computes its own locals so inner declarations
                // (const actual = ...) are not mistaken for outer needs.
                match expr {
                    Expr::Arrow(_) | Expr::Fn(_) => {
                        let locals = local_bindings(expr);
                        ids.extend(free_references(expr, &locals));
                    }
                    _ => ids.extend(free_references(expr, &empty)),
                }
            }
        }
    }

    for item in variables {
        if let Some(var) = item.var_decl() {
            ids.extend(free_references_in_var_decl(var, &empty));
        }
    }

    ids
}

/// Split `rest` into the imports that bind a needed identifier and
/// everything else, both in source order.
pub(crate) fn extract_dependency_imports(
    rest: Vec<ModuleItem>,
    needed: &HashSet<String>,
) -> (Vec<ModuleItem>, Vec<ModuleItem>) {
    let mut dependency_imports = Vec::new();
    let mut remaining = Vec::new();
    for item in rest {
        let binds_needed = item
            .import_decl()
            .map(|import| import_binds_any(import, needed))
            .unwrap_or(false);
        if binds_needed {
            dependency_imports.push(item);
        } else {
            remaining.push(item);
        }
    }
    (dependency_imports, remaining)
}

fn import_binds_any(import: &ImportDecl, identifiers: &HashSet<String>) -> bool {
    import.specifiers.iter().any(|specifier| match specifier {
        ImportSpecifier::Named(named) => identifiers.contains(named.local.sym.as_ref()),
        ImportSpecifier::Default(default) => identifiers.contains(default.local.sym.as_ref()),
        ImportSpecifier::Namespace(namespace) => {
            identifiers.contains(namespace.local.sym.as_ref())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parse_module;

    #[test]
    fn mock_targets_see_through_casts() {
        let config = HoistConfig::default();
        let module = parse_module(
            "import { doubles } from \"@rbxts/doubles\";\n\
             doubles.register(\"./foo\" as unknown as ModuleScript, () => ({}));\n\
             doubles.register(\"./bar\").unregister(\"./baz\");",
        );
        let names = TrackedNames::collect(&module.body, &config);
        let targets = collect_mock_targets(&module.body, &names, &config);
        let mut sorted: Vec<_> = targets.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, ["./bar", "./baz", "./foo"]);
    }

    #[test]
    fn import_bindings_exclude_handle_and_mocked_modules() {
        let config = HoistConfig::default();
        let module = parse_module(
            "import { doubles } from \"@rbxts/doubles\";\n\
             import { foo } from \"./foo\";\n\
             import Bar, { baz } from \"./bar\";\n\
             import * as NS from \"pkg\";\n\
             import \"./side-effect\";",
        );
        let excluded: HashSet<String> = ["./foo".to_string()].into();
        let bindings = collect_import_bindings(&module.body, &config, &excluded);
        let mut sorted: Vec<_> = bindings.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, ["Bar", "NS", "baz"]);
    }

    #[test]
    fn dependency_extraction_moves_only_needed_imports() {
        let module = parse_module(
            "import Unrelated from \"@rbxts/unrelated\";\n\
             import { SomeService } from \"@rbxts/services\";\n\
             import \"./side-effect\";",
        );
        let needed: HashSet<String> = ["SomeService".to_string()].into();
        let (deps, remaining) = extract_dependency_imports(module.body, &needed);
        assert_eq!(deps.len(), 1);
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn hoisted_identifier_union_covers_args_and_initializers() {
        let module = parse_module(
            "doubles.register(Svc.path, () => {\n\
                 const actual = doubles.loadActual(Other.path);\n\
                 return { ...actual };\n\
             });\n\
             const mockFoo = Helper.make();",
        );
        let (hoisted, variables) = module.body.split_at(1);
        let ids = collect_hoisted_identifiers(hoisted, variables);
        assert!(ids.contains("Svc"));
        assert!(ids.contains("Other"));
        assert!(ids.contains("Helper"));
        assert!(ids.contains("doubles"));
        assert!(!ids.contains("actual"));
    }
}
