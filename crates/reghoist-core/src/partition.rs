//! Partitioning a statement list into ordered hoist groups, and the pass
//! entry point.
//!
//! Re-emission order for a module top level: handle-module imports →
//! dependency imports → mock-prefixed variables → pure-constant variables →
//! registration calls (path-rewritten) → everything else, each group in
//! source order. Nested blocks use the same order minus the import groups.
//! A list with no recognized calls is re-emitted exactly as it came in,
//! which is what makes the pass a no-op on ordinary code and idempotent on
//! already-hoisted input.

use std::collections::HashSet;

use swc_ecma_ast::*;
use tracing::debug;

use crate::calls::{argument_identifiers, is_registration_stmt};
use crate::config::HoistConfig;
use crate::error::Result;
use crate::fold::{self, BlockRewriter};
use crate::hoist::{extract_variables, ExtractedVariables};
use crate::imports::{
    collect_hoisted_identifiers, collect_import_bindings, collect_mock_targets,
    extract_dependency_imports,
};
use crate::names::{is_handle_import, TrackedNames};
use crate::paths::{PathResolver, PathRewriter};
use crate::purity::collect_pure_constants;
use crate::validate::{
    collect_factory_mock_refs, collect_factory_outer_refs, validate_statement, ValidationContext,
};
use crate::view::StatementView;

/// Rewrite `module` so that registration calls run before the imports they
/// intercept. Pure in its input: the returned tree shares nothing mutable
/// with `module`. The only error is a factory scope violation, which aborts
/// the whole unit.
pub fn transform(
    module: &Module,
    config: &HoistConfig,
    resolver: Option<&dyn PathResolver>,
    containing_file: &str,
) -> Result<Module> {
    let base_names = TrackedNames::collect(&module.body, config);
    let pass = Pass {
        config,
        resolver,
        containing_file,
        base_names,
    };
    let rewritten = module.clone();
    Ok(Module {
        span: rewritten.span,
        shebang: rewritten.shebang,
        body: pass.rewrite_module_items(rewritten.body)?,
    })
}

struct Pass<'a> {
    config: &'a HoistConfig,
    resolver: Option<&'a dyn PathResolver>,
    containing_file: &'a str,
    /// Import-derived tracked names, before any per-list shadow filtering.
    base_names: TrackedNames,
}

struct ListGroups<S> {
    calls: Vec<S>,
    mock: Vec<S>,
    pure: Vec<S>,
    remaining: Vec<S>,
}

impl Pass<'_> {
    fn rewrite_module_items(&self, items: Vec<ModuleItem>) -> Result<Vec<ModuleItem>> {
        let mut folded = Vec::with_capacity(items.len());
        for item in items {
            folded.push(fold::fold_module_item(self, item)?);
        }

        let names = self.base_names.filtered_by_shadows(&folded);
        if names.is_empty() || !has_registration_calls(&folded, &names, self.config) {
            return Ok(folded);
        }

        let mock_targets = collect_mock_targets(&folded, &names, self.config);
        let import_bindings = collect_import_bindings(&folded, self.config, &mock_targets);
        let pure_constants =
            collect_pure_constants(folded.iter().filter_map(StatementView::var_decl));

        let mut leading = Vec::new();
        let mut rest = Vec::new();
        for item in folded {
            if is_handle_import(&item, self.config) {
                leading.push(item);
            } else {
                rest.push(item);
            }
        }

        let groups = self.partition_core(rest, &names, &pure_constants, &import_bindings)?;
        let needed = collect_hoisted_identifiers(
            groups.calls.iter(),
            groups.mock.iter().chain(groups.pure.iter()),
        );
        let (dependency_imports, remainder) = extract_dependency_imports(groups.remaining, &needed);

        debug!(
            calls = groups.calls.len(),
            variables = groups.mock.len() + groups.pure.len(),
            imports = dependency_imports.len(),
            "hoisted registration calls at module top level"
        );

        let calls = self.rewrite_call_paths(groups.calls, &names);

        let mut out = leading;
        out.extend(dependency_imports);
        out.extend(groups.mock);
        out.extend(groups.pure);
        out.extend(calls);
        out.extend(remainder);
        Ok(out)
    }

    /// Recognize and validate calls, then pull supporting variables out of
    /// the rest. Shared between the module top level and nested blocks.
    fn partition_core<S: StatementView>(
        &self,
        items: Vec<S>,
        names: &TrackedNames,
        pure_constants: &HashSet<String>,
        import_bindings: &HashSet<String>,
    ) -> Result<ListGroups<S>> {
        let ctx = ValidationContext {
            config: self.config,
            pure_constants,
            import_bindings,
        };
        let mut calls = Vec::new();
        let mut rest = Vec::new();
        for item in items {
            let recognized = match item.as_stmt() {
                Some(stmt) if is_registration_stmt(stmt, names, self.config) => {
                    validate_statement(stmt, &ctx)?;
                    true
                }
                _ => false,
            };
            if recognized {
                calls.push(item);
            } else {
                rest.push(item);
            }
        }

        let call_stmts: Vec<&Stmt> = calls.iter().filter_map(StatementView::as_stmt).collect();
        let argument_idents = argument_identifiers(call_stmts.iter().copied());

        let mut seeds = collect_factory_mock_refs(call_stmts.iter().copied(), self.config);
        seeds.extend(
            argument_idents
                .iter()
                .filter(|name| self.config.matches_mock_prefix(name))
                .cloned(),
        );

        let mut pure_refs = collect_factory_outer_refs(call_stmts.iter().copied());
        pure_refs.extend(argument_idents);
        pure_refs.retain(|name| pure_constants.contains(name));

        let ExtractedVariables {
            mock,
            pure,
            remaining,
        } = extract_variables(rest, &seeds, &pure_refs, pure_constants, self.config);

        Ok(ListGroups {
            calls,
            mock,
            pure,
            remaining,
        })
    }

    fn rewrite_call_paths<S: StatementView>(&self, calls: Vec<S>, names: &TrackedNames) -> Vec<S> {
        let rewriter = PathRewriter {
            config: self.config,
            names,
            resolver: self.resolver,
            containing_file: self.containing_file,
        };
        calls
            .into_iter()
            .map(|item| item.map_stmt(|stmt| rewriter.rewrite_statement(stmt)))
            .collect()
    }
}

impl BlockRewriter for Pass<'_> {
    fn rewrite_stmt_list(&self, stmts: Vec<Stmt>) -> Result<Vec<Stmt>> {
        let names = self.base_names.filtered_by_shadows(&stmts);
        if names.is_empty() || !has_registration_calls(&stmts, &names, self.config) {
            return Ok(stmts);
        }

        let pure_constants =
            collect_pure_constants(stmts.iter().filter_map(StatementView::var_decl));
        let no_import_bindings = HashSet::new();
        let groups = self.partition_core(stmts, &names, &pure_constants, &no_import_bindings)?;

        debug!(calls = groups.calls.len(), "hoisted registration calls in nested block");

        let calls = self.rewrite_call_paths(groups.calls, &names);
        let mut out = groups.mock;
        out.extend(groups.pure);
        out.extend(calls);
        out.extend(groups.remaining);
        Ok(out)
    }
}

fn has_registration_calls<S: StatementView>(
    items: &[S],
    names: &TrackedNames,
    config: &HoistConfig,
) -> bool {
    items.iter().any(|item| {
        item.as_stmt()
            .map(|stmt| is_registration_stmt(stmt, names, config))
            .unwrap_or(false)
    })
}
