//! Enforcement of the out-of-scope-reference rule on registration factories.
//!
//! A factory runs before the statements around it, so it must not capture
//! live module state. Every free name must be an allow-listed global, a
//! mock-prefixed (lazily initialized) value, a coverage counter, a pure
//! constant of the same statement list, or a binding supplied by an import
//! that will itself be hoisted. Anything else aborts the file.

use std::collections::HashSet;

use itertools::Itertools;
use swc_ecma_ast::*;
use swc_ecma_quote::swc_common::Spanned;

use crate::calls::chain_links;
use crate::config::HoistConfig;
use crate::error::{Result, ScopeViolation};
use crate::walk::{free_references, local_bindings};

/// A factory closure together with the link's string first argument, kept
/// for diagnostics.
pub struct Factory<'a> {
    pub expr: &'a Expr,
    pub module_argument: Option<String>,
}

/// The factories of every register link in `stmt`'s chain.
pub fn factories_of(stmt: &Stmt) -> Vec<Factory<'_>> {
    chain_links(stmt)
        .into_iter()
        .filter_map(|link| {
            link.factory().map(|expr| Factory {
                expr,
                module_argument: link.string_argument(),
            })
        })
        .collect()
}

pub struct ValidationContext<'a> {
    pub config: &'a HoistConfig,
    /// Pure constants of the statement list containing the call.
    pub pure_constants: &'a HashSet<String>,
    /// Bindings of imports that are neither the handle module nor a mocked
    /// module; empty for nested blocks.
    pub import_bindings: &'a HashSet<String>,
}

impl ValidationContext<'_> {
    fn permits(&self, name: &str) -> bool {
        self.config.is_allowed_global(name)
            || self.config.matches_mock_prefix(name)
            || self.config.matches_coverage(name)
            || self.pure_constants.contains(name)
            || self.import_bindings.contains(name)
    }
}

/// Validate every factory of a recognized registration statement.
pub fn validate_statement(stmt: &Stmt, ctx: &ValidationContext<'_>) -> Result<()> {
    for factory in factories_of(stmt) {
        let locals = local_bindings(factory.expr);
        // Sorted so the reported name is deterministic when a factory has
        // several violations.
        for name in free_references(factory.expr, &locals).into_iter().sorted() {
            if !ctx.permits(&name) {
                return Err(ScopeViolation {
                    name,
                    module_argument: factory.module_argument.clone(),
                    span: stmt.span(),
                });
            }
        }
    }
    Ok(())
}

/// Mock-prefixed free references of every factory in `stmts` — one half of
/// the hoist seed set.
pub fn collect_factory_mock_refs<'a>(
    stmts: impl IntoIterator<Item = &'a Stmt>,
    config: &HoistConfig,
) -> HashSet<String> {
    let mut refs = HashSet::new();
    for stmt in stmts {
        for factory in factories_of(stmt) {
            let locals = local_bindings(factory.expr);
            refs.extend(
                free_references(factory.expr, &locals)
                    .into_iter()
                    .filter(|name| config.matches_mock_prefix(name)),
            );
        }
    }
    refs
}

/// All free references of every factory in `stmts`, used to decide which
/// pure constants are actually needed.
pub fn collect_factory_outer_refs<'a>(
    stmts: impl IntoIterator<Item = &'a Stmt>,
) -> HashSet<String> {
    let mut refs = HashSet::new();
    for stmt in stmts {
        for factory in factories_of(stmt) {
            let locals = local_bindings(factory.expr);
            refs.extend(free_references(factory.expr, &locals));
        }
    }
    refs
}
