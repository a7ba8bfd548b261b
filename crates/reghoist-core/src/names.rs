//! Which identifiers denote the tracked handle in one statement list.
//!
//! The base set comes from the module's import declarations; every list
//! (the module itself or a nested block) then filters the base by its own
//! shadowing declarations. Filtering is list-scoped in both directions: an
//! inner block's shadow does not affect the module, and a module-level
//! shadow does not suppress recognition inside blocks.

use std::collections::HashSet;

use swc_ecma_ast::*;

use crate::config::HoistConfig;
use crate::view::StatementView;

#[derive(Debug, Clone, Default)]
pub struct TrackedNames {
    /// Names that resolve to the handle itself.
    pub direct: HashSet<String>,
    /// Names of namespace imports through which the handle is reached as a
    /// fixed member.
    pub namespaces: HashSet<String>,
}

impl TrackedNames {
    /// Scan the import declarations of a module body for the handle module.
    ///
    /// A side-effect-only import binds nothing, so it contributes nothing:
    /// such a file never hoists.
    pub fn collect<S: StatementView>(items: &[S], config: &HoistConfig) -> Self {
        let mut names = Self::default();
        for item in items {
            let Some(import) = item.import_decl() else {
                continue;
            };
            if import.src.value.as_ref() != config.handle_module {
                continue;
            }
            for specifier in &import.specifiers {
                match specifier {
                    ImportSpecifier::Namespace(namespace) => {
                        names.namespaces.insert(namespace.local.sym.to_string());
                    }
                    ImportSpecifier::Named(named) => {
                        let imported = match &named.imported {
                            Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                            Some(ModuleExportName::Str(value)) => value.value.to_string(),
                            None => named.local.sym.to_string(),
                        };
                        if imported == config.handle_name
                            || named.local.sym.as_ref() == config.handle_name
                        {
                            names.direct.insert(named.local.sym.to_string());
                        }
                    }
                    ImportSpecifier::Default(_) => {}
                }
            }
        }
        names
    }

    /// Remove every name re-declared by a variable or function declaration
    /// in `items`.
    pub fn filtered_by_shadows<S: StatementView>(&self, items: &[S]) -> Self {
        let shadowed = collect_shadowed(items, self);
        if shadowed.is_empty() {
            return self.clone();
        }
        Self {
            direct: self
                .direct
                .iter()
                .filter(|name| !shadowed.contains(*name))
                .cloned()
                .collect(),
            namespaces: self
                .namespaces
                .iter()
                .filter(|name| !shadowed.contains(*name))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.namespaces.is_empty()
    }

    pub fn is_direct(&self, name: &str) -> bool {
        self.direct.contains(name)
    }

    pub fn is_namespace(&self, name: &str) -> bool {
        self.namespaces.contains(name)
    }
}

pub(crate) fn is_handle_import<S: StatementView>(item: &S, config: &HoistConfig) -> bool {
    item.import_decl()
        .map(|import| import.src.value.as_ref() == config.handle_module)
        .unwrap_or(false)
}

fn collect_shadowed<S: StatementView>(items: &[S], names: &TrackedNames) -> HashSet<String> {
    let tracked = |name: &str| names.is_direct(name) || names.is_namespace(name);
    let mut shadowed = HashSet::new();
    for item in items {
        if let Some(var) = item.var_decl() {
            for declarator in &var.decls {
                if let Pat::Ident(ident) = &declarator.name {
                    let name = ident.id.sym.as_ref();
                    if tracked(name) {
                        shadowed.insert(name.to_string());
                    }
                }
            }
        }
        if let Some(fn_decl) = item.fn_decl() {
            let name = fn_decl.ident.sym.as_ref();
            if tracked(name) {
                shadowed.insert(name.to_string());
            }
        }
    }
    shadowed
}
