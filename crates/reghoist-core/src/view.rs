//! A uniform view over the two kinds of statement list the pass rewrites:
//! a module's top level (`ModuleItem`) and a block body (`Stmt`). Module
//! items additionally see through `export` wrappers, so an exported `const`
//! participates in purity and shadowing like a plain one.

use swc_ecma_ast::*;

pub(crate) trait StatementView: Clone {
    fn as_stmt(&self) -> Option<&Stmt>;
    fn var_decl(&self) -> Option<&VarDecl>;
    fn fn_decl(&self) -> Option<&FnDecl>;
    fn import_decl(&self) -> Option<&ImportDecl>;
    /// Apply `f` to the plain-statement form, leaving module declarations
    /// untouched.
    fn map_stmt(self, f: impl FnOnce(Stmt) -> Stmt) -> Self;
}

impl StatementView for Stmt {
    fn as_stmt(&self) -> Option<&Stmt> {
        Some(self)
    }

    fn var_decl(&self) -> Option<&VarDecl> {
        match self {
            Stmt::Decl(Decl::Var(var)) => Some(var),
            _ => None,
        }
    }

    fn fn_decl(&self) -> Option<&FnDecl> {
        match self {
            Stmt::Decl(Decl::Fn(fn_decl)) => Some(fn_decl),
            _ => None,
        }
    }

    fn import_decl(&self) -> Option<&ImportDecl> {
        None
    }

    fn map_stmt(self, f: impl FnOnce(Stmt) -> Stmt) -> Self {
        f(self)
    }
}

impl StatementView for ModuleItem {
    fn as_stmt(&self) -> Option<&Stmt> {
        match self {
            ModuleItem::Stmt(stmt) => Some(stmt),
            ModuleItem::ModuleDecl(_) => None,
        }
    }

    fn var_decl(&self) -> Option<&VarDecl> {
        match self {
            ModuleItem::Stmt(stmt) => stmt.var_decl(),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Var(var) => Some(var),
                _ => None,
            },
            ModuleItem::ModuleDecl(_) => None,
        }
    }

    fn fn_decl(&self) -> Option<&FnDecl> {
        match self {
            ModuleItem::Stmt(stmt) => stmt.fn_decl(),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Fn(fn_decl) => Some(fn_decl),
                _ => None,
            },
            ModuleItem::ModuleDecl(_) => None,
        }
    }

    fn import_decl(&self) -> Option<&ImportDecl> {
        match self {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(import),
            _ => None,
        }
    }

    fn map_stmt(self, f: impl FnOnce(Stmt) -> Stmt) -> Self {
        match self {
            ModuleItem::Stmt(stmt) => ModuleItem::Stmt(f(stmt)),
            other => other,
        }
    }
}
