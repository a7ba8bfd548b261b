//! Recognition of registration statements: expression statements whose
//! expression is a (possibly chained) `register`/`unregister` call rooted at
//! a tracked receiver, e.g. `doubles.register("./a").unregister("./b")`.

use swc_ecma_ast::*;

use crate::config::{HoistConfig, LOAD_ACTUAL_METHOD};
use crate::names::TrackedNames;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMethod {
    Register,
    Unregister,
}

/// One call of a registration chain. Links are collected outermost-first,
/// i.e. reverse source order; the statement is always moved as a whole, so
/// link order only matters to set computations, which are order-free.
#[derive(Debug, Clone, Copy)]
pub struct ChainLink<'a> {
    pub method: RegistrationMethod,
    pub call: &'a CallExpr,
}

impl<'a> ChainLink<'a> {
    pub fn first_argument(&self) -> Option<&'a Expr> {
        self.call
            .args
            .first()
            .filter(|arg| arg.spread.is_none())
            .map(|arg| arg.expr.as_ref())
    }

    /// The factory closure of a register link, when present.
    pub fn factory(&self) -> Option<&'a Expr> {
        if self.method != RegistrationMethod::Register {
            return None;
        }
        let second = self.call.args.get(1).filter(|arg| arg.spread.is_none())?;
        match second.expr.as_ref() {
            expr @ (Expr::Arrow(_) | Expr::Fn(_)) => Some(expr),
            _ => None,
        }
    }

    /// Bare string-literal first argument, for diagnostics and rewriting.
    pub fn string_argument(&self) -> Option<String> {
        match self.first_argument()? {
            Expr::Lit(Lit::Str(value)) => Some(value.value.to_string()),
            _ => None,
        }
    }

    /// String first argument seen through `as`-casts: the specifier of the
    /// module this link targets, used to exclude its bindings from the
    /// factory allowance.
    pub fn target_specifier(&self) -> Option<String> {
        unwrap_string_literal(self.first_argument()?)
    }
}

fn unwrap_string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(value)) => Some(value.value.to_string()),
        Expr::TsAs(as_expr) => unwrap_string_literal(&as_expr.expr),
        _ => None,
    }
}

/// `(method, receiver)` when `call` goes through a property access named
/// `register` or `unregister`.
pub(crate) fn hoist_method_of(call: &CallExpr) -> Option<(RegistrationMethod, &Expr)> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Member(member) = callee.as_ref() else {
        return None;
    };
    let MemberProp::Ident(name) = &member.prop else {
        return None;
    };
    let method = match name.sym.as_ref() {
        crate::config::REGISTER_METHOD => RegistrationMethod::Register,
        crate::config::UNREGISTER_METHOD => RegistrationMethod::Unregister,
        _ => return None,
    };
    Some((method, member.obj.as_ref()))
}

/// The receiver predicate: a tracked identifier, `NS.<handle>` through a
/// tracked namespace, or — recursively — another chain link.
pub fn is_tracked_receiver(expr: &Expr, names: &TrackedNames, config: &HoistConfig) -> bool {
    match expr {
        Expr::Ident(ident) => names.is_direct(ident.sym.as_ref()),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return false;
            };
            if prop.sym.as_ref() != config.handle_name {
                return false;
            }
            matches!(member.obj.as_ref(), Expr::Ident(ns) if names.is_namespace(ns.sym.as_ref()))
        }
        Expr::Call(call) => match hoist_method_of(call) {
            Some((_, receiver)) => is_tracked_receiver(receiver, names, config),
            None => false,
        },
        _ => false,
    }
}

/// Whether `call` is `receiver.loadActual(...)` on a tracked receiver.
pub fn is_load_actual_call(call: &CallExpr, names: &TrackedNames, config: &HoistConfig) -> bool {
    let Callee::Expr(callee) = &call.callee else {
        return false;
    };
    let Expr::Member(member) = callee.as_ref() else {
        return false;
    };
    let MemberProp::Ident(name) = &member.prop else {
        return false;
    };
    name.sym.as_ref() == LOAD_ACTUAL_METHOD
        && is_tracked_receiver(member.obj.as_ref(), names, config)
}

/// The chain links of an already-recognized statement, without re-checking
/// the receiver. Empty when the statement is not a call chain at all.
pub fn chain_links(stmt: &Stmt) -> Vec<ChainLink<'_>> {
    let Stmt::Expr(expr_stmt) = stmt else {
        return Vec::new();
    };
    let mut links = Vec::new();
    let mut cursor = expr_stmt.expr.as_ref();
    while let Expr::Call(call) = cursor {
        let Some((method, receiver)) = hoist_method_of(call) else {
            break;
        };
        links.push(ChainLink { method, call });
        cursor = receiver;
    }
    links
}

/// Bare identifier arguments of every link of every statement. The callers
/// filter: mock-prefixed ones seed convention hoisting, and the full set
/// selects referenced pure constants.
pub(crate) fn argument_identifiers<'a>(
    stmts: impl IntoIterator<Item = &'a Stmt>,
) -> std::collections::HashSet<String> {
    let mut out = std::collections::HashSet::new();
    for stmt in stmts {
        for link in chain_links(stmt) {
            for arg in &link.call.args {
                if arg.spread.is_none() {
                    if let Expr::Ident(ident) = arg.expr.as_ref() {
                        out.insert(ident.sym.to_string());
                    }
                }
            }
        }
    }
    out
}

/// Whether `stmt` is a registration statement under `names`.
pub fn is_registration_stmt(stmt: &Stmt, names: &TrackedNames, config: &HoistConfig) -> bool {
    let Stmt::Expr(expr_stmt) = stmt else {
        return false;
    };
    let Expr::Call(call) = expr_stmt.expr.as_ref() else {
        return false;
    };
    match hoist_method_of(call) {
        Some((_, receiver)) => is_tracked_receiver(receiver, names, config),
        None => false,
    }
}
