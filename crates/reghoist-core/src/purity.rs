//! Syntactic purity: whether evaluating an expression can have a side
//! effect or read mutable environment state. This is a closed grammar — a
//! bare identifier is never pure, whatever it names.

use swc_ecma_ast::*;

pub fn is_pure(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(_) => true,
        Expr::Tpl(tpl) => tpl.exprs.iter().all(|expr| is_pure(expr)),
        // Creating a closure has no immediate effect.
        Expr::Arrow(_) | Expr::Fn(_) => true,
        Expr::Unary(unary) => match unary.op {
            // `typeof x` and `delete x` observe or mutate the environment.
            UnaryOp::TypeOf | UnaryOp::Delete => false,
            _ => is_pure(&unary.arg),
        },
        Expr::Bin(bin) => is_pure(&bin.left) && is_pure(&bin.right),
        Expr::Cond(cond) => is_pure(&cond.test) && is_pure(&cond.cons) && is_pure(&cond.alt),
        Expr::Array(array) => array.elems.iter().all(|elem| match elem {
            Some(element) => is_pure(&element.expr),
            None => true,
        }),
        Expr::Object(object) => object.props.iter().all(is_pure_prop),
        Expr::Paren(paren) => is_pure(&paren.expr),
        Expr::TsAs(as_expr) => is_pure(&as_expr.expr),
        Expr::TsTypeAssertion(assertion) => is_pure(&assertion.expr),
        Expr::TsConstAssertion(assertion) => is_pure(&assertion.expr),
        Expr::TsNonNull(non_null) => is_pure(&non_null.expr),
        Expr::TsSatisfies(satisfies) => is_pure(&satisfies.expr),
        // Everything else — identifier reads, member access, calls,
        // construction, await, tagged templates, update expressions,
        // classes — is impure.
        _ => false,
    }
}

fn is_pure_prop(prop: &PropOrSpread) -> bool {
    match prop {
        PropOrSpread::Spread(spread) => is_pure(&spread.expr),
        PropOrSpread::Prop(prop) => match prop.as_ref() {
            Prop::KeyValue(kv) => {
                let key_pure = match &kv.key {
                    PropName::Computed(computed) => is_pure(&computed.expr),
                    _ => true,
                };
                key_pure && is_pure(&kv.value)
            }
            // `{x}` is a disguised reference.
            Prop::Shorthand(_) => false,
            // Defining an accessor or method creates a deferred closure.
            Prop::Getter(_) | Prop::Setter(_) | Prop::Method(_) => true,
            Prop::Assign(_) => false,
        },
    }
}

/// Names of `const`-declared bindings in `decls` whose initializers all
/// satisfy the purity grammar. A declaration statement is a single unit: if
/// any of its names is impure (or not a simple identifier), none of its
/// names qualify.
pub fn collect_pure_constants<'a>(
    decls: impl Iterator<Item = &'a VarDecl>,
) -> std::collections::HashSet<String> {
    let mut names = std::collections::HashSet::new();
    for decl in decls {
        if decl.kind != VarDeclKind::Const {
            continue;
        }
        let mut decl_names = Vec::new();
        let mut all_pure = true;
        for declarator in &decl.decls {
            let simple_name = match &declarator.name {
                Pat::Ident(name) => Some(name.id.sym.to_string()),
                _ => None,
            };
            let init_pure = declarator
                .init
                .as_deref()
                .map(is_pure)
                .unwrap_or(false);
            match (simple_name, init_pure) {
                (Some(name), true) => decl_names.push(name),
                _ => {
                    all_pure = false;
                    break;
                }
            }
        }
        if all_pure {
            names.extend(decl_names);
        }
    }
    names
}
