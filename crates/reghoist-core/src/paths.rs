//! Rewriting string module paths into instance-tree expressions.
//!
//! Relative specifiers become accesses rooted at the current module's
//! parent: `"./a/b"` → `script.Parent.a.b`, one extra `.Parent` per leading
//! `..`, string indexing for segments that are not valid identifiers, and a
//! trailing `index` segment denotes the containing unit itself. Non-relative
//! specifiers go through the optional resolver and become
//! `game.GetService(...)` probe chains; a miss leaves the literal untouched.

use swc_ecma_ast::*;
use swc_ecma_quote::swc_common::DUMMY_SP;

use crate::calls::{hoist_method_of, is_load_actual_call};
use crate::config::{HoistConfig, STRIPPABLE_EXTENSIONS};
use crate::names::TrackedNames;

/// Maps a module specifier to platform path segments, e.g. through the
/// project's file-system layout. Absence of a mapping is a legal outcome and
/// never an error.
pub trait PathResolver {
    fn resolve(&self, specifier: &str, containing_file: &str) -> Option<Vec<String>>;
}

pub(crate) struct PathRewriter<'a> {
    pub config: &'a HoistConfig,
    pub names: &'a TrackedNames,
    pub resolver: Option<&'a dyn PathResolver>,
    pub containing_file: &'a str,
}

impl PathRewriter<'_> {
    /// Rewrite the module-path arguments of a recognized registration
    /// statement: the string first argument of every chain link, and
    /// `loadActual` string arguments anywhere inside the other arguments.
    pub fn rewrite_statement(&self, stmt: Stmt) -> Stmt {
        match stmt {
            Stmt::Expr(expr_stmt) => match *expr_stmt.expr {
                Expr::Call(call) => Stmt::Expr(ExprStmt {
                    span: expr_stmt.span,
                    expr: Box::new(Expr::Call(self.rewrite_chain(call))),
                }),
                other => Stmt::Expr(ExprStmt {
                    span: expr_stmt.span,
                    expr: Box::new(other),
                }),
            },
            other => other,
        }
    }

    fn rewrite_chain(&self, mut call: CallExpr) -> CallExpr {
        if hoist_method_of(&call).is_none() {
            return call;
        }

        call.args = call
            .args
            .into_iter()
            .enumerate()
            .map(|(index, arg)| {
                if arg.spread.is_some() {
                    return arg;
                }
                let expr = *arg.expr;
                let expr = if index == 0 {
                    self.rewrite_specifier_argument(expr)
                } else {
                    self.rewrite_load_actual_in(expr)
                };
                ExprOrSpread {
                    spread: None,
                    expr: Box::new(expr),
                }
            })
            .collect();

        // Descend into the inner links of a chain.
        if let Callee::Expr(callee) = call.callee {
            let callee = match *callee {
                Expr::Member(mut member) => {
                    member.obj = Box::new(match *member.obj {
                        Expr::Call(inner) => Expr::Call(self.rewrite_chain(inner)),
                        other => other,
                    });
                    Expr::Member(member)
                }
                other => other,
            };
            call.callee = Callee::Expr(Box::new(callee));
        }

        call
    }

    /// Only a bare string literal is rewritten; casts and non-strings are
    /// left as found.
    fn rewrite_specifier_argument(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Lit(Lit::Str(value)) => match self.specifier_expr(value.value.as_ref()) {
                Some(rewritten) => rewritten,
                None => Expr::Lit(Lit::Str(value)),
            },
            other => other,
        }
    }

    fn specifier_expr(&self, specifier: &str) -> Option<Expr> {
        if specifier.starts_with('.') {
            return relative_path_expr(specifier);
        }
        let resolver = self.resolver?;
        let segments = resolver.resolve(specifier, self.containing_file)?;
        service_path_expr(&segments)
    }

    /// Structural descent over a factory (or any other trailing argument)
    /// rewriting `loadActual("...")` string arguments.
    fn rewrite_load_actual_in(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Call(mut call) => {
                if is_load_actual_call(&call, self.names, self.config) && call.args.len() == 1 {
                    call.args = call
                        .args
                        .into_iter()
                        .map(|arg| match (arg.spread, *arg.expr) {
                            (None, inner) => ExprOrSpread {
                                spread: None,
                                expr: Box::new(self.rewrite_specifier_argument(inner)),
                            },
                            (spread, inner) => ExprOrSpread {
                                spread,
                                expr: Box::new(inner),
                            },
                        })
                        .collect();
                    return Expr::Call(call);
                }
                if let Callee::Expr(callee) = call.callee {
                    call.callee = Callee::Expr(Box::new(self.rewrite_load_actual_in(*callee)));
                }
                call.args = call
                    .args
                    .into_iter()
                    .map(|arg| ExprOrSpread {
                        spread: arg.spread,
                        expr: Box::new(self.rewrite_load_actual_in(*arg.expr)),
                    })
                    .collect();
                Expr::Call(call)
            }
            Expr::Arrow(mut arrow) => {
                arrow.body = Box::new(match *arrow.body {
                    BlockStmtOrExpr::BlockStmt(block) => {
                        BlockStmtOrExpr::BlockStmt(self.rewrite_load_actual_in_block(block))
                    }
                    BlockStmtOrExpr::Expr(body) => {
                        BlockStmtOrExpr::Expr(Box::new(self.rewrite_load_actual_in(*body)))
                    }
                });
                Expr::Arrow(arrow)
            }
            Expr::Fn(mut fn_expr) => {
                if let Some(body) = fn_expr.function.body.take() {
                    fn_expr.function.body = Some(self.rewrite_load_actual_in_block(body));
                }
                Expr::Fn(fn_expr)
            }
            Expr::Object(object) => Expr::Object(ObjectLit {
                span: object.span,
                props: object
                    .props
                    .into_iter()
                    .map(|prop| self.rewrite_load_actual_in_prop(prop))
                    .collect(),
            }),
            Expr::Array(array) => Expr::Array(ArrayLit {
                span: array.span,
                elems: array
                    .elems
                    .into_iter()
                    .map(|elem| {
                        elem.map(|element| ExprOrSpread {
                            spread: element.spread,
                            expr: Box::new(self.rewrite_load_actual_in(*element.expr)),
                        })
                    })
                    .collect(),
            }),
            Expr::Paren(mut paren) => {
                paren.expr = Box::new(self.rewrite_load_actual_in(*paren.expr));
                Expr::Paren(paren)
            }
            Expr::Seq(mut seq) => {
                seq.exprs = seq
                    .exprs
                    .into_iter()
                    .map(|inner| Box::new(self.rewrite_load_actual_in(*inner)))
                    .collect();
                Expr::Seq(seq)
            }
            Expr::Cond(mut cond) => {
                cond.test = Box::new(self.rewrite_load_actual_in(*cond.test));
                cond.cons = Box::new(self.rewrite_load_actual_in(*cond.cons));
                cond.alt = Box::new(self.rewrite_load_actual_in(*cond.alt));
                Expr::Cond(cond)
            }
            Expr::Bin(mut bin) => {
                bin.left = Box::new(self.rewrite_load_actual_in(*bin.left));
                bin.right = Box::new(self.rewrite_load_actual_in(*bin.right));
                Expr::Bin(bin)
            }
            Expr::Unary(mut unary) => {
                unary.arg = Box::new(self.rewrite_load_actual_in(*unary.arg));
                Expr::Unary(unary)
            }
            Expr::Await(mut await_expr) => {
                await_expr.arg = Box::new(self.rewrite_load_actual_in(*await_expr.arg));
                Expr::Await(await_expr)
            }
            Expr::Member(mut member) => {
                member.obj = Box::new(self.rewrite_load_actual_in(*member.obj));
                Expr::Member(member)
            }
            Expr::Assign(mut assign) => {
                assign.right = Box::new(self.rewrite_load_actual_in(*assign.right));
                Expr::Assign(assign)
            }
            Expr::TsAs(mut as_expr) => {
                as_expr.expr = Box::new(self.rewrite_load_actual_in(*as_expr.expr));
                Expr::TsAs(as_expr)
            }
            Expr::TsNonNull(mut non_null) => {
                non_null.expr = Box::new(self.rewrite_load_actual_in(*non_null.expr));
                Expr::TsNonNull(non_null)
            }
            Expr::TsConstAssertion(mut assertion) => {
                assertion.expr = Box::new(self.rewrite_load_actual_in(*assertion.expr));
                Expr::TsConstAssertion(assertion)
            }
            Expr::TsTypeAssertion(mut assertion) => {
                assertion.expr = Box::new(self.rewrite_load_actual_in(*assertion.expr));
                Expr::TsTypeAssertion(assertion)
            }
            Expr::TsSatisfies(mut satisfies) => {
                satisfies.expr = Box::new(self.rewrite_load_actual_in(*satisfies.expr));
                Expr::TsSatisfies(satisfies)
            }
            Expr::Tpl(mut tpl) => {
                tpl.exprs = tpl
                    .exprs
                    .into_iter()
                    .map(|inner| Box::new(self.rewrite_load_actual_in(*inner)))
                    .collect();
                Expr::Tpl(tpl)
            }
            other => other,
        }
    }

    fn rewrite_load_actual_in_prop(&self, prop: PropOrSpread) -> PropOrSpread {
        match prop {
            PropOrSpread::Spread(spread) => PropOrSpread::Spread(SpreadElement {
                dot3_token: spread.dot3_token,
                expr: Box::new(self.rewrite_load_actual_in(*spread.expr)),
            }),
            PropOrSpread::Prop(prop) => PropOrSpread::Prop(Box::new(match *prop {
                Prop::KeyValue(kv) => Prop::KeyValue(KeyValueProp {
                    key: kv.key,
                    value: Box::new(self.rewrite_load_actual_in(*kv.value)),
                }),
                Prop::Method(mut method) => {
                    if let Some(body) = method.function.body.take() {
                        method.function.body = Some(self.rewrite_load_actual_in_block(body));
                    }
                    Prop::Method(method)
                }
                Prop::Getter(mut getter) => {
                    if let Some(body) = getter.body.take() {
                        getter.body = Some(self.rewrite_load_actual_in_block(body));
                    }
                    Prop::Getter(getter)
                }
                Prop::Setter(mut setter) => {
                    if let Some(body) = setter.body.take() {
                        setter.body = Some(self.rewrite_load_actual_in_block(body));
                    }
                    Prop::Setter(setter)
                }
                other => other,
            })),
        }
    }

    fn rewrite_load_actual_in_block(&self, block: BlockStmt) -> BlockStmt {
        BlockStmt {
            span: block.span,
            stmts: block
                .stmts
                .into_iter()
                .map(|stmt| self.rewrite_load_actual_in_stmt(stmt))
                .collect(),
        }
    }

    fn rewrite_load_actual_in_stmt(&self, stmt: Stmt) -> Stmt {
        match stmt {
            Stmt::Expr(expr_stmt) => Stmt::Expr(ExprStmt {
                span: expr_stmt.span,
                expr: Box::new(self.rewrite_load_actual_in(*expr_stmt.expr)),
            }),
            Stmt::Return(ret) => Stmt::Return(ReturnStmt {
                span: ret.span,
                arg: ret
                    .arg
                    .map(|arg| Box::new(self.rewrite_load_actual_in(*arg))),
            }),
            Stmt::Block(block) => Stmt::Block(self.rewrite_load_actual_in_block(block)),
            Stmt::Decl(Decl::Var(mut var)) => {
                var.decls = var
                    .decls
                    .into_iter()
                    .map(|mut declarator| {
                        declarator.init = declarator
                            .init
                            .map(|init| Box::new(self.rewrite_load_actual_in(*init)));
                        declarator
                    })
                    .collect();
                Stmt::Decl(Decl::Var(var))
            }
            Stmt::If(mut branch) => {
                branch.test = Box::new(self.rewrite_load_actual_in(*branch.test));
                branch.cons = Box::new(self.rewrite_load_actual_in_stmt(*branch.cons));
                branch.alt = branch
                    .alt
                    .map(|alt| Box::new(self.rewrite_load_actual_in_stmt(*alt)));
                Stmt::If(branch)
            }
            Stmt::Try(mut try_stmt) => {
                try_stmt.block = self.rewrite_load_actual_in_block(try_stmt.block);
                try_stmt.handler = try_stmt.handler.map(|mut handler| {
                    handler.body = self.rewrite_load_actual_in_block(handler.body);
                    handler
                });
                try_stmt.finalizer = try_stmt
                    .finalizer
                    .map(|finalizer| self.rewrite_load_actual_in_block(finalizer));
                Stmt::Try(try_stmt)
            }
            other => other,
        }
    }
}

/// `"./a/b-c/index"` → `script.Parent.a["b-c"]`. `None` means "leave the
/// literal as it is", e.g. for `"./"` or a non-relative specifier.
fn relative_path_expr(specifier: &str) -> Option<Expr> {
    if !specifier.starts_with('.') {
        return None;
    }
    let trimmed = specifier.trim_end_matches('/');
    let stripped = strip_extension(trimmed);

    let mut base = member(ident_expr("script"), "Parent");
    let segments: Vec<&str> = stripped.split('/').collect();
    let mut index = 0;
    while index < segments.len() {
        match segments[index] {
            // Current directory: already at script.Parent.
            "." => {}
            ".." => base = member(base, "Parent"),
            _ => break,
        }
        index += 1;
    }

    let mut tail = &segments[index..];
    if tail.last() == Some(&"index") {
        tail = &tail[..tail.len() - 1];
    }
    if tail.is_empty() {
        return None;
    }

    let mut result = base;
    for segment in tail {
        result = if is_valid_identifier(segment) {
            member(result, segment)
        } else {
            index_str(result, segment)
        };
    }
    Some(result)
}

/// `["Svc", "a", "b"]` → `game.GetService("Svc")!.FindFirstChild("a")!
/// .FindFirstChild("b") as ModuleScript`.
fn service_path_expr(segments: &[String]) -> Option<Expr> {
    let (service, rest) = segments.split_first()?;
    let base = call(member(ident_expr("game"), "GetService"), str_lit(service));

    let chained = rest.iter().fold(base, |accumulator, segment| {
        let receiver = Expr::TsNonNull(TsNonNullExpr {
            span: DUMMY_SP,
            expr: Box::new(accumulator),
        });
        call(member(receiver, "FindFirstChild"), str_lit(segment))
    });

    if rest.is_empty() {
        return Some(chained);
    }
    Some(Expr::TsAs(TsAsExpr {
        span: DUMMY_SP,
        expr: Box::new(chained),
        type_ann: Box::new(TsType::TsTypeRef(TsTypeRef {
            span: DUMMY_SP,
            type_name: TsEntityName::Ident(Ident::new("ModuleScript".into(), DUMMY_SP)),
            type_params: None,
        })),
    }))
}

fn strip_extension(path: &str) -> &str {
    for extension in STRIPPABLE_EXTENSIONS {
        if let Some(stripped) = path.strip_suffix(extension) {
            return stripped;
        }
    }
    path
}

fn is_valid_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

fn ident_expr(name: &str) -> Expr {
    Expr::Ident(Ident::new(name.into(), DUMMY_SP))
}

fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Ident(Ident::new(prop.into(), DUMMY_SP)),
    })
}

fn index_str(obj: Expr, key: &str) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: Box::new(str_lit(key)),
        }),
    })
}

fn str_lit(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }))
}

fn call(callee: Expr, argument: Expr) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        callee: Callee::Expr(Box::new(callee)),
        args: vec![ExprOrSpread {
            spread: None,
            expr: Box::new(argument),
        }],
        type_args: None,
    })
}
