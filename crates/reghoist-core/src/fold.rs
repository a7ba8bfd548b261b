//! Structural descent into nested statement lists.
//!
//! The hoisting engine applies to the module top level and to every block
//! body — function and arrow bodies, `if`/`try`/`catch`/loop blocks, bare
//! blocks, callback bodies. This fold walks the tree depth-first, rebuilding
//! it and handing every `BlockStmt`'s statement list to the pass. Only block
//! lists are handed over; a single-statement `if` body or a `switch` case
//! has no list to reorder.

use swc_ecma_ast::*;

use crate::error::Result;

/// The per-list rewrite, supplied by the pass. Must not descend by itself;
/// the fold has already rewritten everything nested when it calls this.
pub(crate) trait BlockRewriter {
    fn rewrite_stmt_list(&self, stmts: Vec<Stmt>) -> Result<Vec<Stmt>>;
}

pub(crate) fn fold_module_item<R: BlockRewriter>(r: &R, item: ModuleItem) -> Result<ModuleItem> {
    Ok(match item {
        ModuleItem::Stmt(stmt) => ModuleItem::Stmt(fold_stmt(r, stmt)?),
        ModuleItem::ModuleDecl(decl) => ModuleItem::ModuleDecl(match decl {
            ModuleDecl::ExportDecl(export) => ModuleDecl::ExportDecl(ExportDecl {
                span: export.span,
                decl: fold_decl(r, export.decl)?,
            }),
            ModuleDecl::ExportDefaultDecl(mut export) => {
                export.decl = match export.decl {
                    DefaultDecl::Fn(mut fn_expr) => {
                        fn_expr.function = Box::new(fold_function(r, *fn_expr.function)?);
                        DefaultDecl::Fn(fn_expr)
                    }
                    DefaultDecl::Class(mut class_expr) => {
                        class_expr.class = Box::new(fold_class(r, *class_expr.class)?);
                        DefaultDecl::Class(class_expr)
                    }
                    other => other,
                };
                ModuleDecl::ExportDefaultDecl(export)
            }
            ModuleDecl::ExportDefaultExpr(mut export) => {
                export.expr = Box::new(fold_expr(r, *export.expr)?);
                ModuleDecl::ExportDefaultExpr(export)
            }
            other => other,
        }),
    })
}

pub(crate) fn fold_block<R: BlockRewriter>(r: &R, block: BlockStmt) -> Result<BlockStmt> {
    let stmts = fold_stmts(r, block.stmts)?;
    Ok(BlockStmt {
        span: block.span,
        stmts: r.rewrite_stmt_list(stmts)?,
    })
}

fn fold_stmts<R: BlockRewriter>(r: &R, stmts: Vec<Stmt>) -> Result<Vec<Stmt>> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        out.push(fold_stmt(r, stmt)?);
    }
    Ok(out)
}

fn fold_opt_expr<R: BlockRewriter>(r: &R, expr: Option<Box<Expr>>) -> Result<Option<Box<Expr>>> {
    Ok(match expr {
        Some(expr) => Some(Box::new(fold_expr(r, *expr)?)),
        None => None,
    })
}

fn fold_boxed_exprs<R: BlockRewriter>(r: &R, exprs: Vec<Box<Expr>>) -> Result<Vec<Box<Expr>>> {
    let mut out = Vec::with_capacity(exprs.len());
    for expr in exprs {
        out.push(Box::new(fold_expr(r, *expr)?));
    }
    Ok(out)
}

fn fold_args<R: BlockRewriter>(r: &R, args: Vec<ExprOrSpread>) -> Result<Vec<ExprOrSpread>> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        out.push(ExprOrSpread {
            spread: arg.spread,
            expr: Box::new(fold_expr(r, *arg.expr)?),
        });
    }
    Ok(out)
}

fn fold_stmt<R: BlockRewriter>(r: &R, stmt: Stmt) -> Result<Stmt> {
    Ok(match stmt {
        Stmt::Block(block) => Stmt::Block(fold_block(r, block)?),
        Stmt::With(mut with) => {
            with.obj = Box::new(fold_expr(r, *with.obj)?);
            with.body = Box::new(fold_stmt(r, *with.body)?);
            Stmt::With(with)
        }
        Stmt::Return(mut ret) => {
            ret.arg = fold_opt_expr(r, ret.arg)?;
            Stmt::Return(ret)
        }
        Stmt::Labeled(mut labeled) => {
            labeled.body = Box::new(fold_stmt(r, *labeled.body)?);
            Stmt::Labeled(labeled)
        }
        Stmt::If(mut branch) => {
            branch.test = Box::new(fold_expr(r, *branch.test)?);
            branch.cons = Box::new(fold_stmt(r, *branch.cons)?);
            branch.alt = match branch.alt {
                Some(alt) => Some(Box::new(fold_stmt(r, *alt)?)),
                None => None,
            };
            Stmt::If(branch)
        }
        Stmt::Switch(mut switch) => {
            switch.discriminant = Box::new(fold_expr(r, *switch.discriminant)?);
            let mut cases = Vec::with_capacity(switch.cases.len());
            for mut case in switch.cases {
                case.test = fold_opt_expr(r, case.test)?;
                case.cons = fold_stmts(r, case.cons)?;
                cases.push(case);
            }
            switch.cases = cases;
            Stmt::Switch(switch)
        }
        Stmt::Throw(mut throw) => {
            throw.arg = Box::new(fold_expr(r, *throw.arg)?);
            Stmt::Throw(throw)
        }
        Stmt::Try(mut try_stmt) => {
            try_stmt.block = fold_block(r, try_stmt.block)?;
            try_stmt.handler = match try_stmt.handler {
                Some(mut handler) => {
                    handler.body = fold_block(r, handler.body)?;
                    Some(handler)
                }
                None => None,
            };
            try_stmt.finalizer = match try_stmt.finalizer {
                Some(finalizer) => Some(fold_block(r, finalizer)?),
                None => None,
            };
            Stmt::Try(try_stmt)
        }
        Stmt::While(mut while_stmt) => {
            while_stmt.test = Box::new(fold_expr(r, *while_stmt.test)?);
            while_stmt.body = Box::new(fold_stmt(r, *while_stmt.body)?);
            Stmt::While(while_stmt)
        }
        Stmt::DoWhile(mut do_while) => {
            do_while.body = Box::new(fold_stmt(r, *do_while.body)?);
            do_while.test = Box::new(fold_expr(r, *do_while.test)?);
            Stmt::DoWhile(do_while)
        }
        Stmt::For(mut for_stmt) => {
            for_stmt.init = match for_stmt.init {
                Some(VarDeclOrExpr::VarDecl(var)) => {
                    Some(VarDeclOrExpr::VarDecl(Box::new(fold_var_decl(r, *var)?)))
                }
                Some(VarDeclOrExpr::Expr(expr)) => {
                    Some(VarDeclOrExpr::Expr(Box::new(fold_expr(r, *expr)?)))
                }
                None => None,
            };
            for_stmt.test = fold_opt_expr(r, for_stmt.test)?;
            for_stmt.update = fold_opt_expr(r, for_stmt.update)?;
            for_stmt.body = Box::new(fold_stmt(r, *for_stmt.body)?);
            Stmt::For(for_stmt)
        }
        Stmt::ForIn(mut for_in) => {
            for_in.right = Box::new(fold_expr(r, *for_in.right)?);
            for_in.body = Box::new(fold_stmt(r, *for_in.body)?);
            Stmt::ForIn(for_in)
        }
        Stmt::ForOf(mut for_of) => {
            for_of.right = Box::new(fold_expr(r, *for_of.right)?);
            for_of.body = Box::new(fold_stmt(r, *for_of.body)?);
            Stmt::ForOf(for_of)
        }
        Stmt::Decl(decl) => Stmt::Decl(fold_decl(r, decl)?),
        Stmt::Expr(mut expr_stmt) => {
            expr_stmt.expr = Box::new(fold_expr(r, *expr_stmt.expr)?);
            Stmt::Expr(expr_stmt)
        }
        other @ (Stmt::Empty(_) | Stmt::Debugger(_) | Stmt::Break(_) | Stmt::Continue(_)) => other,
    })
}

fn fold_decl<R: BlockRewriter>(r: &R, decl: Decl) -> Result<Decl> {
    Ok(match decl {
        Decl::Fn(mut fn_decl) => {
            fn_decl.function = Box::new(fold_function(r, *fn_decl.function)?);
            Decl::Fn(fn_decl)
        }
        Decl::Var(var) => Decl::Var(Box::new(fold_var_decl(r, *var)?)),
        Decl::Using(mut using) => {
            using.decls = fold_declarators(r, using.decls)?;
            Decl::Using(using)
        }
        Decl::Class(mut class_decl) => {
            class_decl.class = Box::new(fold_class(r, *class_decl.class)?);
            Decl::Class(class_decl)
        }
        other => other,
    })
}

fn fold_var_decl<R: BlockRewriter>(r: &R, mut var: VarDecl) -> Result<VarDecl> {
    var.decls = fold_declarators(r, var.decls)?;
    Ok(var)
}

fn fold_declarators<R: BlockRewriter>(
    r: &R,
    declarators: Vec<VarDeclarator>,
) -> Result<Vec<VarDeclarator>> {
    let mut out = Vec::with_capacity(declarators.len());
    for mut declarator in declarators {
        declarator.name = fold_pat(r, declarator.name)?;
        declarator.init = fold_opt_expr(r, declarator.init)?;
        out.push(declarator);
    }
    Ok(out)
}

fn fold_function<R: BlockRewriter>(r: &R, mut function: Function) -> Result<Function> {
    let mut params = Vec::with_capacity(function.params.len());
    for mut param in function.params {
        param.pat = fold_pat(r, param.pat)?;
        params.push(param);
    }
    function.params = params;
    function.body = match function.body {
        Some(body) => Some(fold_block(r, body)?),
        None => None,
    };
    Ok(function)
}

fn fold_class<R: BlockRewriter>(r: &R, mut class: Class) -> Result<Class> {
    class.super_class = fold_opt_expr(r, class.super_class)?;
    let mut members = Vec::with_capacity(class.body.len());
    for member in class.body {
        members.push(match member {
            ClassMember::Constructor(mut ctor) => {
                ctor.body = match ctor.body {
                    Some(body) => Some(fold_block(r, body)?),
                    None => None,
                };
                ClassMember::Constructor(ctor)
            }
            ClassMember::Method(mut method) => {
                method.function = Box::new(fold_function(r, *method.function)?);
                ClassMember::Method(method)
            }
            ClassMember::PrivateMethod(mut method) => {
                method.function = Box::new(fold_function(r, *method.function)?);
                ClassMember::PrivateMethod(method)
            }
            ClassMember::ClassProp(mut prop) => {
                prop.value = fold_opt_expr(r, prop.value)?;
                ClassMember::ClassProp(prop)
            }
            ClassMember::PrivateProp(mut prop) => {
                prop.value = fold_opt_expr(r, prop.value)?;
                ClassMember::PrivateProp(prop)
            }
            ClassMember::StaticBlock(mut block) => {
                block.body = fold_block(r, block.body)?;
                ClassMember::StaticBlock(block)
            }
            other => other,
        });
    }
    class.body = members;
    Ok(class)
}

fn fold_pat<R: BlockRewriter>(r: &R, pat: Pat) -> Result<Pat> {
    Ok(match pat {
        Pat::Array(mut array) => {
            let mut elems = Vec::with_capacity(array.elems.len());
            for elem in array.elems {
                elems.push(match elem {
                    Some(pat) => Some(fold_pat(r, pat)?),
                    None => None,
                });
            }
            array.elems = elems;
            Pat::Array(array)
        }
        Pat::Rest(mut rest) => {
            rest.arg = Box::new(fold_pat(r, *rest.arg)?);
            Pat::Rest(rest)
        }
        Pat::Object(mut object) => {
            let mut props = Vec::with_capacity(object.props.len());
            for prop in object.props {
                props.push(match prop {
                    ObjectPatProp::KeyValue(mut kv) => {
                        kv.value = Box::new(fold_pat(r, *kv.value)?);
                        ObjectPatProp::KeyValue(kv)
                    }
                    ObjectPatProp::Assign(mut assign) => {
                        assign.value = fold_opt_expr(r, assign.value)?;
                        ObjectPatProp::Assign(assign)
                    }
                    ObjectPatProp::Rest(mut rest) => {
                        rest.arg = Box::new(fold_pat(r, *rest.arg)?);
                        ObjectPatProp::Rest(rest)
                    }
                });
            }
            object.props = props;
            Pat::Object(object)
        }
        Pat::Assign(mut assign) => {
            assign.left = Box::new(fold_pat(r, *assign.left)?);
            assign.right = Box::new(fold_expr(r, *assign.right)?);
            Pat::Assign(assign)
        }
        Pat::Expr(expr) => Pat::Expr(Box::new(fold_expr(r, *expr)?)),
        other => other,
    })
}

fn fold_expr<R: BlockRewriter>(r: &R, expr: Expr) -> Result<Expr> {
    Ok(match expr {
        Expr::Array(mut array) => {
            let mut elems = Vec::with_capacity(array.elems.len());
            for elem in array.elems {
                elems.push(match elem {
                    Some(element) => Some(ExprOrSpread {
                        spread: element.spread,
                        expr: Box::new(fold_expr(r, *element.expr)?),
                    }),
                    None => None,
                });
            }
            array.elems = elems;
            Expr::Array(array)
        }
        Expr::Object(mut object) => {
            let mut props = Vec::with_capacity(object.props.len());
            for prop in object.props {
                props.push(match prop {
                    PropOrSpread::Spread(mut spread) => {
                        spread.expr = Box::new(fold_expr(r, *spread.expr)?);
                        PropOrSpread::Spread(spread)
                    }
                    PropOrSpread::Prop(prop) => PropOrSpread::Prop(Box::new(match *prop {
                        Prop::KeyValue(mut kv) => {
                            kv.value = Box::new(fold_expr(r, *kv.value)?);
                            Prop::KeyValue(kv)
                        }
                        Prop::Assign(mut assign) => {
                            assign.value = Box::new(fold_expr(r, *assign.value)?);
                            Prop::Assign(assign)
                        }
                        Prop::Getter(mut getter) => {
                            getter.body = match getter.body {
                                Some(body) => Some(fold_block(r, body)?),
                                None => None,
                            };
                            Prop::Getter(getter)
                        }
                        Prop::Setter(mut setter) => {
                            setter.body = match setter.body {
                                Some(body) => Some(fold_block(r, body)?),
                                None => None,
                            };
                            Prop::Setter(setter)
                        }
                        Prop::Method(mut method) => {
                            method.function = Box::new(fold_function(r, *method.function)?);
                            Prop::Method(method)
                        }
                        other @ Prop::Shorthand(_) => other,
                    })),
                });
            }
            object.props = props;
            Expr::Object(object)
        }
        Expr::Fn(mut fn_expr) => {
            fn_expr.function = Box::new(fold_function(r, *fn_expr.function)?);
            Expr::Fn(fn_expr)
        }
        Expr::Arrow(mut arrow) => {
            let mut params = Vec::with_capacity(arrow.params.len());
            for pat in arrow.params {
                params.push(fold_pat(r, pat)?);
            }
            arrow.params = params;
            arrow.body = Box::new(match *arrow.body {
                BlockStmtOrExpr::BlockStmt(block) => {
                    BlockStmtOrExpr::BlockStmt(fold_block(r, block)?)
                }
                BlockStmtOrExpr::Expr(body) => {
                    BlockStmtOrExpr::Expr(Box::new(fold_expr(r, *body)?))
                }
            });
            Expr::Arrow(arrow)
        }
        Expr::Unary(mut unary) => {
            unary.arg = Box::new(fold_expr(r, *unary.arg)?);
            Expr::Unary(unary)
        }
        Expr::Update(mut update) => {
            update.arg = Box::new(fold_expr(r, *update.arg)?);
            Expr::Update(update)
        }
        Expr::Bin(mut bin) => {
            bin.left = Box::new(fold_expr(r, *bin.left)?);
            bin.right = Box::new(fold_expr(r, *bin.right)?);
            Expr::Bin(bin)
        }
        Expr::Assign(mut assign) => {
            assign.left = match assign.left {
                PatOrExpr::Expr(target) => PatOrExpr::Expr(Box::new(fold_expr(r, *target)?)),
                PatOrExpr::Pat(pat) => PatOrExpr::Pat(Box::new(fold_pat(r, *pat)?)),
            };
            assign.right = Box::new(fold_expr(r, *assign.right)?);
            Expr::Assign(assign)
        }
        Expr::Member(mut member) => {
            member.obj = Box::new(fold_expr(r, *member.obj)?);
            if let MemberProp::Computed(mut computed) = member.prop {
                computed.expr = Box::new(fold_expr(r, *computed.expr)?);
                member.prop = MemberProp::Computed(computed);
            }
            Expr::Member(member)
        }
        Expr::Cond(mut cond) => {
            cond.test = Box::new(fold_expr(r, *cond.test)?);
            cond.cons = Box::new(fold_expr(r, *cond.cons)?);
            cond.alt = Box::new(fold_expr(r, *cond.alt)?);
            Expr::Cond(cond)
        }
        Expr::Call(mut call) => {
            if let Callee::Expr(callee) = call.callee {
                call.callee = Callee::Expr(Box::new(fold_expr(r, *callee)?));
            }
            call.args = fold_args(r, call.args)?;
            Expr::Call(call)
        }
        Expr::New(mut new) => {
            new.callee = Box::new(fold_expr(r, *new.callee)?);
            new.args = match new.args {
                Some(args) => Some(fold_args(r, args)?),
                None => None,
            };
            Expr::New(new)
        }
        Expr::Seq(mut seq) => {
            seq.exprs = fold_boxed_exprs(r, seq.exprs)?;
            Expr::Seq(seq)
        }
        Expr::Tpl(mut tpl) => {
            tpl.exprs = fold_boxed_exprs(r, tpl.exprs)?;
            Expr::Tpl(tpl)
        }
        Expr::TaggedTpl(mut tagged) => {
            tagged.tag = Box::new(fold_expr(r, *tagged.tag)?);
            tagged.tpl.exprs = fold_boxed_exprs(r, tagged.tpl.exprs)?;
            Expr::TaggedTpl(tagged)
        }
        Expr::Class(mut class_expr) => {
            class_expr.class = Box::new(fold_class(r, *class_expr.class)?);
            Expr::Class(class_expr)
        }
        Expr::Yield(mut yield_expr) => {
            yield_expr.arg = fold_opt_expr(r, yield_expr.arg)?;
            Expr::Yield(yield_expr)
        }
        Expr::Await(mut await_expr) => {
            await_expr.arg = Box::new(fold_expr(r, *await_expr.arg)?);
            Expr::Await(await_expr)
        }
        Expr::Paren(mut paren) => {
            paren.expr = Box::new(fold_expr(r, *paren.expr)?);
            Expr::Paren(paren)
        }
        Expr::TsTypeAssertion(mut assertion) => {
            assertion.expr = Box::new(fold_expr(r, *assertion.expr)?);
            Expr::TsTypeAssertion(assertion)
        }
        Expr::TsConstAssertion(mut assertion) => {
            assertion.expr = Box::new(fold_expr(r, *assertion.expr)?);
            Expr::TsConstAssertion(assertion)
        }
        Expr::TsNonNull(mut non_null) => {
            non_null.expr = Box::new(fold_expr(r, *non_null.expr)?);
            Expr::TsNonNull(non_null)
        }
        Expr::TsAs(mut as_expr) => {
            as_expr.expr = Box::new(fold_expr(r, *as_expr.expr)?);
            Expr::TsAs(as_expr)
        }
        Expr::TsSatisfies(mut satisfies) => {
            satisfies.expr = Box::new(fold_expr(r, *satisfies.expr)?);
            Expr::TsSatisfies(satisfies)
        }
        Expr::TsInstantiation(mut instantiation) => {
            instantiation.expr = Box::new(fold_expr(r, *instantiation.expr)?);
            Expr::TsInstantiation(instantiation)
        }
        Expr::OptChain(mut chain) => {
            chain.base = Box::new(match *chain.base {
                OptChainBase::Member(mut member) => {
                    member.obj = Box::new(fold_expr(r, *member.obj)?);
                    OptChainBase::Member(member)
                }
                OptChainBase::Call(mut call) => {
                    call.callee = Box::new(fold_expr(r, *call.callee)?);
                    call.args = fold_args(r, call.args)?;
                    OptChainBase::Call(call)
                }
            });
            Expr::OptChain(chain)
        }
        other => other,
    })
}
