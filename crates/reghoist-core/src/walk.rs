//! Local-binding and free-reference collection.
//!
//! Both walks run over one syntax subtree and produce a flat name set: the
//! factory validator, the variable hoister and the dependency-import hoister
//! all work on "names declared anywhere inside" vs "identifiers read in a
//! value position". Type annotations are never descended into, member names
//! and property keys are not references, and declaration names are not
//! references either.

use std::collections::HashSet;

use swc_ecma_ast::*;

/// Every name bound anywhere inside `expr`: parameters (including
/// destructured leaves), variable declarators, function declarations and
/// catch-clause parameters. Function-expression names are not bindings.
pub fn local_bindings(expr: &Expr) -> HashSet<String> {
    let mut bindings = Bindings::default();
    bindings.expr(expr);
    bindings.out
}

/// Identifiers referenced in a value position inside `expr` that are not in
/// `locals`.
pub fn free_references(expr: &Expr, locals: &HashSet<String>) -> HashSet<String> {
    let mut refs = References::new(locals);
    refs.expr(expr);
    refs.out
}

/// Free references of a whole variable declaration: initializers, pattern
/// defaults and computed pattern keys, but never the declared names.
pub fn free_references_in_var_decl(decl: &VarDecl, locals: &HashSet<String>) -> HashSet<String> {
    let mut refs = References::new(locals);
    refs.var_decl(decl);
    refs.out
}

#[derive(Default)]
struct Bindings {
    out: HashSet<String>,
}

impl Bindings {
    fn insert(&mut self, ident: &Ident) {
        self.out.insert(ident.sym.to_string());
    }

    fn binding_pat(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(name) => self.insert(&name.id),
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.binding_pat(elem);
                }
            }
            Pat::Rest(rest) => self.binding_pat(&rest.arg),
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => self.binding_pat(&kv.value),
                        ObjectPatProp::Assign(assign) => {
                            self.insert(&assign.key);
                            if let Some(value) = &assign.value {
                                self.expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.binding_pat(&rest.arg),
                    }
                }
            }
            Pat::Assign(assign) => {
                self.binding_pat(&assign.left);
                self.expr(&assign.right);
            }
            Pat::Expr(expr) => self.expr(expr),
            Pat::Invalid(_) => {}
        }
    }

    fn function(&mut self, function: &Function) {
        for param in &function.params {
            self.binding_pat(&param.pat);
        }
        if let Some(body) = &function.body {
            self.block(body);
        }
    }

    fn block(&mut self, block: &BlockStmt) {
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        for declarator in &decl.decls {
            self.binding_pat(&declarator.name);
            if let Some(init) = &declarator.init {
                self.expr(init);
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::With(with) => {
                self.expr(&with.obj);
                self.stmt(&with.body);
            }
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    self.expr(arg);
                }
            }
            Stmt::Labeled(labeled) => self.stmt(&labeled.body),
            Stmt::If(branch) => {
                self.expr(&branch.test);
                self.stmt(&branch.cons);
                if let Some(alt) = &branch.alt {
                    self.stmt(alt);
                }
            }
            Stmt::Switch(switch) => {
                self.expr(&switch.discriminant);
                for case in &switch.cases {
                    if let Some(test) = &case.test {
                        self.expr(test);
                    }
                    for stmt in &case.cons {
                        self.stmt(stmt);
                    }
                }
            }
            Stmt::Throw(throw) => self.expr(&throw.arg),
            Stmt::Try(try_stmt) => {
                self.block(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    if let Some(param) = &handler.param {
                        self.binding_pat(param);
                    }
                    self.block(&handler.body);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.block(finalizer);
                }
            }
            Stmt::While(while_stmt) => {
                self.expr(&while_stmt.test);
                self.stmt(&while_stmt.body);
            }
            Stmt::DoWhile(do_while) => {
                self.stmt(&do_while.body);
                self.expr(&do_while.test);
            }
            Stmt::For(for_stmt) => {
                match &for_stmt.init {
                    Some(VarDeclOrExpr::VarDecl(decl)) => self.var_decl(decl),
                    Some(VarDeclOrExpr::Expr(expr)) => self.expr(expr),
                    None => {}
                }
                if let Some(test) = &for_stmt.test {
                    self.expr(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.expr(update);
                }
                self.stmt(&for_stmt.body);
            }
            Stmt::ForIn(for_in) => {
                self.for_head(&for_in.left);
                self.expr(&for_in.right);
                self.stmt(&for_in.body);
            }
            Stmt::ForOf(for_of) => {
                self.for_head(&for_of.left);
                self.expr(&for_of.right);
                self.stmt(&for_of.body);
            }
            Stmt::Decl(decl) => self.decl(decl),
            Stmt::Expr(expr_stmt) => self.expr(&expr_stmt.expr),
            Stmt::Empty(_) | Stmt::Debugger(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    fn for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::VarDecl(decl) => self.var_decl(decl),
            ForHead::UsingDecl(decl) => {
                for declarator in &decl.decls {
                    self.binding_pat(&declarator.name);
                    if let Some(init) = &declarator.init {
                        self.expr(init);
                    }
                }
            }
            ForHead::Pat(_) => {}
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Fn(fn_decl) => {
                self.insert(&fn_decl.ident);
                self.function(&fn_decl.function);
            }
            Decl::Var(var) => self.var_decl(var),
            Decl::Using(using) => {
                for declarator in &using.decls {
                    self.binding_pat(&declarator.name);
                    if let Some(init) = &declarator.init {
                        self.expr(init);
                    }
                }
            }
            Decl::Class(class_decl) => self.class(&class_decl.class),
            Decl::TsInterface(_) | Decl::TsTypeAlias(_) | Decl::TsEnum(_) | Decl::TsModule(_) => {}
        }
    }

    fn class(&mut self, class: &Class) {
        if let Some(super_class) = &class.super_class {
            self.expr(super_class);
        }
        for member in &class.body {
            match member {
                ClassMember::Constructor(ctor) => {
                    for param in &ctor.params {
                        if let ParamOrTsParamProp::Param(param) = param {
                            self.binding_pat(&param.pat);
                        }
                    }
                    if let Some(body) = &ctor.body {
                        self.block(body);
                    }
                }
                ClassMember::Method(method) => self.function(&method.function),
                ClassMember::PrivateMethod(method) => self.function(&method.function),
                ClassMember::ClassProp(prop) => {
                    if let Some(value) = &prop.value {
                        self.expr(value);
                    }
                }
                ClassMember::PrivateProp(prop) => {
                    if let Some(value) = &prop.value {
                        self.expr(value);
                    }
                }
                ClassMember::StaticBlock(block) => self.block(&block.body),
                _ => {}
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.expr(&elem.expr);
                }
            }
            Expr::Object(object) => {
                for prop in &object.props {
                    match prop {
                        PropOrSpread::Spread(spread) => self.expr(&spread.expr),
                        PropOrSpread::Prop(prop) => match prop.as_ref() {
                            Prop::KeyValue(kv) => self.expr(&kv.value),
                            Prop::Assign(assign) => self.expr(&assign.value),
                            Prop::Getter(getter) => {
                                if let Some(body) = &getter.body {
                                    self.block(body);
                                }
                            }
                            Prop::Setter(setter) => {
                                self.binding_pat(&setter.param);
                                if let Some(body) = &setter.body {
                                    self.block(body);
                                }
                            }
                            Prop::Method(method) => self.function(&method.function),
                            Prop::Shorthand(_) => {}
                        },
                    }
                }
            }
            Expr::Fn(fn_expr) => self.function(&fn_expr.function),
            Expr::Arrow(arrow) => {
                for pat in &arrow.params {
                    self.binding_pat(pat);
                }
                match arrow.body.as_ref() {
                    BlockStmtOrExpr::BlockStmt(block) => self.block(block),
                    BlockStmtOrExpr::Expr(expr) => self.expr(expr),
                }
            }
            Expr::Unary(unary) => self.expr(&unary.arg),
            Expr::Update(update) => self.expr(&update.arg),
            Expr::Bin(bin) => {
                self.expr(&bin.left);
                self.expr(&bin.right);
            }
            Expr::Assign(assign) => {
                match &assign.left {
                    PatOrExpr::Expr(expr) => self.expr(expr),
                    PatOrExpr::Pat(pat) => self.binding_pat(pat),
                }
                self.expr(&assign.right);
            }
            Expr::Member(member) => {
                self.expr(&member.obj);
                if let MemberProp::Computed(computed) = &member.prop {
                    self.expr(&computed.expr);
                }
            }
            Expr::SuperProp(super_prop) => {
                if let SuperProp::Computed(computed) = &super_prop.prop {
                    self.expr(&computed.expr);
                }
            }
            Expr::Cond(cond) => {
                self.expr(&cond.test);
                self.expr(&cond.cons);
                self.expr(&cond.alt);
            }
            Expr::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    self.expr(callee);
                }
                for arg in &call.args {
                    self.expr(&arg.expr);
                }
            }
            Expr::New(new) => {
                self.expr(&new.callee);
                for arg in new.args.iter().flatten() {
                    self.expr(&arg.expr);
                }
            }
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.expr(expr);
                }
            }
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.expr(expr);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.expr(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.expr(expr);
                }
            }
            Expr::Class(class_expr) => self.class(&class_expr.class),
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.expr(arg);
                }
            }
            Expr::Await(await_expr) => self.expr(&await_expr.arg),
            Expr::Paren(paren) => self.expr(&paren.expr),
            Expr::TsTypeAssertion(assertion) => self.expr(&assertion.expr),
            Expr::TsConstAssertion(assertion) => self.expr(&assertion.expr),
            Expr::TsNonNull(non_null) => self.expr(&non_null.expr),
            Expr::TsAs(as_expr) => self.expr(&as_expr.expr),
            Expr::TsSatisfies(satisfies) => self.expr(&satisfies.expr),
            Expr::TsInstantiation(instantiation) => self.expr(&instantiation.expr),
            Expr::OptChain(chain) => match chain.base.as_ref() {
                OptChainBase::Member(member) => {
                    self.expr(&member.obj);
                    if let MemberProp::Computed(computed) = &member.prop {
                        self.expr(&computed.expr);
                    }
                }
                OptChainBase::Call(call) => {
                    self.expr(&call.callee);
                    for arg in &call.args {
                        self.expr(&arg.expr);
                    }
                }
            },
            _ => {}
        }
    }
}

struct References<'a> {
    locals: &'a HashSet<String>,
    out: HashSet<String>,
}

impl<'a> References<'a> {
    fn new(locals: &'a HashSet<String>) -> Self {
        Self {
            locals,
            out: HashSet::new(),
        }
    }

    fn reference(&mut self, ident: &Ident) {
        let name = ident.sym.as_ref();
        if !self.locals.contains(name) {
            self.out.insert(name.to_string());
        }
    }

    /// Pattern in a binding position: declared names are not references, but
    /// defaults, computed keys and nested expressions are.
    fn binding_pat(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(_) => {}
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.binding_pat(elem);
                }
            }
            Pat::Rest(rest) => self.binding_pat(&rest.arg),
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.prop_name(&kv.key);
                            self.binding_pat(&kv.value);
                        }
                        ObjectPatProp::Assign(assign) => {
                            if let Some(value) = &assign.value {
                                self.expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.binding_pat(&rest.arg),
                    }
                }
            }
            Pat::Assign(assign) => {
                self.binding_pat(&assign.left);
                self.expr(&assign.right);
            }
            Pat::Expr(expr) => self.expr(expr),
            Pat::Invalid(_) => {}
        }
    }

    /// Pattern on the left of an assignment expression: its leaves read and
    /// write existing names, so they do count as references.
    fn assign_target_pat(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(name) => self.reference(&name.id),
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.assign_target_pat(elem);
                }
            }
            Pat::Rest(rest) => self.assign_target_pat(&rest.arg),
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.prop_name(&kv.key);
                            self.assign_target_pat(&kv.value);
                        }
                        ObjectPatProp::Assign(assign) => {
                            self.reference(&assign.key);
                            if let Some(value) = &assign.value {
                                self.expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.assign_target_pat(&rest.arg),
                    }
                }
            }
            Pat::Assign(assign) => {
                self.assign_target_pat(&assign.left);
                self.expr(&assign.right);
            }
            Pat::Expr(expr) => self.expr(expr),
            Pat::Invalid(_) => {}
        }
    }

    fn prop_name(&mut self, name: &PropName) {
        if let PropName::Computed(computed) = name {
            self.expr(&computed.expr);
        }
    }

    fn function(&mut self, function: &Function) {
        for param in &function.params {
            self.binding_pat(&param.pat);
        }
        if let Some(body) = &function.body {
            self.block(body);
        }
    }

    fn block(&mut self, block: &BlockStmt) {
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        for declarator in &decl.decls {
            self.binding_pat(&declarator.name);
            if let Some(init) = &declarator.init {
                self.expr(init);
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::With(with) => {
                self.expr(&with.obj);
                self.stmt(&with.body);
            }
            Stmt::Return(ret) => {
                if let Some(arg) = &ret.arg {
                    self.expr(arg);
                }
            }
            Stmt::Labeled(labeled) => self.stmt(&labeled.body),
            Stmt::If(branch) => {
                self.expr(&branch.test);
                self.stmt(&branch.cons);
                if let Some(alt) = &branch.alt {
                    self.stmt(alt);
                }
            }
            Stmt::Switch(switch) => {
                self.expr(&switch.discriminant);
                for case in &switch.cases {
                    if let Some(test) = &case.test {
                        self.expr(test);
                    }
                    for stmt in &case.cons {
                        self.stmt(stmt);
                    }
                }
            }
            Stmt::Throw(throw) => self.expr(&throw.arg),
            Stmt::Try(try_stmt) => {
                self.block(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    if let Some(param) = &handler.param {
                        self.binding_pat(param);
                    }
                    self.block(&handler.body);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.block(finalizer);
                }
            }
            Stmt::While(while_stmt) => {
                self.expr(&while_stmt.test);
                self.stmt(&while_stmt.body);
            }
            Stmt::DoWhile(do_while) => {
                self.stmt(&do_while.body);
                self.expr(&do_while.test);
            }
            Stmt::For(for_stmt) => {
                match &for_stmt.init {
                    Some(VarDeclOrExpr::VarDecl(decl)) => self.var_decl(decl),
                    Some(VarDeclOrExpr::Expr(expr)) => self.expr(expr),
                    None => {}
                }
                if let Some(test) = &for_stmt.test {
                    self.expr(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.expr(update);
                }
                self.stmt(&for_stmt.body);
            }
            Stmt::ForIn(for_in) => {
                self.for_head(&for_in.left);
                self.expr(&for_in.right);
                self.stmt(&for_in.body);
            }
            Stmt::ForOf(for_of) => {
                self.for_head(&for_of.left);
                self.expr(&for_of.right);
                self.stmt(&for_of.body);
            }
            Stmt::Decl(decl) => self.decl(decl),
            Stmt::Expr(expr_stmt) => self.expr(&expr_stmt.expr),
            Stmt::Empty(_) | Stmt::Debugger(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    fn for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::VarDecl(decl) => self.var_decl(decl),
            ForHead::UsingDecl(decl) => {
                for declarator in &decl.decls {
                    self.binding_pat(&declarator.name);
                    if let Some(init) = &declarator.init {
                        self.expr(init);
                    }
                }
            }
            ForHead::Pat(pat) => self.assign_target_pat(pat),
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Fn(fn_decl) => self.function(&fn_decl.function),
            Decl::Var(var) => self.var_decl(var),
            Decl::Using(using) => {
                for declarator in &using.decls {
                    self.binding_pat(&declarator.name);
                    if let Some(init) = &declarator.init {
                        self.expr(init);
                    }
                }
            }
            Decl::Class(class_decl) => self.class(&class_decl.class),
            Decl::TsEnum(enum_decl) => {
                for member in &enum_decl.members {
                    if let Some(init) = &member.init {
                        self.expr(init);
                    }
                }
            }
            Decl::TsInterface(_) | Decl::TsTypeAlias(_) | Decl::TsModule(_) => {}
        }
    }

    fn class(&mut self, class: &Class) {
        if let Some(super_class) = &class.super_class {
            self.expr(super_class);
        }
        for member in &class.body {
            match member {
                ClassMember::Constructor(ctor) => {
                    self.prop_name(&ctor.key);
                    for param in &ctor.params {
                        if let ParamOrTsParamProp::Param(param) = param {
                            self.binding_pat(&param.pat);
                        }
                    }
                    if let Some(body) = &ctor.body {
                        self.block(body);
                    }
                }
                ClassMember::Method(method) => {
                    self.prop_name(&method.key);
                    self.function(&method.function);
                }
                ClassMember::PrivateMethod(method) => self.function(&method.function),
                ClassMember::ClassProp(prop) => {
                    self.prop_name(&prop.key);
                    if let Some(value) = &prop.value {
                        self.expr(value);
                    }
                }
                ClassMember::PrivateProp(prop) => {
                    if let Some(value) = &prop.value {
                        self.expr(value);
                    }
                }
                ClassMember::StaticBlock(block) => self.block(&block.body),
                _ => {}
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.reference(ident),
            Expr::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.expr(&elem.expr);
                }
            }
            Expr::Object(object) => {
                for prop in &object.props {
                    match prop {
                        PropOrSpread::Spread(spread) => self.expr(&spread.expr),
                        PropOrSpread::Prop(prop) => match prop.as_ref() {
                            // `{x}` reads an outer `x`
                            Prop::Shorthand(ident) => self.reference(ident),
                            Prop::KeyValue(kv) => {
                                self.prop_name(&kv.key);
                                self.expr(&kv.value);
                            }
                            Prop::Assign(assign) => self.expr(&assign.value),
                            Prop::Getter(getter) => {
                                self.prop_name(&getter.key);
                                if let Some(body) = &getter.body {
                                    self.block(body);
                                }
                            }
                            Prop::Setter(setter) => {
                                self.prop_name(&setter.key);
                                self.binding_pat(&setter.param);
                                if let Some(body) = &setter.body {
                                    self.block(body);
                                }
                            }
                            Prop::Method(method) => {
                                self.prop_name(&method.key);
                                self.function(&method.function);
                            }
                        },
                    }
                }
            }
            Expr::Fn(fn_expr) => self.function(&fn_expr.function),
            Expr::Arrow(arrow) => {
                for pat in &arrow.params {
                    self.binding_pat(pat);
                }
                match arrow.body.as_ref() {
                    BlockStmtOrExpr::BlockStmt(block) => self.block(block),
                    BlockStmtOrExpr::Expr(expr) => self.expr(expr),
                }
            }
            Expr::Unary(unary) => self.expr(&unary.arg),
            Expr::Update(update) => self.expr(&update.arg),
            Expr::Bin(bin) => {
                self.expr(&bin.left);
                self.expr(&bin.right);
            }
            Expr::Assign(assign) => {
                match &assign.left {
                    PatOrExpr::Expr(expr) => self.expr(expr),
                    PatOrExpr::Pat(pat) => self.assign_target_pat(pat),
                }
                self.expr(&assign.right);
            }
            Expr::Member(member) => {
                self.expr(&member.obj);
                if let MemberProp::Computed(computed) = &member.prop {
                    self.expr(&computed.expr);
                }
            }
            Expr::SuperProp(super_prop) => {
                if let SuperProp::Computed(computed) = &super_prop.prop {
                    self.expr(&computed.expr);
                }
            }
            Expr::Cond(cond) => {
                self.expr(&cond.test);
                self.expr(&cond.cons);
                self.expr(&cond.alt);
            }
            Expr::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    self.expr(callee);
                }
                for arg in &call.args {
                    self.expr(&arg.expr);
                }
            }
            Expr::New(new) => {
                self.expr(&new.callee);
                for arg in new.args.iter().flatten() {
                    self.expr(&arg.expr);
                }
            }
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.expr(expr);
                }
            }
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.expr(expr);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.expr(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.expr(expr);
                }
            }
            Expr::Class(class_expr) => self.class(&class_expr.class),
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.expr(arg);
                }
            }
            Expr::Await(await_expr) => self.expr(&await_expr.arg),
            Expr::Paren(paren) => self.expr(&paren.expr),
            Expr::TsTypeAssertion(assertion) => self.expr(&assertion.expr),
            Expr::TsConstAssertion(assertion) => self.expr(&assertion.expr),
            Expr::TsNonNull(non_null) => self.expr(&non_null.expr),
            Expr::TsAs(as_expr) => self.expr(&as_expr.expr),
            Expr::TsSatisfies(satisfies) => self.expr(&satisfies.expr),
            Expr::TsInstantiation(instantiation) => self.expr(&instantiation.expr),
            Expr::OptChain(chain) => match chain.base.as_ref() {
                OptChainBase::Member(member) => {
                    self.expr(&member.obj);
                    if let MemberProp::Computed(computed) = &member.prop {
                        self.expr(&computed.expr);
                    }
                }
                OptChainBase::Call(call) => {
                    self.expr(&call.callee);
                    for arg in &call.args {
                        self.expr(&arg.expr);
                    }
                }
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::parse_expr;

    fn names(set: &HashSet<String>) -> Vec<String> {
        let mut sorted: Vec<_> = set.iter().cloned().collect();
        sorted.sort();
        sorted
    }

    #[test]
    fn factory_parameters_and_inner_declarations_are_local() {
        let factory = parse_expr("(a, { b }, [c]) => { const d = 1; function e() {} return a; }");
        let locals = local_bindings(&factory);
        assert_eq!(names(&locals), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn catch_clause_parameter_is_local() {
        let factory = parse_expr("() => { try { risky(); } catch (err) { use(err); } }");
        let locals = local_bindings(&factory);
        assert!(locals.contains("err"));
        assert!(!locals.contains("risky"));
    }

    #[test]
    fn free_references_exclude_locals_and_member_names() {
        let factory = parse_expr("() => { const x = outer.prop; return x + other; }");
        let locals = local_bindings(&factory);
        let refs = free_references(&factory, &locals);
        assert_eq!(names(&refs), ["other", "outer"]);
    }

    #[test]
    fn shorthand_property_is_a_reference() {
        let factory = parse_expr("() => ({ mockThing, plain: 1 })");
        let refs = free_references(&factory, &HashSet::new());
        assert_eq!(names(&refs), ["mockThing"]);
    }

    #[test]
    fn property_keys_are_not_references() {
        let factory = parse_expr("() => ({ key: value, [computed]: 2 })");
        let refs = free_references(&factory, &HashSet::new());
        assert_eq!(names(&refs), ["computed", "value"]);
    }

    #[test]
    fn assignment_targets_are_references() {
        let factory = parse_expr("() => { target = 5; }");
        let refs = free_references(&factory, &HashSet::new());
        assert_eq!(names(&refs), ["target"]);
    }

    #[test]
    fn type_annotations_are_ignored() {
        let factory = parse_expr("() => { const x: SomeType = 1; return x; }");
        let locals = local_bindings(&factory);
        let refs = free_references(&factory, &locals);
        assert!(refs.is_empty());
    }

    #[test]
    fn var_decl_walk_skips_declared_names() {
        let module = crate::testing::parse_module("const mockB = mockA.child(base);");
        let decl = crate::testing::first_var_decl(&module);
        let refs = free_references_in_var_decl(decl, &HashSet::new());
        assert_eq!(names(&refs), ["base", "mockA"]);
    }

    #[test]
    fn pattern_defaults_are_references() {
        let module = crate::testing::parse_module("const [mockX = fallback()] = source;");
        let decl = crate::testing::first_var_decl(&module);
        let refs = free_references_in_var_decl(decl, &HashSet::new());
        assert_eq!(names(&refs), ["fallback", "source"]);
    }
}
