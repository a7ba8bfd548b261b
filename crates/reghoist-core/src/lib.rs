//! Statement reordering for test-double registration calls.
//!
//! The pass rewrites a TypeScript module (as an `swc_ecma_ast` tree) so that
//! `register`/`unregister` calls on the tracked handle execute before any
//! import of the modules they intercept, pulling the constants and imports
//! those calls depend on up with them and rewriting string module paths into
//! instance-tree expressions. Parsing and printing are the host's concern;
//! see the `reghoist-typescript` crate for the swc-based collaborators.

pub mod calls;
pub mod config;
pub mod error;
mod fold;
mod hoist;
mod imports;
pub mod names;
pub mod partition;
pub mod paths;
pub mod purity;
pub mod validate;
mod view;
pub mod walk;

pub use config::HoistConfig;
pub use error::{Result, ScopeViolation};
pub use names::TrackedNames;
pub use partition::transform;
pub use paths::PathResolver;

#[cfg(test)]
pub(crate) mod testing {
    use swc_ecma_ast::*;
    use swc_ecma_codegen::text_writer::JsWriter;
    use swc_ecma_codegen::Emitter;
    use swc_ecma_parser::lexer::Lexer;
    use swc_ecma_parser::{Parser, Syntax, TsConfig};
    use swc_ecma_quote::swc_common::input::StringInput;
    use swc_ecma_quote::swc_common::sync::Lrc;
    use swc_ecma_quote::swc_common::{FileName, SourceMap, DUMMY_SP};

    thread_local! {
        // Parsing and printing must share one `SourceMap`: parsed/preserved
        // nodes carry real byte positions, and swc's codegen resolves those
        // spans (e.g. to detect trailing commas) while emitting. Printing
        // against a disconnected, empty map makes `span_to_snippet` panic on
        // the first non-dummy span. Each test parses then prints on the same
        // thread, so a per-thread shared map keeps those positions resolvable.
        static SOURCE_MAP: Lrc<SourceMap> = Lrc::<SourceMap>::default();
    }

    fn source_map() -> Lrc<SourceMap> {
        SOURCE_MAP.with(|cm| cm.clone())
    }

    pub fn parse_module(source: &str) -> Module {
        let cm = source_map();
        let fm = cm.new_source_file(FileName::Custom("test.ts".into()), source.to_string());
        let lexer = Lexer::new(
            Syntax::Typescript(TsConfig {
                decorators: true,
                ..Default::default()
            }),
            EsVersion::EsNext,
            StringInput::from(&*fm),
            None,
        );
        let mut parser = Parser::new_from(lexer);
        parser.parse_module().expect("test source parses")
    }

    /// Parse a single expression by wrapping it in a declaration.
    pub fn parse_expr(source: &str) -> Expr {
        let module = parse_module(&format!("const __probe = ({source});"));
        match module.body.into_iter().next() {
            Some(ModuleItem::Stmt(Stmt::Decl(Decl::Var(var)))) => {
                let declarator = var.decls.into_iter().next().expect("declarator");
                match *declarator.init.expect("initializer") {
                    Expr::Paren(paren) => *paren.expr,
                    other => other,
                }
            }
            other => panic!("expected a const declaration, found {other:?}"),
        }
    }

    pub fn print_module(module: &Module) -> String {
        let cm = source_map();
        let mut buf = Vec::new();
        {
            let mut emitter = Emitter {
                cfg: Default::default(),
                cm: cm.clone(),
                comments: None,
                wr: JsWriter::new(cm, "\n", &mut buf, None),
            };
            emitter.emit_module(module).expect("module emits");
        }
        String::from_utf8(buf).expect("emitted module is utf-8")
    }

    pub fn print_expr(expr: &Expr) -> String {
        let module = Module {
            span: DUMMY_SP,
            body: vec![ModuleItem::Stmt(Stmt::Expr(ExprStmt {
                span: DUMMY_SP,
                expr: Box::new(expr.clone()),
            }))],
            shebang: None,
        };
        print_module(&module)
            .trim_end()
            .trim_end_matches(';')
            .to_string()
    }

    pub fn var_decls(module: &Module) -> impl Iterator<Item = &VarDecl> {
        module.body.iter().filter_map(|item| match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => Some(var.as_ref()),
            _ => None,
        })
    }

    pub fn first_var_decl(module: &Module) -> &VarDecl {
        var_decls(module).next().expect("a variable declaration")
    }
}
