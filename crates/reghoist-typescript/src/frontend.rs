//! The parser collaborator: turns one source unit into an `swc_ecma_ast`
//! module. The pass itself never parses text.

use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::lexer::Lexer;
use swc_ecma_parser::{Parser, Syntax, TsConfig};
use swc_ecma_quote::swc_common::input::StringInput;
use swc_ecma_quote::swc_common::sync::Lrc;
use swc_ecma_quote::swc_common::{FileName, SourceFile, SourceMap, DUMMY_SP};

pub struct ParsedModule {
    pub module: Module,
    /// Kept for mapping spans back to line/column in diagnostics.
    pub source_map: Lrc<SourceMap>,
    pub source_file: Lrc<SourceFile>,
}

/// Parse `source` as TypeScript (TSX when the file name says so). Syntax
/// errors are returned as rendered messages; the module is still produced
/// where recovery allowed it.
pub fn parse_module(source: &str, file_name: &str) -> (ParsedModule, Vec<String>) {
    let tsx = file_name
        .rsplit('.')
        .next()
        .map(|extension| extension.eq_ignore_ascii_case("tsx"))
        .unwrap_or(false);

    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom(file_name.into()), source.to_string());
    let syntax = Syntax::Typescript(TsConfig {
        tsx,
        decorators: true,
        ..Default::default()
    });
    let lexer = Lexer::new(syntax, EsVersion::EsNext, StringInput::from(&*fm), None);
    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module();
    let mut errors = parser.take_errors();
    let module = match module {
        Ok(module) => module,
        Err(err) => {
            errors.push(err);
            Module {
                span: DUMMY_SP,
                body: Vec::new(),
                shebang: None,
            }
        }
    };

    let messages = errors.into_iter().map(|err| format!("{err:?}")).collect();
    (
        ParsedModule {
            module,
            source_map: cm,
            source_file: fm,
        },
        messages,
    )
}
