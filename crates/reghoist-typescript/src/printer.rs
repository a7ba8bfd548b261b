//! The printer collaborator: serializes a rewritten module back to text.

use std::io;

use swc_ecma_ast::Module;
use swc_ecma_codegen::text_writer::JsWriter;
use swc_ecma_codegen::Emitter;
use swc_ecma_quote::swc_common::sync::Lrc;
use swc_ecma_quote::swc_common::SourceMap;

pub fn print_module(module: &Module) -> io::Result<String> {
    let cm: Lrc<SourceMap> = Default::default();
    let mut buf = Vec::new();
    {
        let mut emitter = Emitter {
            cfg: Default::default(),
            cm: cm.clone(),
            comments: None,
            wr: JsWriter::new(cm, "\n", &mut buf, None),
        };
        emitter.emit_module(module)?;
    }
    Ok(String::from_utf8(buf).expect("codegen emits utf-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_module;

    #[test]
    fn round_trips_a_simple_module() {
        let (parsed, errors) = parse_module("const x = 1;\nconsole.log(x);\n", "test.ts");
        assert!(errors.is_empty());
        let output = print_module(&parsed.module).expect("prints");
        assert!(output.contains("const x = 1;"));
        assert!(output.contains("console.log(x);"));
    }
}
