use miette::{Diagnostic, NamedSource, SourceSpan};
use reghoist_core::ScopeViolation;
use swc_ecma_quote::swc_common::SourceFile;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TransformError {
    #[error("failed to parse {file_name}: {message}")]
    #[diagnostic(code(reghoist::parse))]
    Parse { file_name: String, message: String },

    #[error("invalid name pattern in transform options")]
    #[diagnostic(code(reghoist::options))]
    Options(#[from] regex::Error),

    #[error("registration factory references out-of-scope name `{name}`")]
    #[diagnostic(
        code(reghoist::factory_scope),
        help(
            "factories run before the rest of the module; reference only allow-listed \
             globals, mock-prefixed values, coverage counters, pure constants, or \
             imports the pass can hoist"
        )
    )]
    FactoryScope {
        name: String,
        module_argument: Option<String>,
        #[source_code]
        src: NamedSource<String>,
        #[label("captured by this registration")]
        at: SourceSpan,
    },

    #[error("failed to emit transformed module")]
    #[diagnostic(code(reghoist::emit))]
    Emit(#[source] std::io::Error),
}

impl TransformError {
    pub(crate) fn factory_scope(
        violation: ScopeViolation,
        file_name: &str,
        source: &str,
        file: &SourceFile,
    ) -> Self {
        let offset = violation.span.lo.0.saturating_sub(file.start_pos.0) as usize;
        let len = violation.span.hi.0.saturating_sub(violation.span.lo.0) as usize;
        TransformError::FactoryScope {
            name: violation.name,
            module_argument: violation.module_argument,
            src: NamedSource::new(file_name, source.to_string()),
            at: SourceSpan::from((offset, len)),
        }
    }
}
