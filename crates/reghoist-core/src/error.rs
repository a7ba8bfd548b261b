use swc_ecma_quote::swc_common::Span;
use thiserror::Error;

/// The one fatal error of the pass: a registration factory captured a name
/// that is neither allow-listed, mock-prefixed, coverage-injected, a pure
/// constant of the same statement list, nor a hoistable import binding.
///
/// Everything else the pass encounters merely disqualifies a statement from
/// hoisting; only this aborts the file.
#[derive(Debug, Clone, Error)]
#[error("registration factory is not allowed to reference out-of-scope name `{name}`")]
pub struct ScopeViolation {
    /// The offending free name.
    pub name: String,
    /// String first argument of the enclosing register link, when present.
    pub module_argument: Option<String>,
    /// Position of the registration statement.
    pub span: Span,
}

pub type Result<T, E = ScopeViolation> = std::result::Result<T, E>;
