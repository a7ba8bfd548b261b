//! Source-to-source driver for the registration-hoisting pass: the swc
//! parser and printer collaborators around `reghoist-core`.

pub mod error;
pub mod frontend;
pub mod options;
pub mod printer;

use itertools::Itertools;
use tracing::debug;

pub use error::TransformError;
pub use frontend::{parse_module, ParsedModule};
pub use options::TransformOptions;
pub use reghoist_core::{HoistConfig, PathResolver, ScopeViolation};

/// Parse, hoist and print one source unit. Parsing is strict: a module with
/// syntax errors is rejected rather than partially transformed.
pub fn transform_source(
    source: &str,
    file_name: &str,
    options: &TransformOptions,
    resolver: Option<&dyn PathResolver>,
) -> Result<String, TransformError> {
    let config = options.to_config()?;
    transform_source_with_config(source, file_name, &config, resolver)
}

pub fn transform_source_with_config(
    source: &str,
    file_name: &str,
    config: &HoistConfig,
    resolver: Option<&dyn PathResolver>,
) -> Result<String, TransformError> {
    let (parsed, errors) = frontend::parse_module(source, file_name);
    if !errors.is_empty() {
        return Err(TransformError::Parse {
            file_name: file_name.to_string(),
            message: errors.iter().join("; "),
        });
    }

    debug!(file = file_name, "hoisting registration calls");
    let rewritten = reghoist_core::transform(&parsed.module, config, resolver, file_name)
        .map_err(|violation| {
            TransformError::factory_scope(violation, file_name, source, &parsed.source_file)
        })?;

    printer::print_module(&rewritten).map_err(TransformError::Emit)
}
