use regex::Regex;

/// Method name that installs a test double for a module.
pub const REGISTER_METHOD: &str = "register";
/// Method name that removes a previously installed double.
pub const UNREGISTER_METHOD: &str = "unregister";
/// Method name that loads the real implementation from inside a factory.
pub const LOAD_ACTUAL_METHOD: &str = "loadActual";

pub const DEFAULT_HANDLE_MODULE: &str = "@rbxts/doubles";
pub const DEFAULT_HANDLE_NAME: &str = "doubles";
pub const DEFAULT_MOCK_PREFIX: &str = "(?i)^mock";
pub const DEFAULT_COVERAGE_PATTERN: &str = "^(?:__)?cov";

/// Globals a factory may always reference, besides the handle itself.
pub const DEFAULT_ALLOWED_GLOBALS: &[&str] = &["expect", "Infinity", "NaN", "undefined"];

/// Extensions stripped from relative module paths before they are turned
/// into instance-tree expressions. Order matters: `.d.ts` before `.ts`.
pub const STRIPPABLE_EXTENSIONS: &[&str] = &[".d.ts", ".ts", ".tsx", ".luau", ".lua"];

/// Immutable configuration for one transform invocation.
///
/// There is deliberately no process-wide registry; hosts construct one value
/// and pass it to every entry point.
#[derive(Debug, Clone)]
pub struct HoistConfig {
    /// Specifier of the module that exports the tracked handle.
    pub handle_module: String,
    /// Conventional name of the handle: the named import that is tracked,
    /// and the member accessed on namespace imports.
    pub handle_name: String,
    /// Free names a factory may reference unconditionally.
    pub allowed_globals: Vec<String>,
    /// Names that count as lazily-initialized mock state.
    pub mock_prefix: Regex,
    /// Names injected by coverage instrumentation.
    pub coverage_pattern: Regex,
}

impl Default for HoistConfig {
    fn default() -> Self {
        let mut allowed_globals: Vec<String> = DEFAULT_ALLOWED_GLOBALS
            .iter()
            .map(|name| (*name).to_string())
            .collect();
        allowed_globals.push(DEFAULT_HANDLE_NAME.to_string());

        Self {
            handle_module: DEFAULT_HANDLE_MODULE.to_string(),
            handle_name: DEFAULT_HANDLE_NAME.to_string(),
            allowed_globals,
            mock_prefix: Regex::new(DEFAULT_MOCK_PREFIX).expect("default mock prefix is valid"),
            coverage_pattern: Regex::new(DEFAULT_COVERAGE_PATTERN)
                .expect("default coverage pattern is valid"),
        }
    }
}

impl HoistConfig {
    /// Configuration for a handle exported by `handle_module` under
    /// `handle_name`, with the default patterns and allow-list.
    pub fn for_handle(handle_module: &str, handle_name: &str) -> Self {
        let mut config = Self::default();
        config.allowed_globals.retain(|name| name != DEFAULT_HANDLE_NAME);
        config.allowed_globals.push(handle_name.to_string());
        config.handle_module = handle_module.to_string();
        config.handle_name = handle_name.to_string();
        config
    }

    pub fn is_hoist_method(&self, name: &str) -> bool {
        name == REGISTER_METHOD || name == UNREGISTER_METHOD
    }

    pub fn matches_mock_prefix(&self, name: &str) -> bool {
        self.mock_prefix.is_match(name)
    }

    pub fn matches_coverage(&self, name: &str) -> bool {
        self.coverage_pattern.is_match(name)
    }

    pub fn is_allowed_global(&self, name: &str) -> bool {
        name == self.handle_name || self.allowed_globals.iter().any(|allowed| allowed == name)
    }
}
