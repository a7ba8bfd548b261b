//! Host-pipeline configuration, e.g. from a tsconfig plugin entry.

use regex::Regex;
use reghoist_core::config::{
    DEFAULT_ALLOWED_GLOBALS, DEFAULT_COVERAGE_PATTERN, DEFAULT_HANDLE_MODULE, DEFAULT_HANDLE_NAME,
    DEFAULT_MOCK_PREFIX,
};
use reghoist_core::HoistConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    pub handle_module: String,
    pub handle_name: String,
    pub allowed_globals: Vec<String>,
    pub mock_prefix: String,
    pub coverage_pattern: String,
}

impl Default for TransformOptions {
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
            mock_prefix: DEFAULT_MOCK_PREFIX.to_string(),
            coverage_pattern: DEFAULT_COVERAGE_PATTERN.to_string(),
        }
    }
}

impl TransformOptions {
    pub fn to_config(&self) -> Result<HoistConfig, regex::Error> {
        Ok(HoistConfig {
            handle_module: self.handle_module.clone(),
            handle_name: self.handle_name.clone(),
            allowed_globals: self.allowed_globals.clone(),
            mock_prefix: Regex::new(&self.mock_prefix)?,
            coverage_pattern: Regex::new(&self.coverage_pattern)?,
        })
    }
}
