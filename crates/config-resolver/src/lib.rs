//! Configuration resolution: merge a base document with an optional local
//! override, expand `${PROJECT_ROOT}`/`${ENV:NAME}` tokens, then validate
//! into a fully-typed [`ResolvedConfig`].

pub mod error;
pub mod expand;
pub mod model;
pub mod raw;

pub use error::ConfigError;
pub use model::{HttpConfig, IpcConfig, MotorConfig, OrchestratorConfig, ResolvedConfig, TelemetryConfig};

use std::path::Path;

/// Load and resolve config from a base TOML file and an optional override
/// TOML file. `project_root` is substituted for every `${PROJECT_ROOT}` token.
pub fn load(
    base_path: &Path,
    override_path: Option<&Path>,
    project_root: &str,
) -> Result<ResolvedConfig, ConfigError> {
    let base_str = std::fs::read_to_string(base_path)
        .map_err(|e| ConfigError::Io(base_path.display().to_string(), e))?;
    let override_str = match override_path {
        Some(p) => Some(
            std::fs::read_to_string(p).map_err(|e| ConfigError::Io(p.display().to_string(), e))?,
        ),
        None => None,
    };
    load_from_str(&base_str, override_str.as_deref(), project_root)
}

/// Same as [`load`] but takes TOML text directly — used by tests and by
/// `load` itself.
pub fn load_from_str(
    base_str: &str,
    override_str: Option<&str>,
    project_root: &str,
) -> Result<ResolvedConfig, ConfigError> {
    let base: toml::Value =
        toml::from_str(base_str).map_err(|e| ConfigError::Parse("<base>".to_owned(), e))?;
    let over = override_str
        .map(|s| toml::from_str::<toml::Value>(s).map_err(|e| ConfigError::Parse("<override>".to_owned(), e)))
        .transpose()?;

    let merged = expand::merge(base, over);
    let expanded = expand::expand(merged, project_root)?;
    let raw: raw::RawConfig = expanded
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::Parse("<merged>".to_owned(), e))?;
    ResolvedConfig::from_raw(raw)
}
