use crate::conf::error::ConfigError;
use crate::conf::types::LogscopeConfig;
use crate::conf::validate::validate_config;
use std::fs;
use std::path::Path;

/// Read, parse and validate a `logscope.hcl` file.
pub fn load_config(path: &Path) -> Result<LogscopeConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config = parse_config(path, &raw)?;

    //--------------------------------------------------------------------------
    // Semantic validation (aggregate all errors)
    //--------------------------------------------------------------------------
    validate_config(&config).map_err(|validation_errors| ConfigError::Validation {
        validation_errors,
    })?;

    tracing::info!(
        path = %path.display(),
        applications = config.applications.len(),
        "configuration loaded"
    );

    Ok(config)
}

pub fn parse_config(path: &Path, raw: &str) -> Result<LogscopeConfig, ConfigError> {
    hcl::from_str(raw).map_err(|e| ConfigError::parse(path, e))
}
