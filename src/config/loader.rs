//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GateConfig;
use crate::config::validation::{diagnose_config, validate_config, MatcherDiagnostic, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Toml(e) => write!(f, "Parse error: {}", e),
            ConfigError::Json(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Manifest file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON; everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// A structurally valid config and the non-fatal diagnostics for its matchers.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GateConfig,
    pub diagnostics: Vec<MatcherDiagnostic>,
}

/// Load and validate configuration from a TOML or JSON file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content, ConfigFormat::from_path(path))
}

/// Parse and validate configuration from memory.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<LoadedConfig, ConfigError> {
    let config: GateConfig = match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(ConfigError::Toml)?,
        ConfigFormat::Json => serde_json::from_str(content).map_err(ConfigError::Json)?,
    };

    validate_config(&config).map_err(ConfigError::Validation)?;
    let diagnostics = diagnose_config(&config);

    Ok(LoadedConfig { config, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const MANIFEST: &str = r#"
[server]
bind_address = "0.0.0.0:9000"

[[middleware]]
name = "logger"

[[middleware]]
name = "auth"
matcher = { methods = ["GET", "POST"], patterns = ["/api/**", { regex = "^/auth/(login|logout)$" }] }

[[middleware]]
name = "broken"
matcher = { methods = "GET", patterns = [1] }
"#;

    #[test]
    fn test_parse_toml_manifest() {
        let loaded = parse_config(MANIFEST, ConfigFormat::Toml).unwrap();
        assert_eq!(loaded.config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(loaded.config.server.request_timeout_secs, 30);
        assert_eq!(loaded.config.middleware.len(), 3);
        assert!(loaded.config.middleware[0].matcher.is_none());
        assert_eq!(loaded.diagnostics.len(), 2);
        assert!(loaded.diagnostics.iter().all(|d| d.middleware == "broken"));
    }

    #[test]
    fn test_parse_json_manifest() {
        let json = r#"{
            "middleware": [
                { "name": "auth", "matcher": { "patterns": ["/api/*"] } }
            ]
        }"#;
        let loaded = parse_config(json, ConfigFormat::Json).unwrap();
        assert_eq!(loaded.config.middleware[0].name, "auth");
        assert!(loaded.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("middleware = 3", ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_validation_error() {
        let toml = r#"
[[middleware]]
name = "a"
[[middleware]]
name = "a"
"#;
        let err = parse_config(toml, ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().starts_with("Validation failed: "));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(&PathBuf::from("m.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(&PathBuf::from("m.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(&PathBuf::from("manifest")), ConfigFormat::Toml);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/gate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
