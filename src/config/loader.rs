//! Configuration File Loading
//!
//! Handles loading and saving configuration files from the usual locations,
//! falling back to built-in defaults when nothing is found.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "SAGE_RELAY_CONFIG";

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files (without extension)
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats, in lookup order
    supported_formats: Vec<ConfigFormat>,
    /// Current configuration file path (if loaded)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    /// Pick a format from a file extension, TOML when unknown
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to the default config if none exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with the default search paths
    pub fn new() -> Self {
        Self::with_search_paths(Self::default_search_paths())
    }

    /// Create a loader that only looks in the given locations
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Load configuration with default options
    pub fn load() -> Result<Config> {
        Self::new().load_with(LoadOptions::default())
    }

    /// Search, parse and validate according to `options`
    pub fn load_with(&mut self, options: LoadOptions) -> Result<Config> {
        if let Ok(explicit) = env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(explicit);
            debug!("Loading config named by {}: {}", CONFIG_ENV_VAR, path.display());
            let config = self.load_from_path(&path)?;
            if options.validate {
                validate_config(&config)?;
            }
            return Ok(config);
        }

        if let Some((path, config)) = self.find_and_load_config() {
            self.current_path = Some(path);
            if options.validate {
                validate_config(&config)?;
            }
            return Ok(config);
        }

        if options.create_default {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        } else {
            Err(Error::ConfigNotFound)
        }
    }

    /// Load a specific file, picking the format from its extension
    pub fn load_from_path(&mut self, path: &Path) -> Result<Config> {
        let config = self.load_config_file(path, ConfigFormat::from_path(path))?;
        self.current_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Option<(PathBuf, Config)> {
        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = path.with_extension(format.extension());
                if !config_path.exists() {
                    continue;
                }

                match self.load_config_file(&config_path, *format) {
                    Ok(config) => return Some((config_path, config)),
                    Err(e) => {
                        // Keep searching
                        warn!("Failed to load config from {}: {}", config_path.display(), e);
                    }
                }
            }
        }

        None
    }

    /// Load a specific configuration file
    fn load_config_file(&self, path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            }),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Get default search paths for configuration files
    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("sage-relay").join("config"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".sage-relay").join("config"));
        }

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join("sage-relay"));
        }

        paths
    }

    /// Get the current configuration file path
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Add a custom search path
    pub fn add_search_path(&mut self, path: PathBuf) {
        self.search_paths.push(path);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.transport.scheme.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "transport.scheme".to_string(),
            reason: "Scheme cannot be empty".to_string(),
        });
    }

    if config.transport.port == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "transport.port".to_string(),
            reason: "Port must be greater than 0".to_string(),
        });
    }

    if config.transport.local_host.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "transport.local_host".to_string(),
            reason: "Local host cannot be empty".to_string(),
        });
    }

    let alias = config.topics.prefix_alias.as_str();
    if alias.is_empty() || alias.contains(':') || alias.contains(char::is_whitespace) {
        return Err(Error::ConfigValidationFailed {
            field: "topics.prefix_alias".to_string(),
            reason: "Alias must be non-empty, without ':' or whitespace".to_string(),
        });
    }

    for (field, topic) in [
        ("topics.instream", &config.topics.instream),
        ("topics.connected", &config.topics.connected),
    ] {
        let is_full_uri = topic.contains("://");
        let uses_alias = topic
            .split_once(':')
            .is_some_and(|(prefix, rest)| prefix == alias && !rest.is_empty());
        if !is_full_uri && !uses_alias {
            return Err(Error::ConfigValidationFailed {
                field: field.to_string(),
                reason: format!("'{}' is neither a full URI nor '{}:<name>'", topic, alias),
            });
        }
    }

    for (field, procedure) in [
        ("procedures.is_connected", &config.procedures.is_connected),
        ("procedures.input", &config.procedures.input),
    ] {
        if procedure.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: field.to_string(),
                reason: "Procedure URI cannot be empty".to_string(),
            });
        }
    }

    if !config.ui.footer_height.is_finite() || config.ui.footer_height < 0.0 {
        return Err(Error::ConfigValidationFailed {
            field: "ui.footer_height".to_string(),
            reason: "Footer height must be a finite, non-negative number".to_string(),
        });
    }

    Ok(())
}
