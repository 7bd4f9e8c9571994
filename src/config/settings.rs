//! TOML-based configuration for lookml-omni.
//!
//! Supports a config file (lookml-omni.toml) with environment variable
//! expansion in the fallback command.
//!
//! Example configuration:
//! ```toml
//! [mapping]
//! hidden_policy = "omit"
//! description_style = "label"
//! dimension_group_fields = "restricted"
//!
//! [[mapping.rename]]
//! name = "count"
//! label_contains = "Total"
//! replacement = "total_count"
//! kind = "measure"
//!
//! [render]
//! indent_width = 2
//! block_description_threshold = 60
//!
//! [scan]
//! strict = false
//!
//! [fallback]
//! command = "${LOOKML_OMNI_FALLBACK}"
//! args = ["--model", "small"]
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::ConvertOptions;
use crate::fallback::CommandProvider;
use crate::omni::{MapperOptions, RenderOptions};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "LOOKML_OMNI_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "lookml-omni.toml";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Property mapping policies.
    pub mapping: MapperOptions,

    /// YAML layout.
    pub render: RenderOptions,

    /// Scanner behavior.
    pub scan: ScanSettings,

    /// External fallback command.
    pub fallback: FallbackSettings,
}

/// Scanner settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Report skipped lines as warnings.
    pub strict: bool,
}

/// Fallback command settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackSettings {
    /// Program to run (supports ${ENV_VAR} expansion).
    pub command: Option<String>,

    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl FallbackSettings {
    /// Build the configured provider, if a command is set.
    pub fn provider(&self) -> Result<Option<CommandProvider>, SettingsError> {
        let Some(command) = &self.command else {
            return Ok(None);
        };
        let program = expand_env_vars(command)?;
        if program.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "fallback.command is empty".to_string(),
            ));
        }
        let args = self
            .args
            .iter()
            .map(|arg| expand_env_vars(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(CommandProvider::new(program).with_args(args)))
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `LOOKML_OMNI_CONFIG`
    /// 2. `./lookml-omni.toml`
    /// 3. `~/.config/lookml-omni/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("lookml-omni").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Options for [`crate::convert::convert`].
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::default()
            .with_mapper(self.mapping.clone())
            .with_render(self.render.clone())
            .strict(self.scan.strict)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.render.indent_width == 0 {
            return Err(SettingsError::InvalidConfig(
                "render.indent_width must be at least 1".to_string(),
            ));
        }
        if let Some(rule) = self.mapping.rewrites.iter().find(|r| r.replacement.is_empty()) {
            return Err(SettingsError::InvalidConfig(format!(
                "rename rule for '{}' has an empty replacement",
                rule.name
            )));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at non-alphanumeric/underscore
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
