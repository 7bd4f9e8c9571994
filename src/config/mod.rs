//! Configuration module for lookml-omni.
//!
//! Handles the settings file, environment variables and their mapping onto
//! conversion options.

mod settings;

pub use settings::{
    expand_env_vars, FallbackSettings, ScanSettings, Settings, SettingsError, CONFIG_ENV_VAR,
    LOCAL_CONFIG_FILE,
};
