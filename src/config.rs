//! Editor configuration loaded from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::HashMap;
use std::env::{self, VarError};

use crate::color::normalize_hex_color;
use crate::consts::{DEFAULT_FEATURE_COLOR, DEFAULT_LAYER_NAME, FLY_DURATION_SECS, FLY_PADDING_PX, HIGHLIGHT_COLOR};
use crate::surface::FlyOptions;

pub const ENV_DEFAULT_COLOR: &str = "WKTMAP_DEFAULT_COLOR";
pub const ENV_HIGHLIGHT_COLOR: &str = "WKTMAP_HIGHLIGHT_COLOR";
pub const ENV_FLY_PADDING_PX: &str = "WKTMAP_FLY_PADDING_PX";
pub const ENV_FLY_DURATION_SECS: &str = "WKTMAP_FLY_DURATION_SECS";
pub const ENV_DEFAULT_LAYER_NAME: &str = "WKTMAP_DEFAULT_LAYER_NAME";

const ENV_KEYS: [&str; 5] = [ENV_DEFAULT_COLOR, ENV_HIGHLIGHT_COLOR, ENV_FLY_PADDING_PX, ENV_FLY_DURATION_SECS, ENV_DEFAULT_LAYER_NAME];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}: invalid color '{value}' (expected #rrggbb)")]
    InvalidColor { key: &'static str, value: String },
    #[error("{key}: invalid number '{value}' (expected a finite, non-negative value)")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key}: must not be blank")]
    Blank { key: &'static str },
    #[error("{key}: value is not valid unicode")]
    NotUnicode { key: &'static str },
}

/// Styling and viewport defaults for the [`crate::engine::Editor`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Stroke/fill of features with no `color` property.
    pub default_color: String,
    /// Stroke of selected shapes.
    pub highlight_color: String,
    /// Padding around flown-to bounds, in pixels.
    pub fly_padding_px: f64,
    /// Fly animation length, in seconds.
    pub fly_duration_secs: f64,
    /// Name of the layer created when a project has none.
    pub default_layer_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_FEATURE_COLOR.to_string(),
            highlight_color: HIGHLIGHT_COLOR.to_string(),
            fly_padding_px: FLY_PADDING_PX,
            fly_duration_secs: FLY_DURATION_SECS,
            default_layer_name: DEFAULT_LAYER_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    /// Build configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns the first invalid variable encountered.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        for key in ENV_KEYS {
            if let Some(value) = env_value(key, env::var(key))? {
                vars.insert(key, value);
            }
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Build configuration from any key lookup. Unset keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value encountered.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            default_color: color_var(&lookup, ENV_DEFAULT_COLOR, defaults.default_color)?,
            highlight_color: color_var(&lookup, ENV_HIGHLIGHT_COLOR, defaults.highlight_color)?,
            fly_padding_px: number_var(&lookup, ENV_FLY_PADDING_PX, defaults.fly_padding_px)?,
            fly_duration_secs: number_var(&lookup, ENV_FLY_DURATION_SECS, defaults.fly_duration_secs)?,
            default_layer_name: match lookup(ENV_DEFAULT_LAYER_NAME) {
                Some(name) if name.trim().is_empty() => return Err(ConfigError::Blank { key: ENV_DEFAULT_LAYER_NAME }),
                Some(name) => name.trim().to_string(),
                None => defaults.default_layer_name,
            },
        })
    }

    /// Fly animation options derived from this configuration.
    #[must_use]
    pub fn fly_options(&self) -> FlyOptions {
        FlyOptions { padding_px: self.fly_padding_px, duration_secs: self.fly_duration_secs }
    }
}

/// Unset is `None`; a value that is not unicode is an error, never treated as unset.
fn env_value(key: &'static str, var: Result<String, VarError>) -> Result<Option<String>, ConfigError> {
    match var {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { key }),
    }
}

fn color_var<F>(lookup: &F, key: &'static str, default: String) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => normalize_hex_color(&value).ok_or(ConfigError::InvalidColor { key, value }),
    }
}

fn number_var<F>(lookup: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber { key, value }),
    }
}
