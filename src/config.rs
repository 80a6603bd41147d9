//! Configuration management.
//!
//! Loads configuration from TOML files and provides runtime defaults.
//!
//! ```toml
//! [general]
//! log_level = "debug"
//!
//! [scan]
//! max_depth = 60
//!
//! [summary]
//! leaf_types = ["Button", "MenuItem"]
//!
//! [[rules]]
//! app_kind = "file_explorer"
//! component = "Ribbon"
//! priority = 77
//! component_type = "Static"
//! matcher = { kind = "field_equals", field = "class_name", value = "NetUIHWND" }
//!
//! [reactions.file_explorer."Ribbon"]
//! kind = "temporary"
//! targets = ["Other Controls"]
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::matcher::Matcher;
use crate::reaction::ReactionRule;
use crate::rules::Rule;
use crate::snapshot::DEFAULT_MAX_DEPTH;
use crate::summary::SummaryConfig;
use crate::types::{AppKind, ComponentType, ConfigError, RuleError};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub summary: SummaryConfig,

    /// Extra rules merged into the built-in providers
    #[serde(default)]
    pub rules: Vec<CustomRule>,

    /// Reaction overrides: app kind key → component name → directive
    #[serde(default)]
    pub reactions: HashMap<String, HashMap<String, ReactionRule>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Deepest level the walker descends to
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// A rule declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRule {
    /// `file_explorer`, `code_editor` or `unknown` (alias `default`)
    pub app_kind: String,

    pub component: String,

    #[serde(default)]
    pub priority: i32,

    #[serde(default = "default_component_type")]
    pub component_type: ComponentType,

    pub matcher: Matcher,
}

impl CustomRule {
    /// Resolve the application kind and build the rule.
    pub fn to_rule(&self) -> Result<(AppKind, Rule), RuleError> {
        let kind = AppKind::from_config_key(&self.app_kind)
            .ok_or_else(|| RuleError::UnknownAppKind(self.app_kind.clone()))?;

        Ok((
            kind,
            Rule::new(
                self.component.clone(),
                self.matcher.clone(),
                self.priority,
                self.component_type,
            ),
        ))
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_component_type() -> ComponentType {
    ComponentType::Variable
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_path(Self::default_config_path())
    }

    /// Load configuration from a specific path, falling back to defaults
    /// when the file is missing or invalid.
    pub fn load_from_path(path: PathBuf) -> Self {
        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    log::info!("[CONFIG] Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    log::warn!("[CONFIG] Failed to parse config file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("[CONFIG] No config file found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Parse and validate a configuration document.
    ///
    /// Unlike [`Config::load_from_path`] this never falls back: unknown
    /// application kinds in `[[rules]]` or `[reactions]` are errors.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.custom_rules()?;
        for key in config.reactions.keys() {
            if AppKind::from_config_key(key).is_none() {
                return Err(RuleError::UnknownAppKind(key.clone()).into());
            }
        }
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("semantic-components")
            .join("config.toml")
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(Self::default_config_path())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;
        log::info!("[CONFIG] Saved configuration to {:?}", path);
        Ok(())
    }

    /// Configured extra rules, grouped by application kind in file order.
    pub fn custom_rules(&self) -> Result<Vec<(AppKind, Vec<Rule>)>, RuleError> {
        let mut grouped: Vec<(AppKind, Vec<Rule>)> = Vec::new();
        for custom in &self.rules {
            let (kind, rule) = custom.to_rule()?;
            match grouped.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, rules)) => rules.push(rule),
                None => grouped.push((kind, vec![rule])),
            }
        }
        Ok(grouped)
    }

    /// Reaction overrides that apply to `kind`.
    pub fn reactions_for(&self, kind: AppKind) -> HashMap<String, ReactionRule> {
        self.reactions
            .iter()
            .filter(|(key, _)| AppKind::from_config_key(key) == Some(kind))
            .flat_map(|(_, entries)| entries.clone())
            .collect()
    }
}
