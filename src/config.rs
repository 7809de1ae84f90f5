//! Configuration module for `curriculum-flow`

use crate::core::layout::{LaneGeometry, LayoutGeometry, RouteStyle};
use crate::core::legend::HighlightAxis;
use crate::core::view::{ViewMode, ViewSettings};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the configuration directory in string values
pub const DIR_VARIABLE: &str = "$CURRICULUM_FLOW";

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Default flowchart toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Order columns by prerequisite position
    pub optimize: bool,
    /// Wider rows and strategic placement
    pub spaced: bool,
    /// Orthogonal edge routing
    pub orthogonal: bool,
    /// View (semester, horizontal)
    pub view: String,
    /// Highlight axis (component, evaluation, type, department, area)
    pub highlight: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let settings = ViewSettings::default();
        Self {
            optimize: settings.optimize,
            spaced: settings.spaced,
            orthogonal: settings.orthogonal,
            view: settings.view.to_string(),
            highlight: settings.highlight.to_string(),
        }
    }
}

impl LayoutConfig {
    /// Parse into typed view settings
    ///
    /// # Errors
    /// Returns an error if `view` or `highlight` is not a known value
    pub fn view_settings(&self) -> Result<ViewSettings, String> {
        Ok(ViewSettings {
            optimize: self.optimize,
            spaced: self.spaced,
            orthogonal: self.orthogonal,
            view: self.view.parse::<ViewMode>()?,
            highlight: self.highlight.parse::<HighlightAxis>()?,
        })
    }
}

/// Paths configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for exported layouts
    #[serde(default)]
    pub out_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default flowchart toggles
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Semester view geometry
    #[serde(default)]
    pub geometry: LayoutGeometry,
    /// Horizontal view geometry
    #[serde(default)]
    pub lanes: LaneGeometry,
    /// Orthogonal routing tuning
    #[serde(default)]
    pub routing: RouteStyle,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override export output directory
    pub out_dir: Option<String>,
}

/// Read one numeric field of a geometry section through its TOML form
#[allow(clippy::cast_precision_loss)]
fn numeric_field<T: Serialize>(section: &T, field: &str) -> Option<f64> {
    let value = toml::Value::try_from(section).ok()?;
    let field = value.get(field)?;
    field
        .as_float()
        .or_else(|| field.as_integer().map(|i| i as f64))
}

/// Copy of `section` with one numeric field replaced
fn with_numeric_field<T>(section: &T, field: &str, number: f64) -> Result<T, String>
where
    T: Serialize + DeserializeOwned,
{
    let value = toml::Value::try_from(section).map_err(|e| e.to_string())?;
    let toml::Value::Table(mut table) = value else {
        return Err("Config section is not a table".to_string());
    };
    if !table.contains_key(field) {
        return Err(format!("Unknown config field: '{field}'"));
    }
    table.insert(field.to_string(), toml::Value::Float(number));
    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| e.to_string())
}

/// Numeric keys that size nodes; every grid division depends on them
const POSITIVE_KEYS: [&str; 4] = [
    "geometry.node_width",
    "geometry.node_height",
    "lanes.node_width",
    "lanes.node_height",
];

/// Check a numeric value against the rules for its key
fn check_number(key: &str, number: f64) -> Result<(), String> {
    if !number.is_finite() || number < 0.0 {
        return Err(format!("'{key}' must be a non-negative number"));
    }
    if number <= 0.0 && POSITIVE_KEYS.contains(&key) {
        return Err(format!("'{key}' must be greater than zero"));
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
}

impl Config {
    /// Get the `$CURRICULUM_FLOW` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/curriculum-flow`
    /// - macOS: `~/Library/Application Support/curriculum-flow`
    /// - Windows: `%APPDATA%\curriculum-flow`
    #[must_use]
    pub fn get_curriculum_flow_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("curriculum-flow")
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds.
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_curriculum_flow_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$CURRICULUM_FLOW` in a string
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_curriculum_flow_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Merge missing fields from defaults into this config
    ///
    /// String fields that are empty here and non-empty in `defaults` are
    /// filled. Numeric fields that break the rules of [`set`](Config::set),
    /// such as a zero node size, are replaced by their default.
    ///
    /// # Returns
    /// `true` if any field was filled or replaced
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }
        if self.layout.view.is_empty() && !defaults.layout.view.is_empty() {
            self.layout.view.clone_from(&defaults.layout.view);
            changed = true;
        }
        if self.layout.highlight.is_empty() && !defaults.layout.highlight.is_empty() {
            self.layout.highlight.clone_from(&defaults.layout.highlight);
            changed = true;
        }
        if self.paths.out_dir.is_empty() && !defaults.paths.out_dir.is_empty() {
            self.paths.out_dir.clone_from(&defaults.paths.out_dir);
            changed = true;
        }

        for key in self.numeric_keys() {
            let Some(number) = self.numeric(&key) else {
                continue;
            };
            if let Err(e) = check_number(&key, number) {
                if let Some(fallback) = defaults.numeric(&key) {
                    crate::warn!("{e}; using default {fallback}");
                    if self.set_numeric(&key, fallback).is_ok() {
                        changed = true;
                    }
                }
            }
        }

        changed
    }

    /// Apply CLI-provided overrides without touching the config file
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(out_dir) = &overrides.out_dir {
            self.paths.out_dir.clone_from(out_dir);
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing sections and fields take their serde defaults; `$CURRICULUM_FLOW`
    /// is expanded in path values.
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;
        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.out_dir = Self::expand_variables(&config.paths.out_dir);
        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the compiled-in default configuration is invalid TOML.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create it from defaults on first run
    ///
    /// Missing fields and invalid numbers are taken from defaults and written
    /// back. Any read or parse failure falls back to the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save();
            return defaults;
        }

        let parsed = fs::read_to_string(&config_file)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_toml(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save();
                }
                config
            }
            Err(e) => {
                crate::warn!("Ignoring unreadable config {}: {e}", config_file.display());
                defaults
            }
        }
    }

    /// Read configuration from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if a numeric
    /// value is rejected by [`validate`](Config::validate)
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every numeric geometry value with the rules [`set`](Config::set) applies
    ///
    /// # Errors
    /// Returns the first offending key
    pub fn validate(&self) -> Result<(), String> {
        for key in self.numeric_keys() {
            if let Some(number) = self.numeric(&key) {
                check_number(&key, number)?;
            }
        }
        Ok(())
    }

    /// Every `section.field` key of the numeric sections
    fn numeric_keys(&self) -> Vec<String> {
        let sections = [
            ("geometry", toml::Value::try_from(&self.geometry)),
            ("lanes", toml::Value::try_from(&self.lanes)),
            ("routing", toml::Value::try_from(&self.routing)),
        ];
        let mut keys = Vec::new();
        for (section, value) in sections {
            if let Ok(toml::Value::Table(table)) = value {
                keys.extend(table.keys().map(|field| format!("{section}.{field}")));
            }
        }
        keys
    }

    fn numeric(&self, key: &str) -> Option<f64> {
        let (section, field) = key.split_once('.')?;
        match section {
            "geometry" => numeric_field(&self.geometry, field),
            "lanes" => numeric_field(&self.lanes, field),
            "routing" => numeric_field(&self.routing, field),
            _ => None,
        }
    }

    fn set_numeric(&mut self, key: &str, number: f64) -> Result<(), String> {
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| format!("Unknown config key: '{key}'"))?;
        match section {
            "geometry" => self.geometry = with_numeric_field(&self.geometry, field, number)?,
            "lanes" => self.lanes = with_numeric_field(&self.lanes, field, number)?,
            "routing" => self.routing = with_numeric_field(&self.routing, field, number)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save configuration to a specific file, creating parent directories
    ///
    /// # Errors
    /// Returns an error if serialisation, directory creation or writing fails
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`, `file`, `verbose`
    /// - `optimize`, `spaced`, `orthogonal`, `view`, `highlight`
    /// - `out_dir`
    /// - `geometry.<field>`, `lanes.<field>`, `routing.<field>` for numeric geometry
    ///
    /// # Returns
    /// `None` if the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "optimize" => Some(self.layout.optimize.to_string()),
            "spaced" => Some(self.layout.spaced.to_string()),
            "orthogonal" => Some(self.layout.orthogonal.to_string()),
            "view" => Some(self.layout.view.clone()),
            "highlight" => Some(self.layout.highlight.clone()),
            "out_dir" | "out-dir" => Some(self.paths.out_dir.clone()),
            _ => self.numeric(key).map(|number| number.to_string()),
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be parsed
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                value.parse::<crate::logger::Level>()?;
                self.logging.level = value.to_string();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool(key, value)?,
            "optimize" => self.layout.optimize = parse_bool(key, value)?,
            "spaced" => self.layout.spaced = parse_bool(key, value)?,
            "orthogonal" => self.layout.orthogonal = parse_bool(key, value)?,
            "view" => self.layout.view = value.parse::<ViewMode>()?.to_string(),
            "highlight" => self.layout.highlight = value.parse::<HighlightAxis>()?.to_string(),
            "out_dir" | "out-dir" => self.paths.out_dir = value.to_string(),
            _ => {
                if !key.contains('.') {
                    return Err(format!("Unknown config key: '{key}'"));
                }
                let number: f64 = value
                    .parse()
                    .map_err(|_| format!("Invalid number for '{key}': '{value}'"))?;
                check_number(key, number)?;
                self.set_numeric(key, number)?;
            }
        }
        Ok(())
    }

    /// Reset one configuration value to its default
    ///
    /// # Errors
    /// Returns an error if the key is not recognized
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "optimize" => self.layout.optimize = defaults.layout.optimize,
            "spaced" => self.layout.spaced = defaults.layout.spaced,
            "orthogonal" => self.layout.orthogonal = defaults.layout.orthogonal,
            "view" => self.layout.view.clone_from(&defaults.layout.view),
            "highlight" => self.layout.highlight.clone_from(&defaults.layout.highlight),
            "out_dir" | "out-dir" => self.paths.out_dir.clone_from(&defaults.paths.out_dir),
            _ => {
                let value = defaults
                    .get(key)
                    .ok_or_else(|| format!("Unknown config key: '{key}'"))?;
                self.set(key, &value)?;
            }
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[layout]")?;
        writeln!(f, "  optimize = {}", self.layout.optimize)?;
        writeln!(f, "  spaced = {}", self.layout.spaced)?;
        writeln!(f, "  orthogonal = {}", self.layout.orthogonal)?;
        writeln!(f, "  view = \"{}\"", self.layout.view)?;
        writeln!(f, "  highlight = \"{}\"", self.layout.highlight)?;

        let g = &self.geometry;
        writeln!(f, "\n[geometry]")?;
        writeln!(f, "  node_width = {}", g.node_width)?;
        writeln!(f, "  node_height = {}", g.node_height)?;
        writeln!(f, "  column_gap = {}", g.column_gap)?;
        writeln!(f, "  header_height = {}", g.header_height)?;
        writeln!(f, "  padding = {}", g.padding)?;
        writeln!(f, "  compact_row_gap = {}", g.compact_row_gap)?;
        writeln!(f, "  spaced_row_gap = {}", g.spaced_row_gap)?;
        writeln!(f, "  strategic_row_gap = {}", g.strategic_row_gap)?;

        let l = &self.lanes;
        writeln!(f, "\n[lanes]")?;
        writeln!(f, "  node_width = {}", l.node_width)?;
        writeln!(f, "  node_height = {}", l.node_height)?;
        writeln!(f, "  column_gap = {}", l.column_gap)?;
        writeln!(f, "  lane_gap = {}", l.lane_gap)?;
        writeln!(f, "  header_height = {}", l.header_height)?;
        writeln!(f, "  padding = {}", l.padding)?;

        writeln!(f, "\n[routing]")?;
        writeln!(f, "  corner_radius = {}", self.routing.corner_radius)?;
        writeln!(f, "  straight_tolerance = {}", self.routing.straight_tolerance)?;
        writeln!(f, "  min_radius = {}", self.routing.min_radius)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  out_dir = \"{}\"", self.paths.out_dir)?;

        Ok(())
    }
}
