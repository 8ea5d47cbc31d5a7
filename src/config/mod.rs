mod schema;

pub use schema::{boolean_options, date_options, ColumnConfig, Config, Settings};

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::filters::FilterKind;

const CONFIG_ENV_VAR: &str = "GRIDFILTER_CONFIG";

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return expand_path(&path);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gridfilter")
        .join("config.json")
}

/// expand a leading `~` in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).to_string())
}

/// resolve the config path: explicit override first, then env var / default
pub fn resolve_path(override_path: Option<&Path>) -> PathBuf {
    match override_path {
        Some(path) => expand_path(&path.to_string_lossy()),
        None => get_config_path(),
    }
}

/// load the config from the default location
pub fn load() -> Result<Config> {
    load_from(&get_config_path())
}

/// load the config honoring an explicit `--config` path
pub fn load_with_override(override_path: Option<&Path>) -> Result<Config> {
    load_from(&resolve_path(override_path))
}

/// load a config file; a missing file yields defaults
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    for problem in validate(&config) {
        warn!(path = %path.display(), "{}", problem);
    }

    Ok(config)
}

/// parse config text (JSON5: comments and trailing commas allowed)
pub fn parse(content: &str) -> Result<Config> {
    json5::from_str(content).map_err(|e| anyhow!("{}", e))
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config = match parse(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid config: {}", e));
        }
    };

    Ok(validate(&config))
}

/// semantic checks on a parsed config
pub fn validate(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, column) in config.columns.iter().enumerate() {
        let prefix = format!("columns[{}]", i);

        if column.name.trim().is_empty() {
            errors.push(format!("{}: column name must not be empty", prefix));
            continue;
        }

        if !seen.insert(column.name.to_lowercase()) {
            errors.push(format!("{}: duplicate column '{}'", prefix, column.name));
        }

        match column.kind {
            FilterKind::String => {
                if has_date_options(column) || has_boolean_options(column) {
                    errors.push(format!(
                        "{}: string column '{}' takes no filter options",
                        prefix, column.name
                    ));
                }
            }
            FilterKind::Date => {
                if has_boolean_options(column) {
                    errors.push(format!(
                        "{}: date column '{}' has boolean options",
                        prefix, column.name
                    ));
                }
                if let Some(format) = &column.format {
                    if format.trim().is_empty() {
                        errors.push(format!("{}: date format must not be empty", prefix));
                    }
                }
            }
            FilterKind::Boolean => {
                if has_date_options(column) {
                    errors.push(format!(
                        "{}: boolean column '{}' has date options",
                        prefix, column.name
                    ));
                }
            }
        }
    }

    if config.settings.date_format.trim().is_empty() {
        errors.push("settings.date_format: must not be empty".to_string());
    }

    errors
}

fn has_date_options(column: &ColumnConfig) -> bool {
    column.with_time.is_some()
        || column.format.is_some()
        || column.placeholder.is_some()
        || column.locale.is_some()
}

fn has_boolean_options(column: &ColumnConfig) -> bool {
    column.variant.is_some() || column.true_label.is_some() || column.false_label.is_some()
}

/// generates a default config with example columns
pub fn default_with_examples() -> Config {
    let mut created = ColumnConfig::new("created", FilterKind::Date);
    created.label = Some("Created".to_string());
    created.with_time = Some(true);
    created.format = Some("DD/MM/YYYY HH:mm".to_string());

    let mut active = ColumnConfig::new("active", FilterKind::Boolean);
    active.variant = Some(crate::filters::BooleanVariant::Radio);
    active.true_label = Some("Active".to_string());
    active.false_label = Some("Inactive".to_string());

    Config {
        settings: Settings::default(),
        columns: vec![ColumnConfig::new("name", FilterKind::String), created, active],
    }
}
