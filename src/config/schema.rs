use serde::{Deserialize, Serialize};

use crate::filters::{
    BooleanInputOptions, BooleanVariant, DateInputOptions, FilterKind, DEFAULT_DATE_FORMAT,
    DEFAULT_LOCALE,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

impl Config {
    /// find a column by name (case-insensitive)
    pub fn column(&self, name: &str) -> Option<&ColumnConfig> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// grid-wide defaults applied to every column unless overridden
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub with_time: bool,
    #[serde(default)]
    pub boolean_variant: BooleanVariant,
    #[serde(default = "default_true_label")]
    pub true_label: String,
    #[serde(default = "default_false_label")]
    pub false_label: String,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_true_label() -> String {
    "true".to_string()
}

fn default_false_label() -> String {
    "false".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            date_format: default_date_format(),
            placeholder: String::new(),
            with_time: false,
            boolean_variant: BooleanVariant::Segmented,
            true_label: default_true_label(),
            false_label: default_false_label(),
        }
    }
}

/// filter configuration for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    pub kind: FilterKind,
    /// header text shown instead of the column name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<BooleanVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_label: Option<String>,
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            with_time: None,
            format: None,
            placeholder: None,
            locale: None,
            variant: None,
            true_label: None,
            false_label: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// date input options with column overrides applied over `settings`
    pub fn date_options(&self, settings: &Settings) -> DateInputOptions {
        date_options(Some(self), settings)
    }

    /// boolean input options with column overrides applied over `settings`
    pub fn boolean_options(&self, settings: &Settings) -> BooleanInputOptions {
        boolean_options(Some(self), settings)
    }
}

pub fn date_options(column: Option<&ColumnConfig>, settings: &Settings) -> DateInputOptions {
    DateInputOptions {
        with_time: column
            .and_then(|c| c.with_time)
            .unwrap_or(settings.with_time),
        format: column
            .and_then(|c| c.format.clone())
            .unwrap_or_else(|| settings.date_format.clone()),
        placeholder: column
            .and_then(|c| c.placeholder.clone())
            .unwrap_or_else(|| settings.placeholder.clone()),
        locale: column
            .and_then(|c| c.locale.clone())
            .unwrap_or_else(|| settings.locale.clone()),
    }
}

pub fn boolean_options(column: Option<&ColumnConfig>, settings: &Settings) -> BooleanInputOptions {
    BooleanInputOptions {
        variant: column
            .and_then(|c| c.variant)
            .unwrap_or(settings.boolean_variant),
        true_label: column
            .and_then(|c| c.true_label.clone())
            .unwrap_or_else(|| settings.true_label.clone()),
        false_label: column
            .and_then(|c| c.false_label.clone())
            .unwrap_or_else(|| settings.false_label.clone()),
    }
}
