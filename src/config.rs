//! Configuration file support
//!
//! Maps the loader's logical fields to source column names and sets the
//! locale profile. Every key is optional; omitted keys keep the DeGiro
//! defaults.
//!
//! ```toml
//! [columns]
//! name = "Product"
//! value = "Waarde in EUR"
//! price = "Slotkoers"
//!
//! [locale]
//! decimal_separator = ","
//! thousands_separator = ""
//! field_separator = ""
//! export_separator = ";"
//! export_decimal_separator = ","
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::locale::LocaleProfile;

/// Environment variable pointing at a config file
pub const CONFIG_ENV_VAR: &str = "SNAPDIFF_CONFIG";

/// Logical field -> source column name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub name: String,
    pub value: String,
    pub price: String,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            name: "Product".to_string(),
            value: "Waarde in EUR".to_string(),
            price: "Slotkoers".to_string(),
        }
    }
}

/// Locale section as written in the file; separators are strings so an
/// empty value can mean "none" or "sniff".
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct LocaleSection {
    decimal_separator: String,
    thousands_separator: String,
    field_separator: String,
    export_separator: String,
    export_decimal_separator: String,
}

impl Default for LocaleSection {
    fn default() -> Self {
        Self {
            decimal_separator: ",".to_string(),
            thousands_separator: String::new(),
            field_separator: String::new(),
            export_separator: ";".to_string(),
            export_decimal_separator: ",".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    columns: ColumnSchema,
    locale: LocaleSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub columns: ColumnSchema,
    pub locale: LocaleProfile,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let columns = file.columns;
        for (field, column) in [
            ("name", &columns.name),
            ("value", &columns.value),
            ("price", &columns.price),
        ] {
            if column.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "column for '{}' must not be empty",
                    field
                )));
            }
        }

        let locale = file.locale.into_profile()?;
        Ok(Self { columns, locale })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading config from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path (argument or `SNAPDIFF_CONFIG`) must exist. Otherwise
    /// the per-user config file is used when present, else built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_path(Path::new(&path));
        }
        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::from_path(&path);
            }
        }
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

/// Per-user config location (`$XDG_CONFIG_HOME/snapdiff/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("snapdiff").join("config.toml"))
}

impl LocaleSection {
    fn into_profile(self) -> Result<LocaleProfile, ConfigError> {
        let decimal_separator = required_char("decimal_separator", &self.decimal_separator)?;
        let thousands_separator = optional_char("thousands_separator", &self.thousands_separator)?;
        let field_separator = optional_char("field_separator", &self.field_separator)?
            .map(|c| ascii_byte("field_separator", c))
            .transpose()?;
        let export_separator = ascii_byte(
            "export_separator",
            required_char("export_separator", &self.export_separator)?,
        )?;
        let export_decimal_separator =
            required_char("export_decimal_separator", &self.export_decimal_separator)?;

        if thousands_separator == Some(decimal_separator) {
            return Err(ConfigError::Invalid(
                "thousands_separator must differ from decimal_separator".to_string(),
            ));
        }
        if field_separator.map(char::from) == Some(decimal_separator) {
            return Err(ConfigError::Invalid(
                "field_separator must differ from decimal_separator".to_string(),
            ));
        }
        if char::from(export_separator) == export_decimal_separator {
            return Err(ConfigError::Invalid(
                "export_separator must differ from export_decimal_separator".to_string(),
            ));
        }

        Ok(LocaleProfile {
            decimal_separator,
            thousands_separator,
            field_separator,
            export_separator,
            export_decimal_separator,
        })
    }
}

fn optional_char(key: &str, value: &str) -> Result<Option<char>, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        _ => Err(ConfigError::Invalid(format!(
            "{} must be a single character, got {:?}",
            key, value
        ))),
    }
}

fn required_char(key: &str, value: &str) -> Result<char, ConfigError> {
    optional_char(key, value)?
        .ok_or_else(|| ConfigError::Invalid(format!("{} must not be empty", key)))
}

fn ascii_byte(key: &str, c: char) -> Result<u8, ConfigError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be an ASCII character, got {:?}",
            key, c
        )))
    }
}
