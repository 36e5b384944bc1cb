//! `km.toml`: what to generate and how.
//!
//! ```toml
//! [settings]
//! style = "value"            # pointer | value | standalone
//! module = "github.com/acme/app"
//! path_from_module = "internal"
//!
//! [[mappings]]
//! plugins = ["ToMap"]
//! [mappings.source]
//! name = "Row"
//! path = "db/row.go"
//! [[mappings.destination]]
//! name = "User"
//! path = "user/user.go"
//! ignore = ["Password"]
//! map = { Email = "Mail" }
//! ```
//!
//! Shape errors (unknown style or plugin, wrong value types) surface from deserialization;
//! [`Config::validate`] checks what serde cannot. Both are fatal before any work starts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversions::ConversionTable;
use crate::emit::{FileHeader, Plugin, Style};
use crate::generator::GeneratorSettings;
use crate::qualify::ModulePath;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("settings.module is required")]
    MissingModule,
    #[error("mapping #{index} (source '{source_name}') has neither destinations nor plugins")]
    EmptyMapping { index: usize, source_name: String },
    #[error("settings.convertible names an unknown basic type '{0}'")]
    UnknownConvertible(String),
}

/// Root of `km.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

/// Global generation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    /// Calling convention of generated functions; empty means `value`.
    #[serde(default)]
    pub style: Style,
    /// Go module path used to build cross-package imports.
    #[serde(default)]
    pub module: String,
    /// Directory of the configured paths relative to the module root.
    #[serde(default)]
    pub path_from_module: String,
    /// Basic kinds that convert into each other. Defaults to `int, int32, int64, float64, string`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convertible: Option<Vec<String>>,
}

/// One source type and everything generated from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Mapping {
    #[serde(default)]
    pub settings: MappingSettings,
    pub source: Endpoint,
    #[serde(default)]
    pub destination: Vec<DestinationSpec>,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MappingSettings {
    /// Accepted for compatibility; generation always rewrites the artifact.
    #[serde(default, rename = "override")]
    pub override_existing: bool,
}

/// A named type in a file, path relative to the config directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Endpoint {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DestinationSpec {
    pub name: String,
    pub path: String,
    /// Destination fields (names or dotted paths) never assigned.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Destination field → source field.
    #[serde(default)]
    pub map: BTreeMap<String, String>,
}

impl DestinationSpec {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            name: self.name.clone(),
            path: self.path.clone(),
        }
    }
}

impl Config {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.module.trim().is_empty() {
            return Err(ConfigError::MissingModule);
        }
        for (index, mapping) in self.mappings.iter().enumerate() {
            if mapping.destination.is_empty() && mapping.plugins.is_empty() {
                return Err(ConfigError::EmptyMapping {
                    index,
                    source_name: mapping.source.name.clone(),
                });
            }
        }
        self.conversion_table().map(|_| ())
    }

    pub fn conversion_table(&self) -> Result<ConversionTable, ConfigError> {
        match &self.settings.convertible {
            None => Ok(ConversionTable::default()),
            Some(names) => ConversionTable::from_names(names).map_err(ConfigError::UnknownConvertible),
        }
    }

    /// Settings handed to every worker; `header` is `None` for byte-stable output.
    pub fn generator_settings(&self, header: Option<FileHeader>) -> Result<GeneratorSettings, ConfigError> {
        Ok(GeneratorSettings {
            style: self.settings.style,
            module: ModulePath::new(&self.settings.module, &self.settings.path_from_module),
            conversions: self.conversion_table()?,
            header,
        })
    }
}
