use derived_aql::query::metadata::{InMemoryMetadata, LeafProperty, PropertyKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Entity catalog loaded from `entities.toml`.
#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
}

impl CliConfig {
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(default_config_path);
        let data = if let Some(config_path) = path.as_ref() {
            if config_path.exists() {
                read_file(config_path)?
            } else {
                RawConfig::default()
            }
        } else {
            RawConfig::default()
        };
        if let Some(default_name) = data.default_entity.as_ref() {
            if !data.entities.contains_key(default_name) {
                return Err(ConfigError::EntityNotFound {
                    name: default_name.clone(),
                });
            }
        }
        Ok(Self { path, data })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn default_entity(&self) -> Option<&str> {
        self.data.default_entity.as_deref()
    }

    pub fn entities(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.data
            .entities
            .iter()
            .map(|(name, raw)| (name.as_str(), raw.collection.as_str(), raw.properties.len()))
    }

    /// Picks the explicit entity, else the configured default.
    pub fn resolve_entity(&self, explicit: Option<&str>) -> Result<String, ConfigError> {
        let name = explicit
            .or(self.default_entity())
            .ok_or(ConfigError::NoEntity)?;
        if !self.data.entities.contains_key(name) {
            return Err(ConfigError::EntityNotFound {
                name: name.to_string(),
            });
        }
        Ok(name.to_string())
    }

    pub fn metadata(&self) -> InMemoryMetadata {
        let mut metadata = InMemoryMetadata::new();
        for (name, entity) in &self.data.entities {
            metadata = metadata.with_entity(name.as_str(), entity.collection.as_str());
            for (path, prop) in &entity.properties {
                let leaf = LeafProperty {
                    kind: prop.kind,
                    collection: prop.collection,
                };
                metadata = match &prop.field {
                    Some(field) => metadata.with_mapped_property(name, path.as_str(), field.as_str(), leaf),
                    None => metadata.with_property(name, path.as_str(), leaf),
                };
            }
        }
        metadata
    }
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    default_entity: Option<String>,
    #[serde(default)]
    entities: BTreeMap<String, RawEntity>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    collection: String,
    #[serde(default)]
    properties: BTreeMap<String, RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    #[serde(default)]
    field: Option<String>,
    #[serde(rename = "type", default)]
    kind: PropertyKind,
    #[serde(default)]
    collection: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read entity config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse entity config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("entity '{name}' not found in config")]
    EntityNotFound { name: String },
    #[error("no entity selected; pass --entity or set default_entity in the config")]
    NoEntity,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("aqlc").join("entities.toml"))
}
