//! Entity metadata consumed by the compiler.
//!
//! Resolving a domain type to its collection and its logical property paths to
//! storage field paths is owned by the mapping layer. The compiler only sees it
//! through [`EntityMetadata`]; [`InMemoryMetadata`] backs tests and the CLI.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::query::ast::PropertyPath;
use crate::query::errors::{CompileError, Result};

/// Declared type of a leaf property, as far as case handling cares.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// Text; the only kind that can be lower-cased.
    String,
    /// Integer or floating point.
    Number,
    /// Boolean flag.
    Boolean,
    /// Geo location.
    Geo,
    /// Anything else (objects, dates, references).
    #[default]
    Other,
}

impl PropertyKind {
    /// Whether `LOWER()` is meaningful for this kind.
    pub fn is_lowerable(&self) -> bool {
        matches!(self, PropertyKind::String)
    }
}

/// Type information about the final segment of a property path.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LeafProperty {
    /// Element type (for collections) or value type.
    pub kind: PropertyKind,
    /// Whether the property holds a collection of `kind`.
    pub collection: bool,
}

impl LeafProperty {
    /// Single-valued property of `kind`.
    pub fn scalar(kind: PropertyKind) -> Self {
        Self {
            kind,
            collection: false,
        }
    }

    /// Collection-valued property whose elements are `kind`.
    pub fn collection(kind: PropertyKind) -> Self {
        Self {
            kind,
            collection: true,
        }
    }
}

/// Resolves entity names and property paths for the compiler.
pub trait EntityMetadata {
    /// Storage collection backing `entity`.
    fn collection_name(&self, entity: &str) -> Result<String>;
    /// Storage field path (dotted) for a logical property path.
    fn field_path(&self, entity: &str, path: &PropertyPath) -> Result<String>;
    /// Type information about the leaf of `path`.
    fn leaf_property(&self, entity: &str, path: &PropertyPath) -> Result<LeafProperty>;
}

#[derive(Clone, Debug)]
struct PropertyDef {
    field: Option<String>,
    leaf: LeafProperty,
}

#[derive(Clone, Debug)]
struct EntityDef {
    collection: String,
    properties: HashMap<String, PropertyDef>,
}

/// Simple in-memory metadata provider used for tests or prototyping.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMetadata {
    entities: HashMap<String, EntityDef>,
}

impl InMemoryMetadata {
    /// Creates a new empty in-memory metadata provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity and its collection. Re-registering keeps properties.
    pub fn with_entity(mut self, entity: impl Into<String>, collection: impl Into<String>) -> Self {
        let collection = collection.into();
        self.entities
            .entry(entity.into())
            .and_modify(|def| def.collection = collection.clone())
            .or_insert_with(|| EntityDef {
                collection,
                properties: HashMap::new(),
            });
        self
    }

    /// Registers a property stored under its logical path.
    pub fn with_property(
        self,
        entity: &str,
        path: impl Into<String>,
        leaf: LeafProperty,
    ) -> Self {
        self.insert_property(entity, path.into(), None, leaf)
    }

    /// Registers a property stored under a different field path.
    pub fn with_mapped_property(
        self,
        entity: &str,
        path: impl Into<String>,
        field: impl Into<String>,
        leaf: LeafProperty,
    ) -> Self {
        self.insert_property(entity, path.into(), Some(field.into()), leaf)
    }

    /// Registered entity names, sorted.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert_property(
        mut self,
        entity: &str,
        path: String,
        field: Option<String>,
        leaf: LeafProperty,
    ) -> Self {
        // Properties registered before their entity land in a placeholder
        // collection named after the entity.
        let def = self
            .entities
            .entry(entity.to_string())
            .or_insert_with(|| EntityDef {
                collection: entity.to_string(),
                properties: HashMap::new(),
            });
        def.properties.insert(path, PropertyDef { field, leaf });
        self
    }

    fn entity(&self, entity: &str) -> Result<&EntityDef> {
        self.entities
            .get(entity)
            .ok_or_else(|| CompileError::UnknownEntity {
                entity: entity.to_string(),
            })
    }

    fn property(&self, entity: &str, path: &PropertyPath) -> Result<&PropertyDef> {
        self.entity(entity)?
            .properties
            .get(&path.to_string())
            .ok_or_else(|| CompileError::unknown_property(entity, path))
    }
}

impl EntityMetadata for InMemoryMetadata {
    fn collection_name(&self, entity: &str) -> Result<String> {
        self.entity(entity).map(|def| def.collection.clone())
    }

    fn field_path(&self, entity: &str, path: &PropertyPath) -> Result<String> {
        let def = self.property(entity, path)?;
        Ok(def.field.clone().unwrap_or_else(|| path.to_string()))
    }

    fn leaf_property(&self, entity: &str, path: &PropertyPath) -> Result<LeafProperty> {
        self.property(entity, path).map(|def| def.leaf)
    }
}
