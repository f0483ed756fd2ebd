//! Parameter definition tables.
//!
//! Defines the data structures describing how a synthesizer parameter's raw
//! normalized value is displayed: its human-readable name, the mapping range a
//! continuous value scales into, discrete item labels, and references to
//! shared, versioned item lists. Tables are deserialized from JSON and consulted
//! by the display resolver in `preset_diff_core`.

#![warn(missing_docs)]

mod cache;

pub use cache::TableCache;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Current format version for the parameter table JSON schema.
pub const TABLE_FORMAT_VERSION: &str = "1";

/// Errors that can occur when loading a parameter table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file could not be read.
    #[error("failed to read parameter table {}", path.display())]
    Io {
        /// Path of the table file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The table file is not valid table JSON.
    #[error("invalid parameter table JSON in {}", path.display())]
    InvalidJson {
        /// Path of the table file (empty when loaded from a string).
        path: PathBuf,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The table declares a format version this build does not read.
    #[error(
        "unsupported parameter table format version {found:?} (expected {expected:?})",
        expected = TABLE_FORMAT_VERSION
    )]
    UnsupportedVersion {
        /// The declared `formatVersion`.
        found: String,
    },

    /// A parameter definition failed validation.
    #[error("invalid parameter {name:?}: {reason}")]
    InvalidParam {
        /// The parameter name (may be empty).
        name: String,
        /// A human-readable explanation of the problem.
        reason: String,
    },
}

/// One parameter definition table.
///
/// Holds every parameter definition and named item list declared by one source
/// file. Lookups by name go through lazily built indexes; the first
/// declaration of a name wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamTable {
    /// Table format version; must equal [`TABLE_FORMAT_VERSION`].
    #[serde(default = "default_format_version")]
    pub format_version: String,
    /// All parameter definitions, in declaration order.
    #[serde(default)]
    pub params: Vec<ParamDef>,
    /// Named item lists referenced by parameter definitions.
    #[serde(default)]
    pub item_lists: Vec<ItemList>,

    /// Cached map from parameter name → index of its first definition.
    #[serde(skip)]
    param_index: OnceLock<HashMap<String, usize>>,
    /// Cached map from item list name → index into `item_lists`.
    #[serde(skip)]
    list_index: OnceLock<HashMap<String, usize>>,
}

fn default_format_version() -> String {
    TABLE_FORMAT_VERSION.to_string()
}

impl ParamTable {
    /// Create a table from definitions and item lists.
    /// Index fields are initialized lazily on first lookup.
    pub fn new(params: Vec<ParamDef>, item_lists: Vec<ItemList>) -> Self {
        Self {
            format_version: default_format_version(),
            params,
            item_lists,
            param_index: OnceLock::new(),
            list_index: OnceLock::new(),
        }
    }

    fn param_index(&self) -> &HashMap<String, usize> {
        self.param_index.get_or_init(|| {
            let mut m = HashMap::with_capacity(self.params.len());
            for (i, p) in self.params.iter().enumerate() {
                m.entry(p.name.clone()).or_insert(i);
            }
            m
        })
    }

    fn list_index(&self) -> &HashMap<String, usize> {
        self.list_index.get_or_init(|| {
            let mut m = HashMap::with_capacity(self.item_lists.len());
            for (i, l) in self.item_lists.iter().enumerate() {
                m.entry(l.name.clone()).or_insert(i);
            }
            m
        })
    }

    /// Look up the first definition named `name`.
    pub fn param(&self, name: &str) -> Option<&ParamDef> {
        self.param_index().get(name).map(|&i| &self.params[i])
    }

    /// Look up a named item list's labels.
    pub fn item_list(&self, name: &str) -> Option<&[String]> {
        self.list_index()
            .get(name)
            .map(|&i| self.item_lists[i].items.as_slice())
    }

    /// Number of parameter definitions (including shadowed duplicates).
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the table declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Definition of a single parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParamDef {
    /// Parameter key as it appears in the preset (e.g. `"Vcf_Cutoff"`).
    pub name: String,
    /// Human-readable name (e.g. `"Cutoff"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Lower end of the mapping range (default `0`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_min: Option<f64>,
    /// Upper end of the mapping range (default `1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_max: Option<f64>,
    /// Discrete, ordered item labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    /// Names of item lists this parameter refers to, one per version
    /// (e.g. `"Osc1_Type_V1.9.0"`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_lists: Vec<String>,
}

impl ParamDef {
    /// Create a plain definition with no range, items, or list references.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            mapping_min: None,
            mapping_max: None,
            items: Vec::new(),
            item_lists: Vec::new(),
        }
    }

    /// The `(min, max)` mapping range, defaulting to `(0, 1)`.
    pub fn mapping(&self) -> (f64, f64) {
        (self.mapping_min.unwrap_or(0.0), self.mapping_max.unwrap_or(1.0))
    }

    /// Whether the definition declares its own mapping range.
    pub fn has_explicit_mapping(&self) -> bool {
        self.mapping_min.is_some() || self.mapping_max.is_some()
    }

    /// Whether the discrete items are a pure numeric passthrough.
    ///
    /// Signalled by an absolute `from` marker on the first item.
    pub fn is_passthrough(&self) -> bool {
        self.items.first().is_some_and(|i| i.from.is_some())
    }

    /// Whether this definition refers to the item list `list_name`.
    pub fn references_list(&self, list_name: &str) -> bool {
        self.item_lists.iter().any(|n| n == list_name)
    }
}

/// One discrete item of a parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Item {
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Absolute start value. Present on the first item of numeric passthrough
    /// parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
}

impl Item {
    /// A labelled item.
    pub fn labelled(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            from: None,
        }
    }
}

/// A named, ordered list of labels shared between parameters or versions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemList {
    /// List name, conventionally `"{param}_V{version}"`.
    pub name: String,
    /// Ordered labels.
    #[serde(default)]
    pub items: Vec<String>,
}

/// Name of the item list holding `param`'s labels for `version`.
pub fn item_list_name(param: &str, version: &str) -> String {
    format!("{param}_V{version}")
}

/// Parse and validate a table from a JSON string.
pub fn load_table_from_str(json: &str) -> Result<ParamTable, TableError> {
    let table: ParamTable =
        serde_json::from_str(json).map_err(|source| TableError::InvalidJson {
            path: PathBuf::new(),
            source,
        })?;
    validate_table(&table)?;
    Ok(table)
}

/// Read, parse and validate a table file.
pub fn load_table(path: &Path) -> Result<ParamTable, TableError> {
    let json = std::fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table: ParamTable =
        serde_json::from_str(&json).map_err(|source| TableError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
    validate_table(&table)?;
    Ok(table)
}

fn validate_table(table: &ParamTable) -> Result<(), TableError> {
    if table.format_version != TABLE_FORMAT_VERSION {
        return Err(TableError::UnsupportedVersion {
            found: table.format_version.clone(),
        });
    }
    for p in &table.params {
        if p.name.trim().is_empty() {
            return Err(TableError::InvalidParam {
                name: p.name.clone(),
                reason: "name must not be empty".into(),
            });
        }
        for (field, bound) in [("mappingMin", p.mapping_min), ("mappingMax", p.mapping_max)] {
            if bound.is_some_and(|v| !v.is_finite()) {
                return Err(TableError::InvalidParam {
                    name: p.name.clone(),
                    reason: format!("{field} must be finite"),
                });
            }
        }
    }
    Ok(())
}
