use model::transform::mapping::FieldAlias;
use query_dsl::query::dialect::DialectKind;
use serde::Deserialize;
use std::collections::HashMap;

pub mod error;
pub mod pre_filter;
pub mod validated;
pub mod validator;

/// Property holding the `column:field,...` alias list.
pub const MAPPING_NAMES: &str = "es.mapping.names";
/// Property holding the detected target version.
pub const INTERNAL_VERSION: &str = "es.internal.es.version";
/// User-declared target version, consulted when no detected version exists.
pub const VERSION: &str = "es.version";
/// Property holding the pre-filter query.
pub const QUERY: &str = "es.query";

/// Settings as supplied by the user, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Column -> field aliases.
    pub mapping: HashMap<String, String>,
    /// Target version, e.g. `"7.10.2"`.
    pub version: Option<String>,
    /// Overrides the dialect derived from `version`.
    pub dialect: Option<DialectKind>,
    /// Query DSL document, or its JSON text.
    pub query: Option<serde_json::Value>,
}

impl Settings {
    /// Collects the pushdown-relevant entries of a flat property map.
    pub fn from_properties(properties: &HashMap<String, String>) -> Self {
        let mapping = properties
            .get(MAPPING_NAMES)
            .map(|names| FieldAlias::parse_entries(names))
            .unwrap_or_default();

        let version = properties
            .get(INTERNAL_VERSION)
            .or_else(|| properties.get(VERSION))
            .cloned();

        let query = properties
            .get(QUERY)
            .map(|raw| serde_json::Value::String(raw.clone()));

        Self {
            mapping,
            version,
            dialect: None,
            query,
        }
    }
}
