//! Turns a user-supplied query into the filter document conjoined with
//! every pushed predicate.

use crate::settings::error::SettingsError;
use query_dsl::query::document::Document;
use serde_json::Value;

/// Parses query text. Blank text means no pre-filter.
pub fn parse_pre_filter(raw: &str) -> Result<Option<Document>, SettingsError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.starts_with('?') {
        return Err(SettingsError::UriQuery(raw.to_string()));
    }

    let value = serde_json::from_str::<Value>(raw)?;
    pre_filter_from_json(value)
}

/// Accepts a query DSL object, with or without the outer `query` wrapper.
/// A `match_all` query filters nothing and yields `None`.
pub fn pre_filter_from_json(value: Value) -> Result<Option<Document>, SettingsError> {
    let mut map = match value {
        Value::Object(map) => map,
        other => {
            return Err(SettingsError::InvalidQuery(format!(
                "expected a JSON object, got {other}"
            )));
        }
    };

    if map.len() == 1
        && let Some(inner) = map.remove("query")
    {
        return pre_filter_from_json(inner);
    }

    if map.is_empty() || (map.len() == 1 && map.contains_key("match_all")) {
        return Ok(None);
    }

    Ok(Some(Document::from(Value::Object(map))))
}
