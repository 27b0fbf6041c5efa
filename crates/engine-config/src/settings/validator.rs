use crate::settings::{
    Settings,
    error::SettingsError,
    pre_filter::{parse_pre_filter, pre_filter_from_json},
    validated::{PushdownSettings, PushdownSettingsBuilder},
};
use model::transform::mapping::FieldAlias;
use std::collections::HashMap;
use tracing::{info, warn};

/// Validates user settings before a pushdown runs.
pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: &Settings) -> Result<PushdownSettings, SettingsError> {
        let mut builder = PushdownSettingsBuilder::new();
        let mut errors: Vec<String> = Vec::new();

        Self::validate_mapping(settings, &mut builder);
        Self::validate_version(settings, &mut builder, &mut errors);
        Self::validate_query(settings, &mut builder)?;

        if !errors.is_empty() {
            return Err(SettingsError::ValidationFailed(errors));
        }

        let validated = builder.build();
        info!(
            "Pushdown settings: dialect={}, aliases={}, pre_filter={}",
            validated.dialect(),
            validated.alias().len(),
            validated.has_pre_filter()
        );

        Ok(validated)
    }

    fn validate_mapping(settings: &Settings, builder: &mut PushdownSettingsBuilder) {
        if settings.mapping.is_empty() {
            return;
        }

        let alias = FieldAlias::new(settings.mapping.clone());
        if alias.len() < settings.mapping.len() {
            warn!(
                "Ignored {} blank column alias entries",
                settings.mapping.len() - alias.len()
            );
        }
        builder.alias = Some(alias);
    }

    fn validate_version(
        settings: &Settings,
        builder: &mut PushdownSettingsBuilder,
        errors: &mut Vec<String>,
    ) {
        if let Some(dialect) = settings.dialect {
            builder.dialect = Some(dialect);
        }

        let Some(version) = settings.version.as_deref().map(str::trim) else {
            return;
        };
        if version.is_empty() {
            return;
        }

        match parse_major_version(version) {
            Ok(major) => builder.major_version = Some(major),
            Err(err) => errors.push(err.to_string()),
        }
    }

    fn validate_query(
        settings: &Settings,
        builder: &mut PushdownSettingsBuilder,
    ) -> Result<(), SettingsError> {
        let pre_filter = match &settings.query {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(raw)) => parse_pre_filter(raw)?,
            Some(other) => pre_filter_from_json(other.clone())?,
        };

        builder.pre_filter = pre_filter;
        Ok(())
    }
}

/// Major component of a dotted version string (`"7.10.2"` -> 7).
pub fn parse_major_version(version: &str) -> Result<u32, SettingsError> {
    let major = version.trim().split('.').next().unwrap_or_default();
    major
        .trim()
        .parse::<u32>()
        .map_err(|_| SettingsError::InvalidVersion(version.to_string()))
}

impl PushdownSettings {
    /// Builds settings from a flat property map (`es.mapping.names`,
    /// `es.internal.es.version` / `es.version`, `es.query`).
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, SettingsError> {
        SettingsValidator::validate(&Settings::from_properties(properties))
    }

    /// Builds settings from a JSON settings document.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings = serde_json::from_str::<Settings>(text)?;
        SettingsValidator::validate(&settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{INTERNAL_VERSION, MAPPING_NAMES, QUERY, VERSION};
    use query_dsl::query::dialect::DialectKind;
    use serde_json::json;

    fn props(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_major_version() {
        assert_eq!(parse_major_version("7.10.2").unwrap(), 7);
        assert_eq!(parse_major_version(" 2 ").unwrap(), 2);
        assert!(parse_major_version("seven").is_err());
    }

    #[test]
    fn test_from_properties() {
        let settings = PushdownSettings::from_properties(&props(&[
            (MAPPING_NAMES, "age:person_age,name:fullName"),
            (VERSION, "2.4.1"),
            (QUERY, r#"{"query": {"term": {"tenant": "a"}}}"#),
        ]))
        .unwrap();

        assert_eq!(settings.dialect(), DialectKind::Legacy);
        assert_eq!(settings.alias().resolve("Name"), Some("fullName".to_string()));
        assert_eq!(
            settings.pre_filter().map(|d| d.to_json()),
            Some(json!({"term": {"tenant": "a"}}))
        );
    }

    #[test]
    fn test_property_aliases_are_trimmed_like_the_alias_list() {
        let properties = props(&[(MAPPING_NAMES, " Age : person_age , broken, :x")]);
        let raw = Settings::from_properties(&properties);
        assert_eq!(raw.mapping.len(), 1);

        let settings = PushdownSettings::from_properties(&properties).unwrap();
        assert_eq!(settings.alias().resolve("age"), Some("person_age".to_string()));
    }

    #[test]
    fn test_detected_version_wins_over_declared() {
        let settings = PushdownSettings::from_properties(&props(&[
            (INTERNAL_VERSION, "6.8.0"),
            (VERSION, "2.0.0"),
        ]))
        .unwrap();

        assert_eq!(settings.dialect(), DialectKind::Modern);
    }

    #[test]
    fn test_invalid_version_is_reported() {
        let result = PushdownSettings::from_properties(&props(&[(VERSION, "latest")]));
        assert!(matches!(result, Err(SettingsError::ValidationFailed(errors)) if errors.len() == 1));
    }

    #[test]
    fn test_from_json_settings_file() {
        let settings = PushdownSettings::from_json(
            r#"{
                "mapping": {"age": "person_age"},
                "dialect": "legacy",
                "query": {"match_all": {}}
            }"#,
        )
        .unwrap();

        assert_eq!(settings.dialect(), DialectKind::Legacy);
        assert!(!settings.has_pre_filter());
        assert_eq!(settings.alias().resolve("age"), Some("person_age".to_string()));
    }
}
