use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// Columns the host synthesizes per row; they never exist at the target.
    static ref VIRTUAL_COLUMNS: HashSet<&'static str> = [
        "input__file__name",
        "block__offset__inside__file",
        "row__offset__inside__block",
        "raw__data__size",
        "row__id",
        "grouping__id",
    ]
    .into_iter()
    .collect();
}

/// Case-insensitive mapping from source column names to target field names.
#[derive(Clone, Debug, Default)]
pub struct FieldAlias {
    source_to_target: HashMap<String, String>, // column -> field
}

impl FieldAlias {
    pub fn new(map: HashMap<String, String>) -> Self {
        let source_to_target = map
            .into_iter()
            .map(|(column, field)| (column.trim().to_ascii_lowercase(), field.trim().to_string()))
            .filter(|(column, field)| !column.is_empty() && !field.is_empty())
            .collect();

        Self { source_to_target }
    }

    /// Parses the `column:field,column:field` list format.
    pub fn parse(raw: &str) -> Self {
        Self::new(Self::parse_entries(raw))
    }

    /// Raw `column -> field` pairs of an alias list, trimmed. Entries without
    /// a `:` separator or with an empty side are ignored.
    pub fn parse_entries(raw: &str) -> HashMap<String, String> {
        raw.split(',')
            .filter_map(|entry| entry.split_once(':'))
            .map(|(column, field)| (column.trim().to_string(), field.trim().to_string()))
            .filter(|(column, field)| !column.is_empty() && !field.is_empty())
            .collect()
    }

    /// Resolves a source column to the target field it is stored under.
    ///
    /// Target fields keep their case; unmapped columns resolve to their
    /// lower-cased name. Returns `None` when no target field can exist for the
    /// column.
    pub fn resolve(&self, column: &str) -> Option<String> {
        let lower = column.trim().to_ascii_lowercase();
        if lower.is_empty() || VIRTUAL_COLUMNS.contains(lower.as_str()) {
            return None;
        }

        Some(self.source_to_target.get(&lower).cloned().unwrap_or(lower))
    }

    pub fn is_empty(&self) -> bool {
        self.source_to_target.is_empty()
    }

    pub fn len(&self) -> usize {
        self.source_to_target.len()
    }
}
