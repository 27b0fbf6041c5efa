//! Defines the `Dialect` trait for the target engine's combinator syntax.
//!
//! Leaf clauses look the same in every version of the target query language;
//! only the way clauses are combined with AND / OR / NOT differs.

use crate::query::document::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect (e.g. "legacy", "modern").
    fn name(&self) -> &'static str;

    /// Combines clauses so that all of them must match.
    ///
    /// - Legacy uses an explicit combinator: `{"and": {"filters": [...]}}`
    /// - Modern uses a bool filter: `{"bool": {"filter": [...]}}`
    ///
    /// Empty clauses are skipped; `None` when nothing remains.
    fn and(&self, clauses: Vec<Document>) -> Option<Document>;

    /// Combines clauses so that at least one of them must match.
    fn or(&self, clauses: Vec<Document>) -> Option<Document>;

    /// Negates a single clause.
    fn not(&self, clause: Document) -> Option<Document>;
}

/// Selects the combinator syntax for a target engine version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectKind {
    /// Filter combinators used before the 5.x line.
    Legacy,
    /// Unified `bool` query with `filter` / `should` / `must_not` slots.
    #[default]
    Modern,
}

static LEGACY: Legacy = Legacy;
static MODERN: Modern = Modern;

impl DialectKind {
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            DialectKind::Legacy => &LEGACY,
            DialectKind::Modern => &MODERN,
        }
    }

    /// Picks the dialect from a target major version.
    pub fn for_major_version(major: u32) -> Self {
        if major >= 5 {
            DialectKind::Modern
        } else {
            DialectKind::Legacy
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dialect().name())
    }
}

#[derive(Debug, Clone)]
pub struct Legacy;

impl Legacy {
    fn combine(op: &str, clauses: Vec<Document>) -> Option<Document> {
        let mut filters = Document::object();
        for clause in clauses {
            filters.append_to_list("filters", clause);
        }
        let combined = Document::keyed(op, filters);
        (!combined.is_empty()).then_some(combined)
    }
}

impl Dialect for Legacy {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn and(&self, clauses: Vec<Document>) -> Option<Document> {
        Self::combine("and", clauses)
    }

    fn or(&self, clauses: Vec<Document>) -> Option<Document> {
        Self::combine("or", clauses)
    }

    fn not(&self, clause: Document) -> Option<Document> {
        let negated = Document::keyed("not", Document::keyed("filter", clause));
        (!negated.is_empty()).then_some(negated)
    }
}

#[derive(Debug, Clone)]
pub struct Modern;

impl Modern {
    /// `{"bool": {"filter": [clause]}}`
    fn filter_wrapper(clause: Document) -> Document {
        let mut body = Document::object();
        body.append_to_list("filter", clause);
        Document::keyed("bool", body)
    }

    /// Filter list of a `bool` whose only slot is `filter`.
    ///
    /// Such a clause is an AND of its filters and can be spliced into an
    /// enclosing AND.
    fn spliceable_filters(clause: &Document) -> Option<&[Document]> {
        let body = clause.get("bool")?;
        if clause.len() != 1 || body.len() != 1 {
            return None;
        }
        body.get_list("filter")
    }

    fn bool_with(slot: &str, wrapped: impl IntoIterator<Item = Document>) -> Option<Document> {
        let mut body = Document::object();
        for clause in wrapped {
            body.append_to_list(slot, Self::filter_wrapper(clause));
        }
        let combined = Document::keyed("bool", body);
        (!combined.is_empty()).then_some(combined)
    }
}

impl Dialect for Modern {
    fn name(&self) -> &'static str {
        "modern"
    }

    fn and(&self, clauses: Vec<Document>) -> Option<Document> {
        let mut body = Document::object();
        for clause in clauses {
            if clause.is_empty() {
                continue;
            }
            if let Some(filters) = Self::spliceable_filters(&clause) {
                for filter in filters {
                    body.append_to_list("filter", filter.clone());
                }
                continue;
            }
            body.append_to_list("filter", clause);
        }
        let combined = Document::keyed("bool", body);
        (!combined.is_empty()).then_some(combined)
    }

    fn or(&self, clauses: Vec<Document>) -> Option<Document> {
        Self::bool_with("should", clauses.into_iter().filter(|c| !c.is_empty()))
    }

    fn not(&self, clause: Document) -> Option<Document> {
        if clause.is_empty() {
            return None;
        }
        Self::bool_with("must_not", [clause])
    }
}
