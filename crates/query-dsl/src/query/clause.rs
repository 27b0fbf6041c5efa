//! Leaf clause builders. These are identical across dialects.

use crate::query::document::Document;
use model::core::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeBound {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeBound::Gt => "gt",
            RangeBound::Gte => "gte",
            RangeBound::Lt => "lt",
            RangeBound::Lte => "lte",
        }
    }
}

/// Exact match: `{"term": {field: value}}`
pub fn term(field: &str, value: &Value) -> Document {
    let mut body = Document::object();
    body.set_key(field, value.to_json());
    Document::keyed("term", body)
}

/// Multi-value match: `{"terms": {field: [v1, v2, ...]}}`
pub fn terms(field: &str, values: &[Value]) -> Document {
    let list = Document::List(
        values
            .iter()
            .map(|v| Document::Scalar(v.to_json()))
            .collect(),
    );
    Document::keyed("terms", Document::keyed(field, list))
}

/// Bounded range: `{"range": {field: {"gte": lo, "lte": hi}}}`
pub fn range(field: &str, bounds: &[(RangeBound, &Value)]) -> Document {
    let mut limits = Document::object();
    for (bound, value) in bounds {
        limits.set_key(bound.as_str(), value.to_json());
    }
    Document::keyed("range", Document::keyed(field, limits))
}

/// Field presence: `{"exists": {"field": field}}`
pub fn exists(field: &str) -> Document {
    let mut body = Document::object();
    body.set_key("field", serde_json::Value::String(field.to_string()));
    Document::keyed("exists", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_clauses() {
        assert_eq!(
            term("name", &Value::String("x".into())).to_json(),
            json!({"term": {"name": "x"}})
        );
        assert_eq!(
            terms("id", &[Value::Int(1), Value::Int(2)]).to_json(),
            json!({"terms": {"id": [1, 2]}})
        );
        assert_eq!(exists("email").to_json(), json!({"exists": {"field": "email"}}));
    }

    #[test]
    fn test_range_keeps_bound_order() {
        let lo = Value::Int(1);
        let hi = Value::Int(9);
        let doc = range("age", &[(RangeBound::Gte, &lo), (RangeBound::Lte, &hi)]);

        assert_eq!(doc.to_string(), r#"{"range":{"age":{"gte":1,"lte":9}}}"#);
    }

    #[test]
    fn test_empty_terms_list_yields_empty_clause() {
        assert!(terms("id", &[]).is_empty());
        assert!(range("age", &[]).is_empty());
    }
}
