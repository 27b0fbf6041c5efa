#[cfg(test)]
mod tests {
    use crate::utils::{
        call, cmp, col, decompose, eval_document, eval_expr, int, is_even, not, or, query_json,
        row, settings, text,
    };
    use engine_config::settings::validated::{PushdownSettings, PushdownSettingsBuilder};
    use model::{core::value::Value, execution::expr::ExprNode, transform::mapping::FieldAlias};
    use pushdown::handler::PredicateHandler;
    use query_dsl::query::{dialect::DialectKind, document::Document};
    use serde_json::json;
    use std::collections::HashMap;
    use tracing_test::traced_test;

    // Scenario: age > 30 AND name = 'x' AND an unmapped function.
    // Expected Outcome: the two comparisons are pushed, the function is the residual.
    #[traced_test]
    #[test]
    fn partial_and_pushes_supported_conjuncts() {
        let predicate = ExprNode::and(vec![
            cmp("GenericUDFOPGreaterThan", "age", 30),
            call("GenericUDFOPEqual", vec![col("name"), text("x")]),
            is_even("score"),
        ]);

        let result = decompose(&predicate, DialectKind::Modern);

        assert_eq!(
            result.pushed,
            Some(ExprNode::and(vec![
                cmp("GenericUDFOPGreaterThan", "age", 30),
                call("GenericUDFOPEqual", vec![col("name"), text("x")]),
            ]))
        );
        assert_eq!(result.residual, Some(is_even("score")));
        assert_eq!(
            query_json(&result),
            Some(json!({"bool": {"filter": [
                {"range": {"age": {"gt": 30}}},
                {"term": {"name": "x"}}
            ]}}))
        );

        let legacy = decompose(&predicate, DialectKind::Legacy);
        assert_eq!(
            query_json(&legacy),
            Some(json!({"and": {"filters": [
                {"range": {"age": {"gt": 30}}},
                {"term": {"name": "x"}}
            ]}}))
        );
        assert!(logs_contain("residual"));
    }

    // Scenario: a = 1 OR b = 2, both sargable.
    // Expected Outcome: the disjunction is pushed whole with no residual.
    #[traced_test]
    #[test]
    fn fully_pushable_or() {
        let predicate = or(vec![cmp("=", "a", 1), cmp("=", "b", 2)]);

        let result = decompose(&predicate, DialectKind::Modern);

        assert_eq!(result.pushed, Some(predicate.clone()));
        assert_eq!(result.residual, None);
        assert_eq!(
            query_json(&result),
            Some(json!({"bool": {"should": [
                {"bool": {"filter": [{"term": {"a": 1}}]}},
                {"bool": {"filter": [{"term": {"b": 2}}]}}
            ]}}))
        );

        let legacy = decompose(&predicate, DialectKind::Legacy);
        assert_eq!(
            query_json(&legacy),
            Some(json!({"or": {"filters": [{"term": {"a": 1}}, {"term": {"b": 2}}]}}))
        );
    }

    // Scenario: a = 1 OR an unmapped function.
    // Expected Outcome: nothing is pushed; the whole disjunction is the residual.
    #[traced_test]
    #[test]
    fn or_with_unsupported_branch_is_not_pushed() {
        let predicate = or(vec![cmp("=", "a", 1), is_even("b")]);

        let result = decompose(&predicate, DialectKind::Modern);

        assert_eq!(result.pushed, None);
        assert_eq!(result.residual, Some(predicate));
        assert_eq!(result.query, None);
        assert!(logs_contain("Nothing pushed"));
    }

    // Scenario: NOT (age < 10).
    // Expected Outcome: pushed as age >= 10 without a negation wrapper.
    #[traced_test]
    #[test]
    fn not_of_comparison_is_reversed() {
        let predicate = not(cmp("GenericUDFOPLessThan", "age", 10));

        for dialect in [DialectKind::Legacy, DialectKind::Modern] {
            let result = decompose(&predicate, dialect);

            assert_eq!(result.pushed, Some(predicate.clone()));
            assert_eq!(result.residual, None);
            assert_eq!(
                query_json(&result),
                Some(json!({"range": {"age": {"gte": 10}}}))
            );
        }
    }

    // Scenario: unmapped root or malformed tree.
    // Expected Outcome: full fallback scan with the original predicate as residual.
    #[traced_test]
    #[test]
    fn unsupported_root_scans_everything() {
        for predicate in [
            is_even("a"),
            call("GenericUDFOPAnd", vec![]),
            col("flag"),
            not(is_even("a")),
        ] {
            let result = decompose(&predicate, DialectKind::Modern);

            assert_eq!(result.pushed, None);
            assert_eq!(result.residual, Some(predicate));
            assert_eq!(result.query, None);
        }
    }

    // Scenario: several non-pushable conjuncts around pushable ones.
    // Expected Outcome: every blocked conjunct survives in the residual, in order.
    #[traced_test]
    #[test]
    fn multi_way_residual_keeps_all_blocked_conjuncts() {
        let predicate = ExprNode::and(vec![
            is_even("a"),
            cmp("=", "b", 1),
            is_even("c"),
            or(vec![cmp("=", "d", 1), is_even("e")]),
        ]);

        let result = decompose(&predicate, DialectKind::Legacy);

        assert_eq!(result.pushed, Some(cmp("=", "b", 1)));
        assert_eq!(
            result.residual,
            Some(ExprNode::and(vec![
                is_even("a"),
                is_even("c"),
                or(vec![cmp("=", "d", 1), is_even("e")]),
            ]))
        );
        assert_eq!(query_json(&result), Some(json!({"term": {"b": 1}})));
    }

    // Scenario: alias map and a pre-filter from connector properties.
    // Expected Outcome: fields are renamed and the pre-filter leads the conjunction.
    #[traced_test]
    #[test]
    fn alias_and_pre_filter_from_properties() {
        let properties: HashMap<String, String> = [
            ("es.mapping.names", "Age:person_age"),
            ("es.version", "7.10.2"),
            ("es.query", r#"{"query": {"term": {"tenant": "t1"}}}"#),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let settings = PushdownSettings::from_properties(&properties).unwrap();

        let predicate = call(
            "GenericUDFBetween",
            vec![
                ExprNode::constant(Value::Boolean(false)),
                col("AGE"),
                int(18),
                int(65),
            ],
        );
        let result = PredicateHandler::new(settings).decompose(&predicate);

        assert_eq!(
            query_json(&result),
            Some(json!({"bool": {"filter": [
                {"term": {"tenant": "t1"}},
                {"range": {"person_age": {"gte": 18, "lte": 65}}}
            ]}}))
        );
    }

    // Scenario: nothing pushable but a pre-filter is configured.
    // Expected Outcome: the query carries only the pre-filter; the predicate stays residual.
    #[traced_test]
    #[test]
    fn pre_filter_alone_is_still_emitted() {
        let settings = PushdownSettingsBuilder::new()
            .dialect(DialectKind::Legacy)
            .pre_filter(Document::from(json!({"term": {"tenant": "t1"}})))
            .build();
        let predicate = is_even("a");

        let result = PredicateHandler::new(settings).decompose(&predicate);

        assert_eq!(result.pushed, None);
        assert_eq!(result.residual, Some(predicate));
        assert_eq!(
            query_json(&result),
            Some(json!({"and": {"filters": [{"term": {"tenant": "t1"}}]}}))
        );
    }

    // Scenario: host virtual columns and struct fields.
    // Expected Outcome: such comparisons are never pushed.
    #[traced_test]
    #[test]
    fn virtual_columns_and_struct_fields_stay_residual() {
        let field = ExprNode::Field {
            base: Box::new(col("address")),
            name: "city".into(),
        };
        let predicate = ExprNode::and(vec![
            call("=", vec![col("BLOCK__OFFSET__INSIDE__FILE"), int(0)]),
            call("=", vec![field, text("Oslo")]),
            cmp(">", "age", 1),
        ]);

        let alias = FieldAlias::default();
        assert!(alias.resolve("BLOCK__OFFSET__INSIDE__FILE").is_none());

        let result = PredicateHandler::new(settings(DialectKind::Modern)).decompose(&predicate);

        assert_eq!(result.pushed, Some(cmp(">", "age", 1)));
        assert_eq!(result.residual.as_ref().map(|r| r.args().len()), Some(2));
    }

    // Scenario: membership, pattern and null checks in one conjunction.
    // Expected Outcome: membership and null checks push; the pattern stays residual.
    #[traced_test]
    #[test]
    fn leaf_clause_families() {
        let pattern = call("UDFRegExp", vec![col("name"), text("jo")]);
        let predicate = ExprNode::and(vec![
            call("GenericUDFIn", vec![col("status"), text("new"), text("open")]),
            pattern.clone(),
            call("GenericUDFOPNull", vec![col("deleted_at")]),
        ]);

        let result = decompose(&predicate, DialectKind::Modern);

        assert_eq!(result.residual, Some(pattern));
        assert_eq!(
            query_json(&result),
            Some(json!({"bool": {"filter": [
                {"terms": {"status": ["new", "open"]}},
                {"bool": {"must_not": [{"bool": {"filter": [
                    {"exists": {"field": "deleted_at"}}
                ]}}]}}
            ]}}))
        );
    }

    // Scenario: name rlike 'jo' against a row holding 'john'.
    // Expected Outcome: nothing is pushed, so the row is not lost before the host sees it.
    #[traced_test]
    #[test]
    fn pattern_match_is_left_to_the_host() {
        let predicate = call("rlike", vec![col("name"), text("jo")]);
        let r = row(&[("name", Value::String("john".into()))]);

        let result = decompose(&predicate, DialectKind::Modern);

        assert_eq!(result.query, None);
        assert_eq!(result.residual, Some(predicate.clone()));
        assert_eq!(eval_expr(&predicate, &r), Some(true));
    }

    // Scenario: negated leaves evaluated on a row where the field is NULL.
    // Expected Outcome: the host rejects the row and so does the pushed query.
    #[traced_test]
    #[test]
    fn negated_leaves_reject_missing_fields() {
        let r = row(&[("a", Value::Int(1)), ("b", Value::Null)]);
        let between = call(
            "GenericUDFBetween",
            vec![ExprNode::constant(Value::Boolean(true)), col("b"), int(1), int(2)],
        );

        for predicate in [
            not(cmp("=", "b", 3)),
            not(call("GenericUDFIn", vec![col("b"), int(2), int(3)])),
            between,
            not(or(vec![cmp("=", "a", 2), cmp("=", "b", 2)])),
        ] {
            for dialect in [DialectKind::Legacy, DialectKind::Modern] {
                let result = decompose(&predicate, dialect);
                let query = query_json(&result).unwrap();

                assert_eq!(result.residual, None, "{predicate}");
                assert_ne!(eval_expr(&predicate, &r), Some(true));
                assert!(!eval_document(&query, &r), "{predicate} [{dialect}] kept {r:?}");
            }
        }
    }
}
