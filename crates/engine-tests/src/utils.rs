use chrono::NaiveDate;
use engine_config::settings::validated::{PushdownSettings, PushdownSettingsBuilder};
use model::{core::value::Value, execution::expr::ExprNode};
use pushdown::{
    handler::{DecomposedPredicate, PredicateHandler},
    sargable::{EsSargableParser, Operator, SargableParser},
};
use query_dsl::query::dialect::DialectKind;
use regex::Regex;
use serde_json::Value as Json;
use std::{cmp::Ordering, collections::HashMap};

/// Test-only function the classifier has no mapping for.
pub const IS_EVEN_UDF: &str = "UDFIsEven";

/// One record, keyed by (lower-case) field name. Absent keys are NULL.
pub type Row = HashMap<String, Value>;

pub fn col(name: &str) -> ExprNode {
    ExprNode::column(name)
}

pub fn int(v: i64) -> ExprNode {
    ExprNode::constant(Value::Int(v))
}

pub fn text(v: &str) -> ExprNode {
    ExprNode::constant(Value::String(v.to_string()))
}

pub fn call(udf: &str, args: Vec<ExprNode>) -> ExprNode {
    ExprNode::function(udf, args)
}

pub fn cmp(udf: &str, column: &str, v: i64) -> ExprNode {
    call(udf, vec![col(column), int(v)])
}

pub fn is_even(column: &str) -> ExprNode {
    call(IS_EVEN_UDF, vec![col(column)])
}

pub fn or(args: Vec<ExprNode>) -> ExprNode {
    call("GenericUDFOPOr", args)
}

pub fn not(arg: ExprNode) -> ExprNode {
    call("GenericUDFOPNot", vec![arg])
}

pub fn row(entries: &[(&str, Value)]) -> Row {
    entries
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn settings(dialect: DialectKind) -> PushdownSettings {
    PushdownSettingsBuilder::new().dialect(dialect).build()
}

pub fn decompose(predicate: &ExprNode, dialect: DialectKind) -> DecomposedPredicate {
    PredicateHandler::new(settings(dialect)).decompose(predicate)
}

/// Parsed form of the emitted query text.
pub fn query_json(result: &DecomposedPredicate) -> Option<Json> {
    result
        .query
        .as_deref()
        .map(|text| serde_json::from_str(text).expect("query is valid JSON"))
}

/// Three-valued evaluation of a source predicate; `None` is UNKNOWN.
pub fn eval_expr(expr: &ExprNode, row: &Row) -> Option<bool> {
    let ExprNode::Function { udf, args } = expr else {
        return operand(expr, row).and_then(|v| v.as_bool());
    };

    if udf == IS_EVEN_UDF {
        return match operand(&args[0], row)? {
            Value::Int(v) => Some(v % 2 == 0),
            _ => None,
        };
    }

    let op = EsSargableParser
        .canonical_op(udf)
        .unwrap_or_else(|| panic!("no evaluator for {udf}"));

    match op {
        Operator::And => args.iter().fold(Some(true), |acc, arg| {
            match (acc, eval_expr(arg, row)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            }
        }),
        Operator::Or => args.iter().fold(Some(false), |acc, arg| {
            match (acc, eval_expr(arg, row)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            }
        }),
        Operator::Not => eval_expr(&args[0], row).map(|v| !v),
        Operator::IsNull => Some(operand(&args[0], row).is_none()),
        Operator::IsNotNull => Some(operand(&args[0], row).is_some()),
        Operator::Between => {
            let (invert, args) = match &args[0] {
                ExprNode::Constant(Value::Boolean(invert)) => (*invert, &args[1..]),
                _ => (false, &args[..]),
            };
            let x = operand(&args[0], row)?;
            let lo = operand(&args[1], row)?;
            let hi = operand(&args[2], row)?;
            let inside = x.compare(&lo)? != Ordering::Less && x.compare(&hi)? != Ordering::Greater;
            Some(inside != invert)
        }
        Operator::In => {
            let x = operand(&args[0], row)?;
            Some(args[1..].iter().any(|arg| operand(arg, row).is_some_and(|v| x.equal(&v))))
        }
        Operator::Regex => {
            let (Value::String(x), Value::String(pattern)) =
                (operand(&args[0], row)?, operand(&args[1], row)?)
            else {
                return None;
            };
            Some(find_match(&pattern, &x))
        }
        comparison => {
            let ordering = operand(&args[0], row)?.compare(&operand(&args[1], row)?)?;
            Some(match comparison {
                Operator::Eq => ordering == Ordering::Equal,
                Operator::NotEq => ordering != Ordering::Equal,
                Operator::Lt => ordering == Ordering::Less,
                Operator::LtEq => ordering != Ordering::Greater,
                Operator::Gt => ordering == Ordering::Greater,
                Operator::GtEq => ordering != Ordering::Less,
                other => panic!("unexpected operator {other}"),
            })
        }
    }
}

fn operand(expr: &ExprNode, row: &Row) -> Option<Value> {
    match expr {
        ExprNode::Column { name, .. } => row.get(&name.to_ascii_lowercase()).cloned(),
        ExprNode::Constant(Value::Null) => None,
        ExprNode::Constant(value) => Some(value.clone()),
        other => panic!("unsupported operand {other}"),
    }
}

/// Whether `row` matches a query document in either dialect.
pub fn eval_document(doc: &Json, row: &Row) -> bool {
    let Json::Object(map) = doc else {
        panic!("clause must be an object: {doc}");
    };
    map.iter().all(|(kind, body)| eval_clause(kind, body, row))
}

fn eval_clause(kind: &str, body: &Json, row: &Row) -> bool {
    match kind {
        "and" => list(&body["filters"]).iter().all(|d| eval_document(d, row)),
        "or" => list(&body["filters"]).iter().any(|d| eval_document(d, row)),
        "not" => !eval_document(&body["filter"], row),
        "bool" => {
            let all = |slot: &str| list(&body[slot]).iter().all(|d| eval_document(d, row));
            let should = list(&body["should"]);
            all("filter")
                && all("must")
                && (should.is_empty() || should.iter().any(|d| eval_document(d, row)))
                && !list(&body["must_not"]).iter().any(|d| eval_document(d, row))
        }
        "exists" => body["field"].as_str().is_some_and(|f| row.contains_key(f)),
        "term" => field_test(body, row, |x, v| compare_json(x, v) == Some(Ordering::Equal)),
        "terms" => field_test(body, row, |x, values| {
            list(values)
                .iter()
                .any(|v| compare_json(x, v) == Some(Ordering::Equal))
        }),
        "range" => field_test(body, row, |x, bounds| {
            let Json::Object(bounds) = bounds else {
                return false;
            };
            bounds.iter().all(|(bound, v)| {
                let Some(ordering) = compare_json(x, v) else {
                    return false;
                };
                match bound.as_str() {
                    "gt" => ordering == Ordering::Greater,
                    "gte" => ordering != Ordering::Less,
                    "lt" => ordering == Ordering::Less,
                    "lte" => ordering != Ordering::Greater,
                    other => panic!("unknown range bound {other}"),
                }
            })
        }),
        other => panic!("unknown clause {other}"),
    }
}

fn list(value: &Json) -> Vec<Json> {
    match value {
        Json::Array(items) => items.clone(),
        Json::Null => Vec::new(),
        single => vec![single.clone()],
    }
}

/// Applies `test` to the row value of the body's single field; missing
/// fields never match.
fn field_test(body: &Json, row: &Row, test: impl Fn(&Value, &Json) -> bool) -> bool {
    let Json::Object(map) = body else {
        return false;
    };
    map.iter()
        .all(|(field, arg)| row.get(field).is_some_and(|x| test(x, arg)))
}

/// Compares a row value with a JSON literal the way the target would after
/// coercing the literal to the field type.
fn compare_json(x: &Value, literal: &Json) -> Option<Ordering> {
    let literal = match (x, literal) {
        (Value::Date(_), Json::String(s)) => {
            Value::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?)
        }
        (_, Json::Number(n)) => match n.as_i64() {
            Some(v) => Value::Int(v),
            None => Value::Float(n.as_f64()?),
        },
        (_, Json::String(s)) => Value::String(s.clone()),
        (_, Json::Bool(b)) => Value::Boolean(*b),
        _ => return None,
    };
    x.compare(&literal)
}

/// Host regex semantics: the pattern may match anywhere in the value.
fn find_match(pattern: &str, text: &str) -> bool {
    Regex::new(pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}
