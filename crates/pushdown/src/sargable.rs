//! Operator classification: canonical symbols, sargability and negation.
//!
//! The lookup tables are process-wide constants built on first use and never
//! mutated afterwards, so any number of threads may classify concurrently.

use lazy_static::lazy_static;
use serde::{Serialize, Serializer};
use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Between,
    IsNull,
    IsNotNull,
    In,
    Regex,
    And,
    Or,
    Not,
}

impl Operator {
    pub const ALL: [Operator; 14] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::Lt,
        Operator::Gt,
        Operator::LtEq,
        Operator::GtEq,
        Operator::Between,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::In,
        Operator::Regex,
        Operator::And,
        Operator::Or,
        Operator::Not,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::LtEq => "<=",
            Operator::GtEq => ">=",
            Operator::Between => "between",
            Operator::IsNull => "is null",
            Operator::IsNotNull => "is not null",
            Operator::In => "in",
            Operator::Regex => "regex",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    /// Parses a canonical symbol. Synonyms are not accepted here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| format!("Unknown operator: {s}"))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

lazy_static! {
    static ref SARGABLE_OPS: HashSet<Operator> = [
        Operator::Eq,
        Operator::Lt,
        Operator::Gt,
        Operator::LtEq,
        Operator::GtEq,
        Operator::Between,
        Operator::IsNull,
        Operator::IsNotNull,
    ]
    .into_iter()
    .collect();

    static ref RANGE_OPS: HashSet<Operator> = [
        Operator::Lt,
        Operator::Gt,
        Operator::LtEq,
        Operator::GtEq,
        Operator::Between,
    ]
    .into_iter()
    .collect();

    static ref LOGIC_OPS: HashSet<Operator> =
        [Operator::And, Operator::Or, Operator::Not].into_iter().collect();

    /// Host operator classes -> canonical operator.
    static ref FUNCTION_TO_OPERATOR: HashMap<&'static str, Operator> = HashMap::from([
        ("GenericUDFOPAnd", Operator::And),
        ("GenericUDFOPOr", Operator::Or),
        ("GenericUDFOPNot", Operator::Not),
        ("GenericUDFOPEqual", Operator::Eq),
        ("GenericUDFOPNotEqual", Operator::NotEq),
        ("GenericUDFOPEqualOrGreaterThan", Operator::GtEq),
        ("GenericUDFOPEqualOrLessThan", Operator::LtEq),
        ("GenericUDFOPGreaterThan", Operator::Gt),
        ("GenericUDFOPLessThan", Operator::Lt),
        ("GenericUDFBetween", Operator::Between),
        ("GenericUDFOPNull", Operator::IsNull),
        ("GenericUDFOPNotNull", Operator::IsNotNull),
        ("GenericUDFIn", Operator::In),
        ("UDFRegExp", Operator::Regex),
    ]);

    /// Logical negation; an involution over the comparison operators.
    static ref NEGATION: HashMap<Operator, Operator> = HashMap::from([
        (Operator::Lt, Operator::GtEq),
        (Operator::GtEq, Operator::Lt),
        (Operator::Gt, Operator::LtEq),
        (Operator::LtEq, Operator::Gt),
        (Operator::Eq, Operator::NotEq),
        (Operator::NotEq, Operator::Eq),
    ]);

    static ref SYNONYMS: HashMap<&'static str, &'static str> = HashMap::from([
        ("==", "="),
        ("<>", "!="),
        ("!", "not"),
        ("&&", "and"),
        ("||", "or"),
        ("rlike", "regex"),
    ]);
}

/// Classifies operator identifiers for pushdown.
///
/// `op` arguments accept host operator classes, canonical symbols and their
/// synonyms alike.
pub trait SargableParser: Send + Sync {
    /// Canonical operator for an identifier; `None` means no pushdown mapping.
    fn canonical_op(&self, identifier: &str) -> Option<Operator>;

    /// Canonical lower-case spelling; unknown spellings are only lower-cased.
    fn synonym_op(&self, spelling: &str) -> String;

    /// Negated operator, when negation can be expressed as a flipped comparison.
    fn reverse_op(&self, op: Operator) -> Option<Operator>;

    fn is_sargable_op(&self, op: &str) -> bool {
        self.canonical_op(op).is_some_and(is_sargable)
    }

    fn is_range_op(&self, op: &str) -> bool {
        self.canonical_op(op).is_some_and(is_range)
    }

    fn is_logic_op(&self, op: &str) -> bool {
        self.canonical_op(op).is_some_and(is_logic)
    }
}

pub fn is_sargable(op: Operator) -> bool {
    SARGABLE_OPS.contains(&op) && !LOGIC_OPS.contains(&op)
}

pub fn is_range(op: Operator) -> bool {
    RANGE_OPS.contains(&op)
}

pub fn is_logic(op: Operator) -> bool {
    LOGIC_OPS.contains(&op)
}

/// Classifier for the host's operator classes and the search engine's
/// query language.
#[derive(Debug, Clone, Copy, Default)]
pub struct EsSargableParser;

impl SargableParser for EsSargableParser {
    fn canonical_op(&self, identifier: &str) -> Option<Operator> {
        if let Some(op) = FUNCTION_TO_OPERATOR.get(identifier.trim()) {
            return Some(*op);
        }
        self.synonym_op(identifier).parse().ok()
    }

    fn synonym_op(&self, spelling: &str) -> String {
        let lower = spelling.trim().to_ascii_lowercase();
        match SYNONYMS.get(lower.as_str()) {
            Some(canonical) => canonical.to_string(),
            None => lower,
        }
    }

    fn reverse_op(&self, op: Operator) -> Option<Operator> {
        NEGATION.get(&op).copied()
    }
}

/// The classifier's full view of one identifier.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Classification {
    pub identifier: String,
    pub canonical: Option<Operator>,
    pub sargable: bool,
    pub range: bool,
    pub logic: bool,
    pub negation: Option<Operator>,
}

pub fn classify(parser: &dyn SargableParser, identifier: &str) -> Classification {
    let canonical = parser.canonical_op(identifier);
    Classification {
        identifier: identifier.to_string(),
        canonical,
        sargable: parser.is_sargable_op(identifier),
        range: parser.is_range_op(identifier),
        logic: parser.is_logic_op(identifier),
        negation: canonical.and_then(|op| parser.reverse_op(op)),
    }
}
