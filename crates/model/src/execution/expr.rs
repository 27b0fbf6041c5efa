use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator class the host planner uses for conjunctions.
pub const AND_UDF: &str = "GenericUDFOPAnd";

/// Boolean filter expression as handed over by the host query planner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExprNode {
    /// Direct reference to a table column.
    Column {
        name: String,
        #[serde(default)]
        table: Option<String>,
    },
    Constant(Value),
    /// Function or operator application. `udf` is the host's operator-class
    /// identifier (e.g. `GenericUDFOPGreaterThan`) or an operator spelling.
    Function { udf: String, args: Vec<ExprNode> },
    /// Struct field access on another expression.
    Field { base: Box<ExprNode>, name: String },
}

impl ExprNode {
    pub fn column(name: &str) -> Self {
        ExprNode::Column {
            name: name.to_string(),
            table: None,
        }
    }

    pub fn constant(value: Value) -> Self {
        ExprNode::Constant(value)
    }

    pub fn function(udf: &str, args: Vec<ExprNode>) -> Self {
        ExprNode::Function {
            udf: udf.to_string(),
            args,
        }
    }

    /// Conjunction of `args`, collapsing the single-operand case.
    pub fn and(mut args: Vec<ExprNode>) -> Self {
        if args.len() == 1 {
            return args.remove(0);
        }
        Self::function(AND_UDF, args)
    }

    pub fn args(&self) -> &[ExprNode] {
        match self {
            ExprNode::Function { args, .. } => args,
            _ => &[],
        }
    }
}

fn infix_symbol(udf: &str) -> Option<&'static str> {
    match udf {
        "GenericUDFOPEqual" | "=" | "==" => Some("="),
        "GenericUDFOPNotEqual" | "!=" | "<>" => Some("!="),
        "GenericUDFOPGreaterThan" | ">" => Some(">"),
        "GenericUDFOPLessThan" | "<" => Some("<"),
        "GenericUDFOPEqualOrGreaterThan" | ">=" => Some(">="),
        "GenericUDFOPEqualOrLessThan" | "<=" => Some("<="),
        "GenericUDFOPAnd" | "and" | "&&" => Some("and"),
        "GenericUDFOPOr" | "or" | "||" => Some("or"),
        "UDFRegExp" | "regex" | "rlike" => Some("rlike"),
        _ => None,
    }
}

fn join_args(args: &[ExprNode]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_function(f: &mut fmt::Formatter<'_>, udf: &str, args: &[ExprNode]) -> fmt::Result {
    if let Some(symbol) = infix_symbol(udf)
        && args.len() >= 2
    {
        let parts = args.iter().map(|arg| arg.to_string()).collect::<Vec<_>>();
        return write!(f, "({})", parts.join(format!(" {symbol} ").as_str()));
    }

    match (udf, args) {
        ("GenericUDFOPNot" | "not" | "!", [operand]) => write!(f, "(not {operand})"),
        ("GenericUDFOPNull" | "is null", [operand]) => write!(f, "({operand} is null)"),
        ("GenericUDFOPNotNull" | "is not null", [operand]) => {
            write!(f, "({operand} is not null)")
        }
        ("GenericUDFBetween" | "between", [ExprNode::Constant(Value::Boolean(invert)), x, lo, hi]) => {
            let not = if *invert { "not " } else { "" };
            write!(f, "({x} {not}between {lo} and {hi})")
        }
        ("GenericUDFBetween" | "between", [x, lo, hi]) => write!(f, "({x} between {lo} and {hi})"),
        ("GenericUDFIn" | "in", [x, rest @ ..]) if !rest.is_empty() => {
            write!(f, "({x} in ({}))", join_args(rest))
        }
        _ => write!(f, "{udf}({})", join_args(args)),
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Column {
                name,
                table: Some(table),
            } => write!(f, "{table}.{name}"),
            ExprNode::Column { name, table: None } => write!(f, "{name}"),
            ExprNode::Constant(value) => write!(f, "{value}"),
            ExprNode::Function { udf, args } => fmt_function(f, udf, args),
            ExprNode::Field { base, name } => write!(f, "{base}.{name}"),
        }
    }
}
