use crate::{
    node::{NodeKind, OperatorNode},
    sargable::{Operator, SargableParser},
};
use model::{core::value::Value, execution::expr::ExprNode, transform::mapping::FieldAlias};
use tracing::debug;

/// Annotated predicate tree.
#[derive(Debug, Clone)]
pub struct OperatorTree<'a> {
    pub root: OperatorNode<'a>,
    /// Nothing to push; the caller reads the whole table.
    pub scan_all_table: bool,
}

impl<'a> OperatorTree<'a> {
    pub fn source(&self) -> &'a ExprNode {
        self.root.source
    }
}

/// Converts a source predicate into an annotated [`OperatorTree`].
pub struct TreeBuilder<'p> {
    parser: &'p dyn SargableParser,
    alias: &'p FieldAlias,
}

impl<'p> TreeBuilder<'p> {
    pub fn new(parser: &'p dyn SargableParser, alias: &'p FieldAlias) -> Self {
        Self { parser, alias }
    }

    pub fn build<'a>(&self, expr: &'a ExprNode) -> OperatorTree<'a> {
        let root = self.build_node(expr);
        let scan_all_table = root.is_unsupported();
        OperatorTree {
            root,
            scan_all_table,
        }
    }

    fn build_node<'a>(&self, expr: &'a ExprNode) -> OperatorNode<'a> {
        let ExprNode::Function { udf, args } = expr else {
            return OperatorNode::unsupported(expr, "not a predicate");
        };

        let Some(op) = self.parser.canonical_op(udf) else {
            debug!("No pushdown mapping for operator {udf}");
            return OperatorNode::unsupported(expr, format!("unmapped operator {udf}"));
        };

        if args.is_empty() {
            return OperatorNode::unsupported(expr, format!("{op} without operands"));
        }

        match op {
            Operator::And => {
                let children = args.iter().map(|arg| self.build_node(arg)).collect();
                OperatorNode::and(expr, children)
            }
            Operator::Or => {
                let children = args.iter().map(|arg| self.build_node(arg)).collect();
                OperatorNode::or(expr, children)
            }
            Operator::Not => match args.as_slice() {
                [operand] => OperatorNode::not(expr, self.build_node(operand)),
                _ => OperatorNode::unsupported(expr, "not takes one operand"),
            },
            _ => self.build_leaf(expr, op, args),
        }
    }

    fn build_leaf<'a>(
        &self,
        expr: &'a ExprNode,
        op: Operator,
        args: &'a [ExprNode],
    ) -> OperatorNode<'a> {
        // membership clauses exist in every dialect; pattern matching does
        // not share the host's regex semantics and is never pushed
        let pushable = self.parser.is_sargable_op(op.symbol()) || op == Operator::In;
        if !pushable {
            return OperatorNode::unsupported(expr, format!("{op} is not sargable"));
        }

        let (negated, args) = match (op, args) {
            (Operator::Between, [ExprNode::Constant(Value::Boolean(invert)), rest @ ..])
                if rest.len() == 3 =>
            {
                (*invert, rest)
            }
            _ => (false, args),
        };

        let Some((ExprNode::Column { name, .. }, operands)) = args.split_first() else {
            return OperatorNode::unsupported(expr, "left operand is not a column");
        };

        let Some(field) = self.alias.resolve(name) else {
            return OperatorNode::unsupported(expr, format!("column {name} has no target field"));
        };

        let Some(mut values) = literals(operands) else {
            return OperatorNode::unsupported(expr, "operands are not literals");
        };

        let kind = match (op, values.len()) {
            (Operator::Eq | Operator::Lt | Operator::Gt | Operator::LtEq | Operator::GtEq, 1) => {
                NodeKind::Comparison {
                    op,
                    field,
                    value: values.remove(0),
                }
            }
            (Operator::Between, 2) => {
                let high = values.remove(1);
                let low = values.remove(0);
                NodeKind::Range {
                    field,
                    low,
                    high,
                    negated,
                }
            }
            (Operator::IsNull | Operator::IsNotNull, 0) => NodeKind::NullCheck {
                field,
                is_null: op == Operator::IsNull,
            },
            (Operator::In, n) if n > 0 => NodeKind::Membership { field, values },
            _ => {
                return OperatorNode::unsupported(
                    expr,
                    format!("{op} with {} operands", values.len()),
                );
            }
        };

        OperatorNode::leaf(expr, kind)
    }
}

/// Non-null constant values of `operands`, or `None` if any operand is
/// something else.
fn literals(operands: &[ExprNode]) -> Option<Vec<Value>> {
    operands
        .iter()
        .map(|operand| match operand {
            ExprNode::Constant(value) if !value.is_null() => Some(value.clone()),
            _ => None,
        })
        .collect()
}
