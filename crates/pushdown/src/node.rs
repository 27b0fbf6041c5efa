use crate::sargable::Operator;
use model::{core::value::Value, execution::expr::ExprNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<'a> {
    /// `field op value` for `=`, `<`, `>`, `<=`, `>=`.
    Comparison {
        op: Operator,
        field: String,
        value: Value,
    },
    /// Inclusive `between`; `negated` for NOT BETWEEN.
    Range {
        field: String,
        low: Value,
        high: Value,
        negated: bool,
    },
    Membership {
        field: String,
        values: Vec<Value>,
    },
    NullCheck {
        field: String,
        is_null: bool,
    },
    Logic {
        op: LogicOp,
        children: Vec<OperatorNode<'a>>,
    },
    /// Kept for residual reconstruction; never pushed.
    Unsupported { reason: String },
}

/// Annotated view of one source expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorNode<'a> {
    pub source: &'a ExprNode,
    pub kind: NodeKind<'a>,
    optimizable: bool,
    all_optimizable: bool,
}

impl<'a> OperatorNode<'a> {
    /// Resolved leaf; pushable on its own.
    pub fn leaf(source: &'a ExprNode, kind: NodeKind<'a>) -> Self {
        Self {
            source,
            kind,
            optimizable: true,
            all_optimizable: true,
        }
    }

    pub fn unsupported(source: &'a ExprNode, reason: impl Into<String>) -> Self {
        Self {
            source,
            kind: NodeKind::Unsupported {
                reason: reason.into(),
            },
            optimizable: false,
            all_optimizable: false,
        }
    }

    /// AND pushes partially: optimizable as soon as one child is.
    pub fn and(source: &'a ExprNode, children: Vec<OperatorNode<'a>>) -> Self {
        let optimizable = children.iter().any(OperatorNode::is_optimizable);
        let all_optimizable = children.iter().all(OperatorNode::is_all_optimizable);
        Self::logic(source, LogicOp::And, children, optimizable, all_optimizable)
    }

    /// OR pushes only as a unit.
    pub fn or(source: &'a ExprNode, children: Vec<OperatorNode<'a>>) -> Self {
        let optimizable = children.iter().all(OperatorNode::is_optimizable);
        let all_optimizable = children.iter().all(OperatorNode::is_all_optimizable);
        Self::logic(source, LogicOp::Or, children, optimizable, all_optimizable)
    }

    /// NOT of a relaxed operand would be stricter than the source, so the
    /// operand must push completely.
    pub fn not(source: &'a ExprNode, operand: OperatorNode<'a>) -> Self {
        let optimizable = operand.is_all_optimizable();
        Self::logic(source, LogicOp::Not, vec![operand], optimizable, optimizable)
    }

    fn logic(
        source: &'a ExprNode,
        op: LogicOp,
        children: Vec<OperatorNode<'a>>,
        optimizable: bool,
        all_optimizable: bool,
    ) -> Self {
        Self {
            source,
            kind: NodeKind::Logic { op, children },
            optimizable,
            all_optimizable,
        }
    }

    pub fn is_optimizable(&self) -> bool {
        self.optimizable
    }

    pub fn is_all_optimizable(&self) -> bool {
        self.all_optimizable
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, NodeKind::Unsupported { .. })
    }

    pub fn logic_op(&self) -> Option<LogicOp> {
        match self.kind {
            NodeKind::Logic { op, .. } => Some(op),
            _ => None,
        }
    }

    pub fn children(&self) -> &[OperatorNode<'a>] {
        match &self.kind {
            NodeKind::Logic { children, .. } => children,
            _ => &[],
        }
    }
}
