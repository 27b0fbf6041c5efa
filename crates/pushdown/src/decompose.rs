//! Splits an annotated predicate into the part the target evaluates and
//! the residual the caller must still apply.
//!
//! For every split, `pushed AND residual` is equivalent to the source
//! predicate. A pushed AND may be a relaxation of its source conjunct (it
//! keeps only the pushable children); such a conjunct is then also kept in
//! the residual.

use crate::{
    builder::OperatorTree,
    node::{LogicOp, OperatorNode},
};
use model::execution::expr::ExprNode;

/// Part of the tree handed to the emitter.
#[derive(Debug, Clone, Copy)]
pub enum Pushed<'t, 'a> {
    /// The whole predicate.
    Whole(&'t OperatorNode<'a>),
    /// Pushable conjuncts of a root AND, in source order.
    Conjuncts(&'t [OperatorNode<'a>]),
}

impl<'t, 'a> Pushed<'t, 'a> {
    /// Top-level clauses that reach the document.
    pub fn conjuncts(&self) -> Vec<&'t OperatorNode<'a>> {
        match *self {
            Pushed::Whole(node) => vec![node],
            Pushed::Conjuncts(children) => children
                .iter()
                .filter(|child| child.is_optimizable())
                .collect(),
        }
    }

    /// The pushed predicate as a source expression.
    ///
    /// A relaxed conjunct is reported with its full source even though only
    /// its pushable children are rendered; the residual keeps it in full.
    pub fn to_expr(&self) -> ExprNode {
        match self {
            Pushed::Whole(node) => node.source.clone(),
            Pushed::Conjuncts(_) => ExprNode::and(
                self.conjuncts()
                    .into_iter()
                    .map(|child| child.source.clone())
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Decomposition<'t, 'a> {
    /// `None` means nothing is pushed.
    pub pushed: Option<Pushed<'t, 'a>>,
    /// `None` means the target filters completely.
    pub residual: Option<ExprNode>,
}

pub fn decompose<'t, 'a>(tree: &'t OperatorTree<'a>) -> Decomposition<'t, 'a> {
    let root = &tree.root;

    if tree.scan_all_table || !root.is_optimizable() {
        return Decomposition {
            pushed: None,
            residual: Some(root.source.clone()),
        };
    }

    if root.is_all_optimizable() {
        return Decomposition {
            pushed: Some(Pushed::Whole(root)),
            residual: None,
        };
    }

    match root.logic_op() {
        Some(LogicOp::And) => Decomposition {
            pushed: Some(Pushed::Conjuncts(root.children())),
            residual: residual_of_and(root),
        },
        // OR and NOT only push as a unit
        _ => Decomposition {
            pushed: None,
            residual: Some(root.source.clone()),
        },
    }
}

/// Conjunction of every child that does not push completely.
fn residual_of_and(node: &OperatorNode<'_>) -> Option<ExprNode> {
    let children = node.children();
    let residual = children
        .iter()
        .filter(|child| !child.is_all_optimizable())
        .map(|child| child.source.clone())
        .collect::<Vec<_>>();

    if residual.is_empty() {
        None
    } else if residual.len() == children.len() {
        Some(node.source.clone())
    } else {
        Some(ExprNode::and(residual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::TreeBuilder, sargable::EsSargableParser};
    use model::{core::value::Value, transform::mapping::FieldAlias};

    fn cmp(udf: &str, col: &str, v: i64) -> ExprNode {
        ExprNode::function(
            udf,
            vec![ExprNode::column(col), ExprNode::constant(Value::Int(v))],
        )
    }

    fn opaque(col: &str) -> ExprNode {
        ExprNode::function("GenericUDFUpper", vec![ExprNode::column(col)])
    }

    fn split(expr: &ExprNode) -> (Option<ExprNode>, Option<ExprNode>) {
        let alias = FieldAlias::default();
        let tree = TreeBuilder::new(&EsSargableParser, &alias).build(expr);
        let decomposition = decompose(&tree);
        (
            decomposition.pushed.map(|p| p.to_expr()),
            decomposition.residual,
        )
    }

    #[test]
    fn test_fully_pushable_has_no_residual() {
        let expr = ExprNode::and(vec![cmp(">", "a", 1), cmp("=", "b", 2)]);
        let (pushed, residual) = split(&expr);

        assert_eq!(pushed, Some(expr));
        assert_eq!(residual, None);
    }

    #[test]
    fn test_partial_and_keeps_every_blocked_conjunct() {
        let expr = ExprNode::and(vec![
            opaque("a"),
            cmp(">", "b", 1),
            opaque("c"),
            cmp("<", "d", 5),
            opaque("e"),
        ]);
        let (pushed, residual) = split(&expr);

        assert_eq!(
            pushed,
            Some(ExprNode::and(vec![cmp(">", "b", 1), cmp("<", "d", 5)]))
        );
        assert_eq!(
            residual,
            Some(ExprNode::and(vec![opaque("a"), opaque("c"), opaque("e")]))
        );
    }

    #[test]
    fn test_single_blocked_conjunct_is_the_residual() {
        let expr = ExprNode::and(vec![cmp(">", "a", 1), opaque("b")]);
        let (pushed, residual) = split(&expr);

        assert_eq!(pushed, Some(cmp(">", "a", 1)));
        assert_eq!(residual, Some(opaque("b")));
    }

    #[test]
    fn test_relaxed_nested_and_stays_in_residual() {
        let inner = ExprNode::function("or", vec![cmp("=", "a", 1), opaque("b")]);
        let nested = ExprNode::and(vec![cmp("=", "c", 1), opaque("d")]);
        let expr = ExprNode::and(vec![inner, nested.clone()]);

        let (pushed, residual) = split(&expr);

        assert_eq!(pushed, Some(nested));
        assert_eq!(residual, Some(expr));
    }

    #[test]
    fn test_or_and_not_push_only_as_unit() {
        let or = ExprNode::function("GenericUDFOPOr", vec![cmp("=", "a", 1), opaque("b")]);
        assert_eq!(split(&or), (None, Some(or.clone())));

        let partial = ExprNode::and(vec![cmp("=", "a", 1), opaque("b")]);
        let not = ExprNode::function("not", vec![partial]);
        assert_eq!(split(&not), (None, Some(not.clone())));
    }

    #[test]
    fn test_unsupported_root_falls_back_to_scan() {
        let expr = opaque("a");
        assert_eq!(split(&expr), (None, Some(expr.clone())));
    }
}
