use crate::{
    decompose::Pushed,
    node::{LogicOp, NodeKind, OperatorNode},
    sargable::{Operator, SargableParser},
};
use model::core::value::Value;
use query_dsl::query::{
    clause::{self, RangeBound},
    dialect::Dialect,
    document::Document,
};
use tracing::{debug, warn};

/// Renders pushed predicates into target query documents.
pub struct QueryEmitter<'p> {
    parser: &'p dyn SargableParser,
    dialect: &'p dyn Dialect,
}

impl<'p> QueryEmitter<'p> {
    pub fn new(parser: &'p dyn SargableParser, dialect: &'p dyn Dialect) -> Self {
        Self { parser, dialect }
    }

    /// Final query: the pre-filter, when present, is conjoined ahead of the
    /// pushed predicate. `None` when there is nothing to send.
    pub fn emit(
        &self,
        pushed: Option<&Pushed<'_, '_>>,
        pre_filter: Option<&Document>,
    ) -> Option<Document> {
        let rendered = pushed.and_then(|pushed| self.render_pushed(pushed));

        match (pre_filter, rendered) {
            (None, rendered) => rendered,
            (Some(pre_filter), rendered) => {
                let mut clauses = vec![pre_filter.clone()];
                clauses.extend(rendered);
                self.dialect.and(clauses)
            }
        }
    }

    pub fn render_pushed(&self, pushed: &Pushed<'_, '_>) -> Option<Document> {
        match pushed {
            Pushed::Whole(node) => self.render(node),
            Pushed::Conjuncts(_) => match pushed.conjuncts().as_slice() {
                [single] => self.render(single),
                conjuncts => self
                    .dialect
                    .and(conjuncts.iter().filter_map(|child| self.render(child)).collect()),
            },
        }
    }

    /// Renders an optimizable node. Non-optimizable children of an AND are
    /// skipped.
    pub fn render(&self, node: &OperatorNode<'_>) -> Option<Document> {
        match &node.kind {
            NodeKind::Comparison { op, field, value } => self.render_comparison(*op, field, value),
            NodeKind::Range {
                field,
                low,
                high,
                negated,
            } => {
                let range = Self::range(field, low, high);
                if *negated {
                    self.present_and_not(field, range)
                } else {
                    Some(range)
                }
            }
            NodeKind::Membership { field, values } => Some(clause::terms(field, values)),
            NodeKind::NullCheck { field, is_null } => self.render_null_check(field, *is_null),
            NodeKind::Logic { op, children } => match op {
                LogicOp::And => self.render_and(children),
                LogicOp::Or => {
                    let clauses = children
                        .iter()
                        .map(|child| self.render(child))
                        .collect::<Option<Vec<_>>>()?;
                    self.dialect.or(clauses)
                }
                LogicOp::Not => children.first().and_then(|operand| self.render_false(operand)),
            },
            NodeKind::Unsupported { reason } => {
                warn!("Skipping unsupported predicate {}: {reason}", node.source);
                None
            }
        }
    }

    fn render_and(&self, children: &[OperatorNode<'_>]) -> Option<Document> {
        let clauses = children
            .iter()
            .filter(|child| child.is_optimizable())
            .filter_map(|child| self.render(child))
            .collect();
        self.dialect.and(clauses)
    }

    /// Matches the documents on which `node` is false. A missing field makes
    /// the host's comparison unknown, and unknown never passes a NOT, so
    /// negated leaves also require the field to exist.
    ///
    /// Only called on fully pushable nodes.
    fn render_false(&self, node: &OperatorNode<'_>) -> Option<Document> {
        match &node.kind {
            NodeKind::Comparison { op, field, value } => match self.parser.reverse_op(*op) {
                Some(reversed) => {
                    debug!("Rewriting not ({}) as {field} {reversed} {value}", node.source);
                    self.render_comparison(reversed, field, value)
                }
                None => self.present_and_not(field, self.render_comparison(*op, field, value)?),
            },
            NodeKind::Range {
                field,
                low,
                high,
                negated,
            } => {
                let range = Self::range(field, low, high);
                if *negated {
                    Some(range)
                } else {
                    self.present_and_not(field, range)
                }
            }
            NodeKind::Membership { field, values } => {
                self.present_and_not(field, clause::terms(field, values))
            }
            NodeKind::NullCheck { field, is_null } => self.render_null_check(field, !is_null),
            NodeKind::Logic { op, children } => match op {
                LogicOp::And => {
                    let clauses = children
                        .iter()
                        .map(|child| self.render_false(child))
                        .collect::<Option<Vec<_>>>()?;
                    self.dialect.or(clauses)
                }
                LogicOp::Or => {
                    let clauses = children
                        .iter()
                        .map(|child| self.render_false(child))
                        .collect::<Option<Vec<_>>>()?;
                    self.dialect.and(clauses)
                }
                LogicOp::Not => children.first().and_then(|operand| self.render(operand)),
            },
            NodeKind::Unsupported { .. } => None,
        }
    }

    fn render_comparison(&self, op: Operator, field: &str, value: &Value) -> Option<Document> {
        let bound = match op {
            Operator::Eq => return Some(clause::term(field, value)),
            Operator::NotEq => return self.present_and_not(field, clause::term(field, value)),
            Operator::Gt => RangeBound::Gt,
            Operator::GtEq => RangeBound::Gte,
            Operator::Lt => RangeBound::Lt,
            Operator::LtEq => RangeBound::Lte,
            other => {
                warn!("Operator {other} is not a comparison");
                return None;
            }
        };
        Some(clause::range(field, &[(bound, value)]))
    }

    fn render_null_check(&self, field: &str, is_null: bool) -> Option<Document> {
        let exists = clause::exists(field);
        if is_null {
            self.dialect.not(exists)
        } else {
            Some(exists)
        }
    }

    /// `field` is present and `inner` does not match it.
    fn present_and_not(&self, field: &str, inner: Document) -> Option<Document> {
        let negated = self.dialect.not(inner)?;
        self.dialect.and(vec![clause::exists(field), negated])
    }

    fn range(field: &str, low: &Value, high: &Value) -> Document {
        clause::range(field, &[(RangeBound::Gte, low), (RangeBound::Lte, high)])
    }
}
