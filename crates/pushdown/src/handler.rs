use crate::{
    builder::TreeBuilder,
    decompose::decompose,
    emitter::QueryEmitter,
    sargable::{EsSargableParser, SargableParser},
};
use engine_config::settings::validated::PushdownSettings;
use model::execution::expr::ExprNode;
use query_dsl::query::document::Document;
use serde::Serialize;
use tracing::{debug, info};

/// Result of splitting one predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecomposedPredicate {
    /// Portion of the source predicate the target evaluates. `None` means no
    /// pushdown happened and the caller applies the full predicate.
    ///
    /// A partially pushable conjunct appears here in full although the query
    /// only carries its pushable children. Such a conjunct is always part of
    /// `residual` as well.
    pub pushed: Option<ExprNode>,
    /// Portion the caller must still evaluate; `None` when fully pushed.
    pub residual: Option<ExprNode>,
    /// Compact JSON of the target query; `None` when nothing is sent.
    pub query: Option<String>,
    #[serde(skip)]
    pub document: Option<Document>,
}

impl DecomposedPredicate {
    pub fn is_pushed(&self) -> bool {
        self.pushed.is_some()
    }
}

/// Decomposes host predicates against one set of pushdown settings.
pub struct PredicateHandler {
    parser: Box<dyn SargableParser>,
    settings: PushdownSettings,
}

impl PredicateHandler {
    pub fn new(settings: PushdownSettings) -> Self {
        Self::with_parser(Box::new(EsSargableParser), settings)
    }

    pub fn with_parser(parser: Box<dyn SargableParser>, settings: PushdownSettings) -> Self {
        Self { parser, settings }
    }

    pub fn settings(&self) -> &PushdownSettings {
        &self.settings
    }

    pub fn decompose(&self, predicate: &ExprNode) -> DecomposedPredicate {
        info!("Decomposing predicate: {predicate}");

        let parser = self.parser.as_ref();
        let tree = TreeBuilder::new(parser, self.settings.alias()).build(predicate);
        if tree.scan_all_table {
            info!("No pushable operator in predicate; target is scanned in full");
        }

        let decomposition = decompose(&tree);
        let dialect = self.settings.dialect().dialect();
        let document = QueryEmitter::new(parser, dialect)
            .emit(decomposition.pushed.as_ref(), self.settings.pre_filter());

        let pushed = decomposition.pushed.map(|pushed| pushed.to_expr());
        let query = document.as_ref().map(Document::to_string);

        match (&pushed, &decomposition.residual) {
            (Some(pushed), Some(residual)) => {
                info!("Pushed {pushed}; residual {residual}")
            }
            (Some(pushed), None) => info!("Pushed {pushed} completely"),
            (None, _) => info!("Nothing pushed"),
        }
        if let Some(query) = &query {
            debug!("{} query: {query}", dialect.name());
        }

        DecomposedPredicate {
            pushed,
            residual: decomposition.residual,
            query,
            document,
        }
    }
}
