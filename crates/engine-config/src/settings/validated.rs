use model::transform::mapping::FieldAlias;
use query_dsl::query::{dialect::DialectKind, document::Document};

/// Immutable, validated configuration for one pushdown invocation.
#[derive(Debug, Clone, Default)]
pub struct PushdownSettings {
    /// Source column -> target field names
    pub alias: FieldAlias,
    /// Combinator syntax of the target engine
    pub dialect: DialectKind,
    /// Externally supplied filter conjoined with every pushed query
    pub pre_filter: Option<Document>,
}

impl PushdownSettings {
    pub fn from_builder(builder: PushdownSettingsBuilder) -> Self {
        let dialect = builder
            .dialect
            .or_else(|| builder.major_version.map(DialectKind::for_major_version))
            .unwrap_or_default();

        Self {
            alias: builder.alias.unwrap_or_default(),
            dialect,
            pre_filter: builder.pre_filter,
        }
    }

    pub fn alias(&self) -> &FieldAlias {
        &self.alias
    }

    pub fn dialect(&self) -> DialectKind {
        self.dialect
    }

    pub fn pre_filter(&self) -> Option<&Document> {
        self.pre_filter.as_ref()
    }

    pub fn has_pre_filter(&self) -> bool {
        self.pre_filter.is_some()
    }
}

#[derive(Debug, Default)]
pub struct PushdownSettingsBuilder {
    pub alias: Option<FieldAlias>,
    pub dialect: Option<DialectKind>,
    pub major_version: Option<u32>,
    pub pre_filter: Option<Document>,
}

impl PushdownSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alias(mut self, alias: FieldAlias) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Explicit dialect; takes precedence over the target version.
    pub fn dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn major_version(mut self, major: u32) -> Self {
        self.major_version = Some(major);
        self
    }

    pub fn pre_filter(mut self, pre_filter: Document) -> Self {
        self.pre_filter = Some(pre_filter);
        self
    }

    pub fn build(self) -> PushdownSettings {
        PushdownSettings::from_builder(self)
    }
}
