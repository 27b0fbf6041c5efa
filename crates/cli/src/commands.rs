use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Split a predicate into the pushed query and the residual filter
    Decompose {
        #[arg(long, help = "JSON file holding the serialized predicate")]
        predicate: String,

        #[arg(long, help = "JSON settings file (mapping, version, dialect, query)")]
        settings: Option<String>,

        #[arg(
            long = "property",
            value_parser = parse_property,
            help = "Connector property as key=value, e.g. es.version=7.10.2; ignored with --settings"
        )]
        properties: Vec<(String, String)>,

        #[arg(
            long,
            help = "If specified, writes the JSON result to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Show how an operator identifier is classified
    Classify {
        /// Operator class or spelling: "GenericUDFOPLessThan", "<>", "rlike", …
        #[arg(long)]
        op: String,
    },
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}
