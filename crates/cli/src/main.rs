use crate::error::CliError;
use clap::Parser;
use commands::Commands;
use engine_config::settings::validated::PushdownSettings;
use model::execution::expr::ExprNode;
use pushdown::{
    handler::PredicateHandler,
    sargable::{EsSargableParser, classify},
};
use std::collections::HashMap;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(name = "pushdown", version = "0.1.0", about = "Predicate pushdown translator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays valid JSON
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decompose {
            predicate,
            settings,
            properties,
            output,
        } => {
            info!("Decomposing predicate from {predicate}, settings: {settings:?}");

            let settings = load_settings(settings.as_deref(), properties).await?;
            let source = tokio::fs::read_to_string(&predicate).await?;
            let expr = serde_json::from_str::<ExprNode>(&source)?;

            let result = PredicateHandler::new(settings).decompose(&expr);

            match output {
                Some(path) => output::write_json(&result, &path).await?,
                None => output::print_json(&result)?,
            }
        }
        Commands::Classify { op } => {
            let view = classify(&EsSargableParser, &op);
            output::print_json(&view)?;
        }
    }

    Ok(())
}

async fn load_settings(
    path: Option<&str>,
    properties: Vec<(String, String)>,
) -> Result<PushdownSettings, CliError> {
    match path {
        Some(path) => {
            if !properties.is_empty() {
                warn!("Ignoring --property values because a settings file was given");
            }
            let text = tokio::fs::read_to_string(path).await?;
            Ok(PushdownSettings::from_json(&text)?)
        }
        None => {
            let properties = properties.into_iter().collect::<HashMap<_, _>>();
            Ok(PushdownSettings::from_properties(&properties)?)
        }
    }
}
