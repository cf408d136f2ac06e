mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quarry::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(about = "Quarry CLI - compile search requests and parse engine responses")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(short, long, global = true, default_value = "quarry.toml", env = "QUARRY_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a JSON search request into an engine query
    Compile {
        /// Index schema (YAML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Search request (JSON), "-" for stdin
        #[arg(short, long, default_value = "-")]
        request: String,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the engine field mapping for an index schema
    Mapping {
        /// Index schema (YAML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Parse a raw engine response into a result set
    Parse {
        /// Search request (JSON) the response answers, used for facets
        #[arg(long)]
        request: Option<String>,

        /// Engine response (JSON), "-" for stdin
        #[arg(long, default_value = "-")]
        response: String,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Check index schemas for problems
    Lint {
        /// Directory with index schemas (YAML)
        #[arg(short, long, default_value = "schemas")]
        schemas: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Compile {
            schema,
            request,
            pretty,
        } => commands::run_compile(&config, &schema, &request, pretty),
        Commands::Mapping { schema, pretty } => commands::run_mapping(&config, &schema, pretty),
        Commands::Parse {
            request,
            response,
            pretty,
        } => commands::run_parse(request.as_deref(), &response, pretty),
        Commands::Lint { schemas } => commands::run_lint(&schemas),
    }
}
