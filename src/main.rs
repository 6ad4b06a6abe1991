//! # Product Advisor CLI (`advisor`)
//!
//! The `advisor` binary starts the web backend and offers one-shot
//! commands for checking a catalog and trying the decision engines from
//! a terminal.
//!
//! ## Usage
//!
//! ```bash
//! advisor --config ./config/advisor.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `advisor serve` | Build the FAQ index and start the HTTP server |
//! | `advisor ask "<question>"` | Resolve one support question |
//! | `advisor recommend --goal <g>...` | Recommend a product for a goal profile |
//! | `advisor check` | Validate config and catalog, build the index, print a summary |
//!
//! ## Examples
//!
//! ```bash
//! advisor ask "Does OMX Flow support WhatsApp?"
//! advisor recommend --goal "Manage leads" --goal "Chatbot" --business-type Retail
//! RUST_LOG=debug advisor serve
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use product_advisor::catalog::load_catalog;
use product_advisor::config;
use product_advisor::context::{build_advisor, log_resolution};
use product_advisor::server;
use product_advisor_core::models::UserProfile;
use product_advisor_core::recommend::recommend;

/// Product Advisor: hybrid FAQ resolution and goal-based product
/// recommendation behind a simple web form.
#[derive(Parser)]
#[command(name = "advisor", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/advisor.toml")]
    config: PathBuf,

    /// Log level (`trace`, `debug`, `info`, `warn`, `error`). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the FAQ index and start the HTTP server.
    ///
    /// Binds to `[server].bind`. The index is built once before the
    /// listener opens; if it cannot be built the process exits.
    Serve,

    /// Resolve a single support question and print the answer as JSON.
    Ask {
        /// The question text.
        question: String,
    },

    /// Recommend a product for a goal profile and print it as JSON.
    ///
    /// Needs only the catalog; no embedding model is loaded.
    Recommend {
        /// A business goal. Repeat for several goals.
        #[arg(long = "goal")]
        goals: Vec<String>,

        /// Business type label (e.g. `Retail`).
        #[arg(long, default_value = "")]
        business_type: String,

        /// Business size label (e.g. `11-50`).
        #[arg(long)]
        business_size: Option<String>,
    },

    /// Validate config and catalog, build the FAQ index, and print a summary.
    Check,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            let advisor = build_advisor(&cfg).await?;
            server::run_server(&cfg, advisor).await?;
        }
        Commands::Ask { question } => {
            let advisor = build_advisor(&cfg).await?;
            let answer = advisor.resolve(&question).await;
            log_resolution(&question, &answer);
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
        Commands::Recommend {
            goals,
            business_type,
            business_size,
        } => {
            let catalog = load_catalog(&cfg.catalog.path)?;
            let profile = UserProfile {
                goals,
                business_type,
                business_size,
            };
            let rec = recommend(&catalog, &profile);
            println!("{}", serde_json::to_string_pretty(&rec)?);
        }
        Commands::Check => {
            let advisor = build_advisor(&cfg).await?;
            let catalog = advisor.catalog();
            println!("catalog:    {}", cfg.catalog.path.display());
            println!("faqs:       {}", catalog.faqs().len());
            println!(
                "fallbacks:  {}",
                catalog.contact().fallback_messages.len()
            );
            println!(
                "model:      {} ({} dims)",
                advisor.index().model_name(),
                advisor.index().dims()
            );
            println!("threshold:  {}", advisor.params().similarity_threshold);
            println!("OK");
        }
    }

    Ok(())
}
