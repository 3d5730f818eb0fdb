// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dreamshot - AI image effects client core.
//!
//! Binary entry point: tool content inspection, one-shot generation runs and
//! the sample-image proxy.

mod generate;
mod serve;
mod shutdown;
mod tool;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dreamshot_config::model::DreamshotConfig;
use dreamshot_core::DreamshotError;

/// Dreamshot - AI image effects client core.
#[derive(Parser, Debug)]
#[command(name = "dreamshot", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the same-origin sample-image proxy.
    Serve,
    /// Inspect tool content.
    Tool {
        #[command(subcommand)]
        action: ToolCommands,
    },
    /// Validate and print the effective configuration.
    Config,
    /// Upload images, start a generation and follow it to completion.
    Generate {
        /// Tool category, e.g. `effects`.
        category: String,
        /// Tool slug within the category.
        slug: String,
        /// Signed-in user id the job is filed under.
        #[arg(long)]
        user: String,
        #[arg(long)]
        locale: Option<String>,
        /// Local image file. Repeat for dual-input tools.
        #[arg(long = "image")]
        images: Vec<PathBuf>,
        /// Sample image URL. Fills the slots left after `--image`.
        #[arg(long = "sample")]
        samples: Vec<String>,
        /// Current credit balance; generation is refused below the tool cost.
        #[arg(long)]
        credits: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum ToolCommands {
    /// Print one tool's configuration.
    Show {
        category: String,
        slug: String,
        #[arg(long)]
        locale: Option<String>,
    },
    /// List the tools in a category.
    List {
        category: String,
        #[arg(long)]
        locale: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => dreamshot_config::load_and_validate_path(path),
        None => dreamshot_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            dreamshot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(&config).await,
        Some(Commands::Tool { action }) => match action {
            ToolCommands::Show {
                category,
                slug,
                locale,
            } => tool::run_show(&config, &category, &slug, locale.as_deref()),
            ToolCommands::List { category, locale } => {
                tool::run_list(&config, &category, locale.as_deref())
            }
        },
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Generate {
            category,
            slug,
            user,
            locale,
            images,
            samples,
            credits,
        }) => {
            let args = generate::GenerateArgs {
                category,
                slug,
                user,
                locale,
                images,
                samples,
                credits,
            };
            generate::run_generate(&config, args).await
        }
        None => {
            println!("dreamshot: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_config(config: &DreamshotConfig) -> Result<(), DreamshotError> {
    let rendered = toml::to_string_pretty(&redacted(config))
        .map_err(|e| DreamshotError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Copy of `config` safe to print.
fn redacted(config: &DreamshotConfig) -> DreamshotConfig {
    let mut config = config.clone();
    if config.api.api_key.is_some() {
        config.api.api_key = Some("********".to_string());
    }
    config
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dreamshot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
