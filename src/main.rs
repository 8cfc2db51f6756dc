//! price-compare - Compare product prices across regional eBay storefronts
//!
//! Fans a search out to several storefronts at once and exports the results
//! to a spreadsheet report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use price_compare::commands::{SearchCommand, SearchOptions};
use price_compare::config::{Config, OutputFormat};
use price_compare::ebay::Region;
use price_compare::error::exit_status;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "price-compare",
    version,
    about = "Compare product prices across regional eBay storefronts",
    long_about = "Searches several eBay storefronts concurrently, keeps the first few complete \
                  listings from each, and saves them to a spreadsheet report."
)]
struct Cli {
    /// Output format for the terminal summary
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "PRICE_COMPARE_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every selected storefront and export the results
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        /// Maximum number of products per region
        #[arg(short, long = "max-products")]
        max: Option<usize>,

        /// Regions to search (comma-separated, e.g. us,uk,de)
        #[arg(short, long, value_delimiter = ',')]
        regions: Option<Vec<String>>,

        /// Report file path (defaults to a timestamped name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip writing the report file
        #[arg(long, conflicts_with_all = ["output", "open"])]
        no_report: bool,

        /// Open the report after writing it
        #[arg(long)]
        open: bool,
    },

    /// List supported regions
    Regions,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Search { query, max, regions, output, no_report, open } => {
            if let Some(max) = max {
                config.max_results = max;
            }

            let options = SearchOptions { regions, output, write_report: !no_report, open };
            let cmd = SearchCommand::new(config);
            let outcome = cmd.execute(&query, &options).await?;

            println!("{}", outcome.rendered);
            if let Some(path) = outcome.report_path {
                println!("\nReport saved to: {}", path.display());
            }
        }

        Commands::Regions => {
            println!("Supported eBay regions:\n");
            println!("{:<6} {:<16} {:<10}", "Code", "Domain", "Currency");
            println!("{:-<6} {:-<16} {:-<10}", "", "", "");

            for region in Region::all() {
                println!(
                    "{:<6} {:<16} {:<10}",
                    region.to_string(),
                    region.domain(),
                    region.currency()
                );
            }
        }
    }

    Ok(())
}
