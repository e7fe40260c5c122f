//! Registry-Harvest main entry point
//!
//! This is the command-line interface for the registry harvester and
//! endpoint prober.

use anyhow::Context;
use clap::{Parser, Subcommand};
use registry_harvest::client::ReqwestFetcher;
use registry_harvest::config::{load_config_with_hash, Config, Overrides};
use registry_harvest::harvester::{harvest, total_count, HarvestOptions, HarvestOutcome};
use registry_harvest::output::{
    format_column_summary, format_harvest_report, format_probe_report, summarize_column,
    write_json, write_markdown,
};
use registry_harvest::prober::{probe_all, probe_sequential, ProbeOptions, ProbeReport};
use registry_harvest::registry::Column;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Registry-Harvest: a paginated tool-registry harvester
///
/// Downloads every record of a registry topic into a single table and
/// checks whether the URLs it lists are still reachable.
#[derive(Parser, Debug)]
#[command(name = "registry-harvest")]
#[command(version)]
#[command(about = "Harvest a tool registry and probe its endpoints", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the registry's total record count
    Count,

    /// Harvest every page of a topic
    Harvest {
        #[command(flatten)]
        harvest: HarvestArgs,

        /// Write the harvested table as JSON
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write a markdown report of the harvest
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Print a coverage summary for these columns (e.g. license, topic)
        #[arg(long = "summarize", value_name = "COLUMN")]
        summarize: Vec<String>,
    },

    /// Probe URLs for reachability
    Probe {
        /// URLs to probe
        #[arg(value_name = "URL", required_unless_present = "from_harvest")]
        urls: Vec<String>,

        /// Harvest first and probe the homepage column
        #[arg(long)]
        from_harvest: bool,

        #[command(flatten)]
        harvest: HarvestArgs,

        /// Per-URL timeout in milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,

        /// Worker pool width
        #[arg(long, value_name = "N")]
        max_workers: Option<usize>,

        /// Probe one URL at a time
        #[arg(long, conflicts_with = "max_workers")]
        sequential: bool,

        /// Write the results as JSON
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write a markdown report of the results
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
}

/// Overrides for the `[registry]` config section
#[derive(clap::Args, Debug)]
struct HarvestArgs {
    /// Topic to harvest
    #[arg(long)]
    topic: Option<String>,

    /// Stop after this many pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,
}

impl HarvestArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            topic: self.topic.clone(),
            max_pages: self.max_pages,
            ..Overrides::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let overrides = match &cli.command {
        Command::Count => Overrides::default(),
        Command::Harvest { harvest: args, .. } => args.overrides(),
        Command::Probe {
            harvest: args,
            timeout_ms,
            max_workers,
            ..
        } => Overrides {
            timeout_ms: *timeout_ms,
            max_workers: *max_workers,
            ..args.overrides()
        },
    };
    let config = config
        .with_overrides(&overrides)
        .context("invalid command-line options")?;

    match cli.command {
        Command::Count => {
            let fetcher = ReqwestFetcher::from_config(&config.user_agent)
                .context("failed to build HTTP client")?;
            let count = total_count(
                &fetcher,
                &config.registry.api_url,
                config.registry.page_timeout(),
            )
            .await?;
            println!("{}", count);
        }

        Command::Harvest {
            output,
            report,
            summarize,
            ..
        } => {
            let columns = summarize
                .iter()
                .map(|key| {
                    Column::from_key(key).with_context(|| format!("unknown column '{}'", key))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            let fetcher = ReqwestFetcher::from_config(&config.user_agent)
                .context("failed to build HTTP client")?;
            let outcome = run_harvest(&fetcher, &config).await?;
            println!(
                "Harvested {} tools from {} pages ({})",
                outcome.table.len(),
                outcome.pages_requested,
                outcome.stop
            );

            for column in columns {
                print!("{}", format_column_summary(&summarize_column(&outcome.table, column)));
            }
            if let Some(path) = output {
                write_json(&outcome.table, &path)?;
                tracing::info!("Table written to {}", path.display());
            }
            if let Some(path) = report {
                write_markdown(&format_harvest_report(&config.registry.topic, &outcome), &path)?;
                tracing::info!("Report written to {}", path.display());
            }
        }

        Command::Probe {
            urls,
            from_harvest,
            sequential,
            output,
            report,
            ..
        } => {
            let mut urls = urls;
            if from_harvest {
                let fetcher = ReqwestFetcher::from_config(&config.user_agent)
                    .context("failed to build HTTP client")?;
                let outcome = run_harvest(&fetcher, &config).await?;
                urls.extend(outcome.table.homepages());
            }

            let fetcher = ReqwestFetcher::for_probing(&config.user_agent)
                .context("failed to build HTTP client")?;
            let options = ProbeOptions::from_config(&config.prober);
            let results = if sequential {
                probe_sequential(&fetcher, &urls, options.timeout).await
            } else {
                probe_all(&fetcher, &urls, options).await
            };

            print_probe_results(&results);
            if let Some(path) = output {
                write_json(&results, &path)?;
                tracing::info!("Results written to {}", path.display());
            }
            if let Some(path) = report {
                write_markdown(&format_probe_report(&results), &path)?;
                tracing::info!("Report written to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("registry_harvest=info,warn"),
            1 => EnvFilter::new("registry_harvest=debug,info"),
            2 => EnvFilter::new("registry_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs a harvest of the configured topic
async fn run_harvest(fetcher: &ReqwestFetcher, config: &Config) -> anyhow::Result<HarvestOutcome> {
    let options = HarvestOptions::from_config(&config.registry);
    let outcome = harvest(fetcher, options)
        .await
        .with_context(|| format!("harvest of \"{}\" aborted", config.registry.topic))?;
    Ok(outcome)
}

fn print_probe_results(report: &ProbeReport) {
    for result in report {
        println!("{}\t{}", result.status, result.url);
    }
    println!(
        "{} URLs probed, {} without response",
        report.len(),
        report.failure_count()
    );
}
