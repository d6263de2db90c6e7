//! placesearch CLI - search for places and fly to them
//!
//! Queries the Google Places Text Search API and prints the locations found.
//! With `--select` the chosen result is handed to a logging viewer, which
//! prints the camera rectangle a map viewer would fly to.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use placesearch::{
    providers::{google_places, GooglePlacesConfig, GooglePlacesProvider},
    utils::debug::{debug_all, debug_basic},
    LocationResult, LocationSearch, LogViewer, SearchDefaults, SearchOutcome,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "placesearch")]
#[command(about = "Location search CLI for map viewers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for locations matching free text
    Search {
        /// Search text
        query: String,

        /// Google Maps API key
        #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// JSON config file (apiKey, baseUrl, fields, flightDurationSeconds, ...)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum number of results
        #[arg(short, long)]
        max_results: Option<u32>,

        /// Language code (e.g., en, de, ja)
        #[arg(short, long)]
        language: Option<String>,

        /// Region code used to bias results (e.g., au, uk)
        #[arg(short, long)]
        region: Option<String>,

        /// Fly to the n-th result (1-based) after searching
        #[arg(short, long)]
        select: Option<usize>,

        /// Log requests to stderr (with --raw, responses too)
        #[arg(short, long)]
        debug: bool,

        /// Show raw provider response
        #[arg(long)]
        raw: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// List available providers and their status
    Providers,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Simple,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, Commands::Search { debug: true, .. }));

    match cli.command {
        Commands::Search {
            query,
            api_key,
            config,
            max_results,
            language,
            region,
            select,
            debug,
            raw,
            format,
        } => {
            let config = load_config(api_key, config)?;
            let defaults = SearchDefaults {
                max_results,
                language,
                region,
                timeout: Some(config.timeout_ms),
                debug: debug.then(|| if raw { debug_all() } else { debug_basic() }),
            };
            handle_search(&query, config, defaults, select, raw, format).await?;
        }
        Commands::Providers => handle_list_providers(),
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module("placesearch", log::LevelFilter::Debug);
    }
    builder.init();
}

fn load_config(
    api_key: Option<String>,
    path: Option<PathBuf>,
) -> anyhow::Result<GooglePlacesConfig> {
    let mut config = match path {
        Some(path) => GooglePlacesConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GooglePlacesConfig::default(),
    };

    if let Some(key) = api_key {
        config.api_key = key;
    }
    config.apply_env_overrides()?;

    Ok(config)
}

async fn handle_search(
    query: &str,
    config: GooglePlacesConfig,
    defaults: SearchDefaults,
    select: Option<usize>,
    raw: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let provider = GooglePlacesProvider::with_config(config).context(format!(
        "set {} or pass --api-key",
        google_places::ENV_API_KEY
    ))?;
    let search = LocationSearch::new(Arc::new(provider)).with_defaults(defaults);

    match search.search(query).await {
        SearchOutcome::Found(_) => {}
        SearchOutcome::Ignored => bail!("search text is empty"),
        outcome => {
            if let Some(message) = search.state().message {
                eprintln!("{}", message.to_string().yellow());
            }
            if let SearchOutcome::Failed(e) = outcome {
                return Err(e).context("location search failed");
            }
            return Ok(());
        }
    }

    let state = search.state();
    display_results(&search.name(), &state.results, &format, raw);

    if let Some(n) = select {
        if n == 0 || !search.select(n - 1, &LogViewer) {
            bail!("result {n} does not exist or has no coordinates");
        }
        let target = state.results[n - 1].zoom.as_ref();
        if let Some(target) = target {
            println!(
                "{} {} ({:.1}s)",
                "Flying to".bold(),
                target.rectangle.to_string().green(),
                target.flight_duration.as_secs_f64()
            );
        }
    }

    Ok(())
}

fn handle_list_providers() {
    println!("{}", "Available Location Providers:".bold().blue());
    println!();

    let configured = env::var(google_places::ENV_API_KEY).is_ok();
    let status = if configured { "✅".green() } else { "❌".red() };
    println!(
        "{} {} - {}",
        status,
        "Google Places".bold(),
        format!("Requires {}", google_places::ENV_API_KEY).italic()
    );

    println!();
    println!("{}", "Set environment variables to enable providers:".bold());
    println!("export {}=your_key", google_places::ENV_API_KEY);
    println!(
        "export {}=https://your-proxy.example.com/textsearch/json  # optional",
        google_places::ENV_BASE_URL
    );
}

fn display_results(
    provider: &str,
    results: &[LocationResult],
    format: &OutputFormat,
    show_raw: bool,
) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(results) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("failed to serialize results: {e}"),
        },
        OutputFormat::Simple => {
            for (i, result) in results.iter().enumerate() {
                match &result.location {
                    Some(location) => println!("{}. {} ({location})", i + 1, result.name),
                    None => println!("{}. {}", i + 1, result.name),
                }
            }
        }
        OutputFormat::Table => {
            println!("{} {}", "Results from".bold(), provider.bold().blue());
            println!("{}", "─".repeat(80).dimmed());

            for (i, result) in results.iter().enumerate() {
                println!("{}. {}", (i + 1).to_string().bold(), result.name.bold());

                if let Some(address) = &result.address {
                    println!("   📍 {}", address.green());
                }

                match &result.location {
                    Some(location) => println!("   🌐 {}", location.to_string().cyan()),
                    None => println!("   🌐 {}", "no coordinates".dimmed()),
                }

                if let Some(rating) = result.rating {
                    println!("   ⭐ {rating:.1}");
                }

                if let Some(open_now) = result.open_now {
                    let status = if open_now { "open now".green() } else { "closed".red() };
                    println!("   🕒 {status}");
                }

                if show_raw {
                    if let Some(raw) = &result.raw {
                        println!("   📊 Raw: {raw}");
                    }
                }

                println!();
            }

            println!("{} {}", "Total results:".bold(), results.len().to_string().bold());
        }
    }
}
