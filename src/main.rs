//! # Diego
//!
//! Command-line front end for the `diego` library: top headlines, article
//! search and source listings from NewsAPI and The Guardian, with automatic
//! fallback between them.
//!
//! ## Usage
//!
//! ```sh
//! diego get-news --topic science
//! diego get-news --query climate --source guardian --format json
//! diego sources --topic technology
//! diego list-topics
//! diego config
//! ```
//!
//! Settings come from environment variables (or a `.env` file); see
//! `diego config` for the full list. Logs go to stderr and are filtered
//! with `RUST_LOG` (default `warn`).

use clap::Parser;
use diego::config::ENV_VARS;
use diego::outputs::{json, text};
use diego::{Config, Fetched, NewsAggregator, OutputFormat, ProviderPreference};
use itertools::Itertools;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command, GetNewsArgs, SourcesArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.command, "Parsed CLI arguments");

    let config = Config::from_env();

    if let Err(e) = run(args.command, &config).await {
        error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis() as u64, "Execution complete");
    Ok(())
}

async fn run(command: Command, config: &Config) -> Result<(), Box<dyn Error>> {
    match command {
        Command::GetNews(args) => get_news(config, &args).await,
        Command::Sources(args) => sources(config, &args).await,
        Command::ListTopics => {
            println!("{}", text::topics());
            Ok(())
        }
        Command::Config => {
            show_config(config);
            Ok(())
        }
    }
}

/// Check the configuration for `preference` and pick the output format.
fn prepare(
    config: &Config,
    preference: ProviderPreference,
    format: Option<OutputFormat>,
) -> Result<OutputFormat, Box<dyn Error>> {
    config.validate(preference)?;
    match format {
        Some(format) => Ok(format),
        None => Ok(config.default_format.parse()?),
    }
}

/// One line naming the provider that answered, and any that failed first.
fn banner<T>(preference: ProviderPreference, fetched: &Fetched<T>) -> String {
    let used = fetched.provider.as_str().to_uppercase();
    if fetched.fell_back() {
        let failed = fetched
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.provider, f.error))
            .join("; ");
        format!("Using {used} (fallback after {failed})")
    } else if preference == ProviderPreference::Auto {
        format!("Using {used} (auto-detected)")
    } else {
        format!("Using {used}")
    }
}

#[instrument(level = "info", skip_all, fields(source = %args.source))]
async fn get_news(config: &Config, args: &GetNewsArgs) -> Result<(), Box<dyn Error>> {
    let format = prepare(config, args.source, args.format)?;
    let aggregator = NewsAggregator::from_config(config)?;
    let query = args.to_query(config);

    let (fetched, heading) = match (&query.keywords, args.category()) {
        (Some(keywords), _) => (
            aggregator.search_articles(args.source, &query).await?,
            format!("Search results for: '{keywords}'"),
        ),
        (None, Some(topic)) => (
            aggregator.top_headlines(args.source, &query).await?,
            format!("Top {} news:", diego::utils::upcase(topic)),
        ),
        (None, None) => (
            aggregator.top_headlines(args.source, &query).await?,
            "Top headlines:".to_string(),
        ),
    };
    let result = &fetched.data;

    if format == OutputFormat::Json {
        println!("{}", json::to_pretty_json(result)?);
        return Ok(());
    }

    println!("{}", banner(args.source, &fetched));
    println!("{heading}");

    if !result.is_ok() {
        println!(
            "Error: {}",
            result.error_message.as_deref().unwrap_or("unknown provider error")
        );
        return Ok(());
    }
    if result.articles.is_empty() {
        println!("No articles found.");
        return Ok(());
    }

    println!(
        "Found {} articles (showing {})",
        result.total_results,
        result.articles.len()
    );
    println!("{}", "=".repeat(60));
    println!("{}", text::articles(&result.articles, format == OutputFormat::Detailed));
    Ok(())
}

#[instrument(level = "info", skip_all, fields(source = %args.source))]
async fn sources(config: &Config, args: &SourcesArgs) -> Result<(), Box<dyn Error>> {
    let format = prepare(config, args.source, args.format)?;
    let aggregator = NewsAggregator::from_config(config)?;
    let fetched = aggregator.list_sources(args.source, &args.to_query()).await?;
    let list = &fetched.data;

    if format == OutputFormat::Json {
        println!("{}", json::to_pretty_json(list)?);
        return Ok(());
    }

    println!("{}", banner(args.source, &fetched));

    if !list.is_ok() {
        println!(
            "Error: {}",
            list.error_message.as_deref().unwrap_or("unknown provider error")
        );
        return Ok(());
    }
    if list.sources.is_empty() {
        println!("No sources found.");
        return Ok(());
    }

    let filters = [
        args.topic.as_deref().map(|t| format!("topic: {t}")),
        args.country.as_deref().map(|c| format!("country: {c}")),
    ]
    .into_iter()
    .flatten()
    .join(", ");
    if filters.is_empty() {
        println!("Available news sources:");
    } else {
        println!("Available news sources ({filters}):");
    }
    println!("{}", "=".repeat(50));
    println!("{}", text::sources(&list.sources, format == OutputFormat::Detailed));
    Ok(())
}

fn show_config(config: &Config) {
    let set = |present: bool| if present { "Set" } else { "Not set" };

    println!("Current Configuration:");
    println!("{}", "=".repeat(30));
    println!("NewsAPI Key: {}", set(config.news_api_key.is_some()));
    println!("Guardian API Key: {}", set(config.guardian_api_key.is_some()));
    println!("Default Country: {}", config.default_country);
    println!("Default Language: {}", config.default_language);
    println!("Default Page Size: {}", config.default_page_size);
    println!("Max Page Size: {}", config.max_page_size);
    println!("Default Format: {}", config.default_format);
    println!("HTTP Timeout: {}s", config.timeout_seconds);
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    println!("\nEnvironment Variables:");
    for (name, description) in ENV_VARS {
        println!("- {name} ({description})");
    }

    let problems = config.problems(ProviderPreference::Auto);
    if !problems.is_empty() {
        println!("\nConfiguration Issues:");
        for problem in problems {
            println!("{problem}");
        }
    }
}
