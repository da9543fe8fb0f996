//! Command-line interface definitions for Diego.
//!
//! This module defines the subcommands and their options using the `clap`
//! crate. Options left unset fall back to the defaults from [`Config`].

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use diego::{Config, OutputFormat, ProviderPreference, Query, SortOrder};

/// Command-line arguments for the Diego news tool.
///
/// # Examples
///
/// ```sh
/// # Top headlines from whichever provider is configured
/// diego get-news
///
/// # Search The Guardian only, detailed layout
/// diego get-news -q climate -s guardian -f detailed
///
/// # Sources in a category
/// diego sources -t technology
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get recent news articles by topic or search query
    GetNews(GetNewsArgs),
    /// List available news sources
    Sources(SourcesArgs),
    /// List the available news topics
    ListTopics,
    /// Show the current configuration
    Config,
}

#[derive(Args, Debug)]
pub struct GetNewsArgs {
    /// News topic/category ("all" for every category)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Search query/keywords; switches from headlines to search
    #[arg(short, long)]
    pub query: Option<String>,

    /// Country code (uses config default if not specified)
    #[arg(short, long)]
    pub country: Option<String>,

    /// Language code for search (uses config default if not specified)
    #[arg(long)]
    pub language: Option<String>,

    /// Earliest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest publication date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Result order: relevance, newest or popularity
    #[arg(long)]
    pub sort: Option<SortOrder>,

    /// Number of articles (uses config default if not specified)
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Output format: simple, detailed or json (uses config default if not specified)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// News source: auto tries NewsAPI first and falls back to The Guardian
    #[arg(short, long, default_value = "auto")]
    pub source: ProviderPreference,
}

impl GetNewsArgs {
    /// The topic as a category filter; "all" means none.
    pub fn category(&self) -> Option<&str> {
        self.topic
            .as_deref()
            .filter(|topic| !topic.eq_ignore_ascii_case("all"))
    }

    /// Build the canonical query, filling gaps from `config`.
    pub fn to_query(&self, config: &Config) -> Query {
        Query {
            keywords: self.query.clone(),
            category: self.category().map(str::to_string),
            country: Some(self.country.clone().unwrap_or_else(|| config.default_country.clone())),
            language: Some(
                self.language
                    .clone()
                    .unwrap_or_else(|| config.default_language.clone()),
            ),
            sources: None,
            from_date: self.from,
            to_date: self.to,
            sort_by: self.sort,
            page_size: self.limit.unwrap_or(config.default_page_size),
        }
    }
}

#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// Filter by topic/category
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Filter by country code
    #[arg(short, long)]
    pub country: Option<String>,

    /// Output format: simple, detailed or json (uses config default if not specified)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// News source: auto, newsapi or guardian
    #[arg(short, long, default_value = "auto")]
    pub source: ProviderPreference,
}

impl SourcesArgs {
    pub fn to_query(&self) -> Query {
        Query {
            category: self.topic.clone(),
            country: self.country.clone(),
            ..Query::default()
        }
    }
}
