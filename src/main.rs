use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use stocktoons_news::api::{NewsSource, RssSource, StaticSource};
use stocktoons_news::app::{NewsController, SearchStatus};
use stocktoons_news::config::Config;
use stocktoons_news::logging;
use stocktoons_news::news::NewsService;
use stocktoons_news::server::{NewsServer, NewsType};
use stocktoons_news::ui::formatters::{format_article_detail, format_article_row};

const HEADLINE_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "stocktoons-news")]
#[command(about = "News aggregation and search service for StockToons", long_about = None)]
struct Cli {
    /// Path to the config file (defaults to the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the built-in curated stories instead of live feeds
    #[arg(long, global = true)]
    offline: bool,

    /// Debug-level logging for this crate
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON news API
    Serve {
        /// Address to listen on, overrides the config file
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Print all, hot or featured news
    List {
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: String,
        /// Maximum rows; 0 or less prints everything
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        limit: i64,
    },
    /// Search headlines, summaries and tickers
    Search {
        query: String,
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Print the full detail of each hit
        #[arg(short, long)]
        detail: bool,
    },
}

fn build_source(config: &Config, offline: bool) -> Result<Arc<dyn NewsSource>> {
    if offline || config.news_sources.is_empty() {
        info!("using curated offline stories");
        return Ok(Arc::new(StaticSource::curated()));
    }
    let source = RssSource::new(
        config.news_sources.clone(),
        config.tracked_tickers.clone(),
        config.hot_window(),
        config.request_timeout(),
    )?;
    Ok(Arc::new(source))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let source = build_source(&config, cli.offline)?;
    let service = Arc::new(NewsService::new(source, config.cache_max_age()));

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            let server = NewsServer::bind(&addr, service).await?;
            server
                .run_until(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }
        Command::List { kind, limit } => {
            let news_type: NewsType = kind.parse()?;
            let controller = NewsController::new(service, config.request_timeout());
            controller.refresh().await?;

            let news = controller.snapshot().news;
            let mut rows = match news_type {
                NewsType::All => news.all_news,
                NewsType::Hot => news.hot_news,
                NewsType::Featured => news.featured.into_iter().collect(),
            };
            if limit > 0 {
                rows.truncate(limit as usize);
            }
            if rows.is_empty() {
                println!("No articles.");
            }
            for article in &rows {
                println!("{}", format_article_row(article, HEADLINE_WIDTH));
            }
        }
        Command::Search {
            query,
            limit,
            detail,
        } => {
            let controller = NewsController::new(service, config.request_timeout());
            controller.search_news(&query).await;

            let search = controller.snapshot().search;
            if search.status == SearchStatus::Error {
                anyhow::bail!(
                    "search failed: {}",
                    search.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }
            if search.results.is_empty() {
                println!("No matches for \"{}\".", query.trim());
            }
            for article in search.results.iter().take(limit) {
                if detail {
                    println!("{}\n", format_article_detail(article, HEADLINE_WIDTH + 20));
                } else {
                    println!("{}", format_article_row(article, HEADLINE_WIDTH));
                }
            }
        }
    }

    Ok(())
}
