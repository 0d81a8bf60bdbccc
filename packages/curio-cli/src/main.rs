//! `curio` - discover, select, and ingest web content from a terminal.

mod config;
mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, MultiSelect};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ingestion::ai::GeminiAnalyzer;
use ingestion::{
    discover_links, ingest_batch, ingest_external_url, scrape_one, BatchRequest, BatchStatus,
    DiscoveryConfig, DiscoveryError, DiscoverySession, ItemStore, ProxyFetcher, ScrapeConfig,
    ScrapeRequest,
};

use config::Config;
use store::JsonFileStore;

#[derive(Parser)]
#[command(name = "curio", about = "Personal knowledge library ingestion", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover content links on a domain
    Discover {
        /// Domain or homepage URL
        url: String,

        /// Interactively select and ingest the discovered links
        #[arg(long)]
        ingest: bool,

        /// Analysis instruction applied to ingested pages
        #[arg(long, default_value = "")]
        instruction: String,
    },

    /// Scrape a single URL into the library
    Scrape {
        /// Page URL
        url: String,

        /// Analysis instruction
        #[arg(long, default_value = "")]
        instruction: String,

        /// CSS selector scoping the extraction
        #[arg(long)]
        selector: Option<String>,
    },

    /// Add an external URL without scraping (social media, etc.)
    Add {
        /// External URL
        url: String,

        /// Analysis instruction
        #[arg(long, default_value = "")]
        instruction: String,
    },

    /// List library items
    List,

    /// Remove an item by id
    Remove {
        /// Item id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("curio=info,ingestion=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mut analyzer = GeminiAnalyzer::new(config.api_key.clone());
    if let Some(model) = &config.model {
        analyzer = analyzer.with_model(model.clone());
    }
    let fetcher = ProxyFetcher::new();
    let store = JsonFileStore::open(&config.library_path)
        .with_context(|| format!("opening library at {}", config.library_path.display()))?;
    debug!(
        library = %config.library_path.display(),
        items = store.count(),
        user = %config.user_id,
        "library opened"
    );

    match cli.command {
        Command::Discover {
            url,
            ingest,
            instruction,
        } => run_discover(&url, ingest, &instruction, &config, &store, &analyzer, &fetcher).await,
        Command::Scrape {
            url,
            instruction,
            selector,
        } => run_scrape(&url, &instruction, selector, &config, &store, &analyzer, &fetcher).await,
        Command::Add { url, instruction } => {
            run_add(&url, &instruction, &config, &store, &analyzer).await
        }
        Command::List => run_list(&config, &store).await,
        Command::Remove { id } => run_remove(&id, &store).await,
    }
}

async fn run_discover(
    url: &str,
    ingest: bool,
    instruction: &str,
    config: &Config,
    store: &JsonFileStore,
    analyzer: &GeminiAnalyzer,
    fetcher: &ProxyFetcher,
) -> Result<()> {
    println!("{} {}", "Discovering links on".bright_cyan(), url.bold());

    let report = match discover_links(url, &DiscoveryConfig::default(), analyzer, fetcher).await {
        Ok(report) => report,
        Err(DiscoveryError::NoLinks { domain }) => {
            println!("{}", format!("No content links found on {domain}.").yellow());
            return Ok(());
        }
        Err(DiscoveryError::Failed { domain, reason }) => {
            println!(
                "{}",
                format!("Discovery failed for {domain}: {reason}").red()
            );
            return Ok(());
        }
    };

    println!(
        "{} {} links (via {:?} phase)\n",
        "Found".bright_green(),
        report.links.len(),
        report.source
    );
    for (i, link) in report.links.iter().enumerate() {
        let title = if link.title.is_empty() { &link.url } else { &link.title };
        println!("  {:>3}. {} {}", i + 1, title.bold(), link.url.dimmed());
    }

    if !ingest {
        return Ok(());
    }

    let labels: Vec<String> = report
        .links
        .iter()
        .map(|l| {
            if l.title.is_empty() {
                l.url.clone()
            } else {
                format!("{} ({})", l.title, l.url)
            }
        })
        .collect();

    let picked = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select pages to ingest (space to toggle, enter to confirm)")
        .items(&labels)
        .interact()?;

    if picked.is_empty() {
        println!("{}", "Nothing selected.".yellow());
        return Ok(());
    }

    let mut session = DiscoverySession::new(report.links);
    let urls: Vec<String> = picked
        .iter()
        .map(|&i| session.links[i].url.clone())
        .collect();
    for url in &urls {
        session.select(url);
    }

    let request =
        BatchRequest::from_session(&session, config.user_id.clone()).with_instruction(instruction);
    debug!(selected = request.urls.len(), "starting batch over selection");

    println!();
    let summary = ingest_batch(
        &request,
        &ScrapeConfig::default(),
        store,
        analyzer,
        fetcher,
        |progress| {
            println!(
                "  {} {}/{} ({}%)",
                "progress".dimmed(),
                progress.completed,
                progress.total,
                progress.percent()
            );
        },
    )
    .await;

    println!();
    match summary.status() {
        BatchStatus::Completed => println!(
            "{}",
            format!("Ingested all {} pages.", summary.succeeded).bright_green()
        ),
        BatchStatus::CompletedWithFailures { failed } => println!(
            "{}",
            format!(
                "Ingested {} pages; {failed} failed (blocked or empty).",
                summary.succeeded
            )
            .yellow()
        ),
        BatchStatus::AllFailed => println!(
            "{}",
            "Every selected page was blocked; nothing was ingested.".red()
        ),
    }

    session.reset();
    Ok(())
}

async fn run_scrape(
    url: &str,
    instruction: &str,
    selector: Option<String>,
    config: &Config,
    store: &JsonFileStore,
    analyzer: &GeminiAnalyzer,
    fetcher: &ProxyFetcher,
) -> Result<()> {
    let mut request = ScrapeRequest::new(url, config.user_id.clone()).with_instruction(instruction);
    if let Some(selector) = selector {
        request = request.with_selector(selector);
    }

    println!("{} {}", "Scraping".bright_cyan(), url.bold());
    match scrape_one(&request, &ScrapeConfig::default(), store, analyzer, fetcher).await {
        Ok(item) => {
            println!("{} {} ({})", "Saved".bright_green(), item.title.bold(), item.id.dimmed());
            if !item.summary.is_empty() {
                println!("  {}", item.summary);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Failed:".red(), e);
            Ok(())
        }
    }
}

async fn run_add(
    url: &str,
    instruction: &str,
    config: &Config,
    store: &JsonFileStore,
    analyzer: &GeminiAnalyzer,
) -> Result<()> {
    let request = ScrapeRequest::new(url, config.user_id.clone()).with_instruction(instruction);

    println!("{} {}", "Adding external URL".bright_cyan(), url.bold());
    match ingest_external_url(&request, &ScrapeConfig::default(), store, analyzer).await {
        Ok(item) => {
            println!("{} {} ({})", "Saved".bright_green(), item.title.bold(), item.id.dimmed());
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Failed:".red(), e);
            Ok(())
        }
    }
}

async fn run_list(config: &Config, store: &JsonFileStore) -> Result<()> {
    let items = store.get_all(&config.user_id).await?;
    if items.is_empty() {
        println!("{}", "Library is empty.".yellow());
        return Ok(());
    }

    for item in items {
        println!(
            "{}  {}  {}",
            item.uploaded_at.format("%Y-%m-%d").to_string().dimmed(),
            item.title.bold(),
            format!("[{}] {}", item.kind, item.id).dimmed()
        );
    }
    Ok(())
}

async fn run_remove(id: &str, store: &JsonFileStore) -> Result<()> {
    match store.delete(id).await {
        Ok(()) => {
            println!("{} {}", "Removed".bright_green(), id);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Failed:".red(), e);
            Ok(())
        }
    }
}
