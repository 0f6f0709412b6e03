// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG, default info) on stderr
// 2. Parse command-line arguments using clap
// 3. Crawl the site, stopping early on Ctrl-C
// 4. Write the results file and print a summary
// 5. Exit with proper code (0 = all good, 1 = some URLs failed, 2 = error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use site_urls::crawl::{self, CrawlConfig, CrawlObserver, LogObserver, StopReason};
use site_urls::normalize::normalize;
use site_urls::output::{self, OutputFormat, SitemapOptions};
use site_urls::page::HttpFetcherConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_urls=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished, nothing failed to load
//   Ok(1) = crawl finished, some URLs are in `errors`
//   Err   = bad arguments or the results could not be written
async fn run(cli: Cli) -> Result<i32> {
    // Check the output format before spending minutes crawling
    let format = match cli.format {
        Some(format) => format,
        None => OutputFormat::from_path(&cli.output)?,
    };

    let config = CrawlConfig {
        max_depth: cli.max_depth,
        link_policy: cli.links,
        use_head: cli.head,
    };

    let mut http = HttpFetcherConfig {
        timeout: Duration::from_secs(cli.timeout),
        ..HttpFetcherConfig::default()
    };
    if let Some(user_agent) = cli.user_agent {
        http.user_agent = user_agent;
    }

    // Ctrl-C stops the crawl at the next round boundary; we still write
    // whatever was found so far
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current round");
            on_ctrl_c.cancel();
        }
    });

    let observer: Arc<dyn CrawlObserver> = Arc::new(LogObserver);

    println!("🔍 Crawling {} (max depth {})", cli.url, cli.max_depth);

    let result = crawl::crawl_website(&cli.url, config, &http, cancel, Some(observer)).await?;

    if result.stop_reason == StopReason::Cancelled {
        println!("⚠️  Crawl cancelled, results are partial");
    }

    // crawl_website already rejected a bad seed, so this can't fail
    let origin = normalize(&cli.url)?;
    let sitemap = SitemapOptions {
        origin: &origin,
        alias: cli.alias.as_deref(),
        lastmod: chrono::Utc::now(),
    };
    let contents = output::render(&result, format, &sitemap)?;
    output::write_output(&cli.output, &contents)?;

    println!(
        "✅ Created {} [{} urls found, {} errors]",
        cli.output.display(),
        result.found.len(),
        result.errors.len()
    );
    if !result.external.is_empty() {
        println!("🌐 {} external link(s) not crawled", result.external.len());
    }

    if result.errors.is_empty() {
        Ok(0)
    } else {
        let failed: Vec<&str> = result.errors.iter().map(|u| u.as_str()).collect();
        println!("❌ Failed to load these URLs:\n - {}", failed.join("\n - "));
        Ok(1)
    }
}
