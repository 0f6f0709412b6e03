// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below *is* the CLI. Each field is an
// argument, and the #[arg(...)] attributes say how it is spelled and what
// its default is.
// =============================================================================

use clap::Parser;
use site_urls::crawl::LinkPolicy;
use site_urls::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-urls",
    version,
    about = "Get all of the URLs from a website",
    long_about = "site-urls crawls a website from a starting URL, following links on the same site, \
                  and writes every page it found plus every URL that failed to load.",
    after_help = "Example:\n  site-urls polaris.shopify.com\n  Created data.json [166 urls found, 2 errors]"
)]
pub struct Cli {
    /// Website URL to crawl (e.g., https://example.com or example.com)
    pub url: String,

    /// Maximum number of crawl rounds
    ///
    /// Depth 1 = just the starting page
    /// Depth 2 = starting page + all pages it links to
    /// etc.
    #[arg(long, default_value_t = 100)]
    pub max_depth: usize,

    /// File the results are saved to
    #[arg(short, long, default_value = "data.json")]
    pub output: PathBuf,

    /// Output format; taken from the output file extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Replace the site URL with this one in the sitemap (xml only)
    #[arg(long)]
    pub alias: Option<String>,

    /// Which absolute links to follow
    #[arg(long, value_enum, default_value_t = LinkPolicy::SameOrigin)]
    pub links: LinkPolicy,

    /// Probe every URL with HEAD first, so non-HTML files are never downloaded
    #[arg(long)]
    pub head: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,
}
