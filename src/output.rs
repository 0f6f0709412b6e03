// src/output.rs
// =============================================================================
// Writes a CrawlResult to disk.
//
// Formats:
// - json: {"found": [...], "errors": [...]}
// - csv:  the found URLs, one per line
// - xml:  a sitemap listing the found URLs
//
// Everything here is derived from the CrawlResult alone; no crawling logic.
// =============================================================================

use crate::crawl::CrawlResult;
use crate::normalize::CanonicalUrl;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::ValueEnum;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Xml,
}

impl OutputFormat {
    // Picks the format from the file extension ("data.json" -> Json)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            Some("xml") => Ok(Self::Xml),
            _ => Err(anyhow!(
                "Output must be file types [csv, json, xml], got '{}'",
                path.display()
            )),
        }
    }
}

// Options for the sitemap output
#[derive(Debug, Clone)]
pub struct SitemapOptions<'a> {
    /// The crawled site's origin, replaced by `alias` in every <loc>
    pub origin: &'a CanonicalUrl,
    pub alias: Option<&'a str>,
    pub lastmod: DateTime<Utc>,
}

// Renders the result in the given format
pub fn render(result: &CrawlResult, format: OutputFormat, sitemap: &SitemapOptions<'_>) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => Ok(render_csv(&result.found)),
        OutputFormat::Xml => Ok(render_sitemap(&result.found, sitemap)),
    }
}

pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn render_csv(found: &[CanonicalUrl]) -> String {
    found
        .iter()
        .map(CanonicalUrl::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_sitemap(found: &[CanonicalUrl], options: &SitemapOptions<'_>) -> String {
    let lastmod = options.lastmod.to_rfc3339_opts(SecondsFormat::Millis, true);

    let entries: Vec<String> = found
        .iter()
        .map(|url| {
            let loc = match options.alias {
                Some(alias) => with_alias(url, options.origin, alias),
                None => url.to_string(),
            };
            format!(
                "<url><loc>{}</loc><lastmod>{}</lastmod><changefreq>daily</changefreq><priority>0.7</priority></url>",
                escape_xml(&loc),
                lastmod
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
         {}\n\
         </urlset>\n",
        entries.join("\n")
    )
}

// "http://localhost:3000/a" with alias "https://site.com" -> "https://site.com/a"
fn with_alias(url: &CanonicalUrl, origin: &CanonicalUrl, alias: &str) -> String {
    match url.as_str().strip_prefix(origin.as_str()) {
        Some(rest) => format!("{}{}", alias.trim_end_matches('/'), rest),
        None => url.to_string(),
    }
}

fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
