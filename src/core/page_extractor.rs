// src/core/page_extractor.rs
use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};

/// Fetches a job posting page and pulls readable text out of the HTML.
/// Used when the search provider returns a hit without page contents.
pub struct PageExtractor {
    client: Client,
}

impl PageExtractor {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    pub async fn extract_text(&self, url: &str) -> Result<String> {
        info!("Fetching page content: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        let text = extract_readable_text(&html)
            .context("Failed to extract readable text from page")?;

        Ok(text)
    }
}

// The HTML document must not be held across an await point, so parsing
// happens in this synchronous helper.
fn extract_readable_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let selectors = [
        "main",
        "article",
        "[class*='description']",
        "[class*='job']",
        "body",
    ];

    for selector_str in &selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if text.len() > 100 {
                    return Some(text);
                }
            }
        }
    }

    warn!("No readable content found in page");
    None
}

fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_readable_text_prefers_main() {
        let html = r#"<html><body><nav>menu</nav><main>We are hiring a data engineer to build pipelines. Responsibilities include designing ETL jobs, maintaining warehouses, and partnering with analysts across the company.</main></body></html>"#;
        let text = extract_readable_text(html).unwrap();
        assert!(text.contains("data engineer"));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_extract_readable_text_rejects_short_pages() {
        let html = "<html><body><main>too short</main></body></html>";
        // Falls through main/article to body, which is still too short
        assert!(extract_readable_text(html).is_none());
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  a\n\n  b   c  "), "a b c");
    }
}
