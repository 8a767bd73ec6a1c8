use anyhow::{Context, Result};
use rand::Rng;
use std::time::Duration;
use url::Url;

/// Desktop browser user agents rotated across requests.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:131.0) Gecko/20100101 Firefox/131.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
];

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

pub fn random_user_agent() -> &'static str {
    let mut rng = rand::rng();
    USER_AGENTS[rng.random_range(0..USER_AGENTS.len())]
}

/// Only http(s) pages can be fetched.
pub fn parse_page_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid URL: {}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!("Unsupported URL scheme: {}", other),
    }
}

/// Downloads page HTML for simplification. Scripts are not executed, so
/// the result reflects the served markup rather than a live page.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, raw_url: &str) -> Result<String> {
        let url = parse_page_url(raw_url)?;
        log::info!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .header("User-Agent", random_user_agent())
            .header("Accept", ACCEPT_HTML)
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .context("Failed to fetch page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let body = response.text().await.context("Failed to read response body")?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_user_agent() {
        let agent = random_user_agent();
        assert!(USER_AGENTS.contains(&agent));
    }

    #[test]
    fn test_parse_page_url() {
        assert!(parse_page_url("https://example.com/a?b=1").is_ok());
        assert!(parse_page_url("not a url").is_err());

        let err = parse_page_url("file:///etc/passwd").unwrap_err();
        assert!(err.to_string().contains("Unsupported URL scheme"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_scheme_before_request() {
        let fetcher = PageFetcher::new(Duration::from_secs(1)).unwrap();
        let result = fetcher.fetch("ftp://example.com/index.html").await;
        assert!(result.is_err());
    }
}
