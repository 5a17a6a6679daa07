// src/services/fetcher.rs

//! Document fetching.
//!
//! The cache only sees the [`DocumentFetcher`] capability; whether pages come
//! from a plain HTTP GET or from a rendering engine is a deployment choice.

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

use crate::error::{FetchError, Result};
use crate::models::CrawlerConfig;
use crate::utils::http::create_async_client;

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub url: String,
    pub body: String,
}

impl Document {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// Parse the page. `Html` is not `Send`, so parse where no `.await` follows.
    pub fn html(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Capability to fetch an upstream page.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url`, failing with [`FetchError`] on timeout, network or HTTP errors.
    async fn fetch(&self, url: &str) -> Result<Document>;
}

/// Plain HTTP GET fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given HTTP client settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Document> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        Ok(Document::new(url, body))
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted in-memory fetcher for tests.

    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    type Response = std::result::Result<String, FetchError>;

    /// Serves scripted responses per URL; the last response repeats.
    #[derive(Default)]
    pub struct FakeFetcher {
        scripts: Mutex<HashMap<String, VecDeque<Response>>>,
        calls: Mutex<HashMap<String, usize>>,
        delay: Option<Duration>,
    }

    impl FakeFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(self, url: &str, html: &str) -> Self {
            self.script(url, vec![Ok(html.to_string())])
        }

        pub fn failing(self, url: &str, error: FetchError) -> Self {
            self.script(url, vec![Err(error)])
        }

        pub fn script(self, url: &str, responses: Vec<Response>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(url.to_string(), responses.into());
            self
        }

        /// Sleep this long before answering every request.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self, url: &str) -> usize {
            self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
        }

        pub fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }

        fn next_response(&self, url: &str) -> Response {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => queue.front().cloned().unwrap(),
                None => Err(FetchError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    #[async_trait]
    impl DocumentFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<Document> {
            *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let body = self.next_response(url)?;
            Ok(Document::new(url, body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeFetcher;
    use super::*;
    use crate::error::AppError;

    #[test]
    fn http_fetcher_builds_from_default_config() {
        assert!(HttpFetcher::new(&CrawlerConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn fake_replays_script_then_repeats_last() {
        let url = "https://example.com/";
        let fetcher = FakeFetcher::new().script(
            url,
            vec![
                Err(FetchError::Timeout { url: url.into() }),
                Ok("<p>ok</p>".into()),
            ],
        );

        assert!(matches!(
            fetcher.fetch(url).await,
            Err(AppError::Fetch(FetchError::Timeout { .. }))
        ));
        assert_eq!(fetcher.fetch(url).await.unwrap().body, "<p>ok</p>");
        assert_eq!(fetcher.fetch(url).await.unwrap().body, "<p>ok</p>");
        assert_eq!(fetcher.calls(url), 3);
    }

    #[tokio::test]
    async fn fake_unknown_url_is_404() {
        let fetcher = FakeFetcher::new();
        assert!(matches!(
            fetcher.fetch("https://example.com/missing").await,
            Err(AppError::Fetch(FetchError::HttpStatus { status: 404, .. }))
        ));
    }
}
