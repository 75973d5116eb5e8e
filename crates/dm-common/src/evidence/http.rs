use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::{header::CONTENT_TYPE, redirect, Client};
use tokio::time::timeout;
use tracing::warn;

use super::{FetchedPage, PageFetcher};
use crate::config::FetchConfig;
use crate::error::FetchError;

/// Plain-HTTP GET of a domain's root over `reqwest`.
///
/// The client is built on first use and reused afterwards. Every fetch is
/// bounded by `FetchConfig::timeout`; dropping the future aborts the request.
#[derive(Debug, Default)]
pub struct HttpPageFetcher {
    config: FetchConfig,
    client: OnceCell<Client>,
}

impl HttpPageFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn client(&self) -> Result<&Client, FetchError> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .redirect(redirect::Policy::limited(self.config.max_redirects))
                .timeout(self.config.timeout)
                .user_agent(self.config.user_agent.as_str())
                .build()
                .map_err(FetchError::Client)
        })
    }

    async fn get(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let request_failed = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client()?.get(url).send().await.map_err(request_failed)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        let body = response.bytes().await.map_err(request_failed)?;

        Ok(FetchedPage {
            url: url.to_string(),
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, domain: &str) -> Result<FetchedPage, FetchError> {
        let url = format!("http://{domain}/");
        let limit = self.config.timeout;

        let result = timeout(limit, self.get(&url)).await;
        match result {
            Ok(Ok(page)) => Ok(page),
            Ok(Err(err)) => {
                warn!(%url, error = %err, "home page fetch failed");
                Err(err)
            }
            Err(_) => {
                warn!(%url, timeout_ms = limit.as_millis() as u64, "home page fetch timed out");
                Err(FetchError::Timeout { url, timeout: limit })
            }
        }
    }
}
