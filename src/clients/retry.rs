use std::time::Duration;

use log::warn;
use reqwest::{header::HeaderMap, Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{config::Config, Error, Result};

const USER_AGENT: &str = concat!("immo/", env!("CARGO_PKG_VERSION"));

/// GET with a bounded number of attempts. Only timeouts are retried, any
/// other failure or a non-200 answer ends the call.
#[derive(Debug, Clone)]
pub struct RetryFetch {
    client: Client,
    max_retries: u32,
}

impl RetryFetch {
    pub fn new(config: &Config) -> Result<RetryFetch> {
        RetryFetch::with_timeout(
            Duration::from_secs(config.request_timeout_seconds),
            config.max_retries,
        )
    }

    pub fn with_timeout(timeout: Duration, max_retries: u32) -> Result<RetryFetch> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(RetryFetch {
            client,
            max_retries: max_retries.max(1),
        })
    }

    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: HeaderMap,
    ) -> Result<Response> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let request = self
                .client
                .get(url)
                .query(query)
                .headers(headers.clone());

            match request.send().await {
                Ok(response) if response.status() == StatusCode::OK => return Ok(response),
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Status {
                        url: url.to_string(),
                        status,
                        body,
                    });
                }
                Err(e) if e.is_timeout() => {
                    warn!("Timeout on {} (attempt {}/{})", url, attempts, self.max_retries);
                    if attempts >= self.max_retries {
                        return Err(Error::RetriesExhausted {
                            url: url.to_string(),
                            attempts,
                        });
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: HeaderMap,
    ) -> Result<T> {
        let response = self.get(url, query, headers).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url, &[], HeaderMap::new()).await?;
        Ok(response.text().await?)
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url, &[], HeaderMap::new()).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
