use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use super::retry::RetryFetch;
use crate::Result;

/// Cerema "données foncières" API: DV3F yearly indicators and DVF geomutations.
pub struct Cerema {
    fetch: RetryFetch,
    indicators_url: String,
    token: Option<String>,
}

impl Cerema {
    pub fn new(fetch: RetryFetch, indicators_url: &str, token: Option<String>) -> Cerema {
        Cerema {
            fetch,
            indicators_url: indicators_url.to_string(),
            token,
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Token {token}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Yearly indicators page for one commune, `{ "results": [...] }`.
    pub async fn indicators(&self, code_insee: &str) -> Result<Value> {
        let url = format!("{}{}", self.indicators_url, code_insee);
        self.fetch.get_json(&url, &[], self.headers()).await
    }

    /// GeoJSON feature collection for a bounding box query.
    pub async fn geomutations(&self, url: &str) -> Result<Value> {
        self.fetch.get_json(url, &[], self.headers()).await
    }
}
