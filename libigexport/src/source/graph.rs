//! Instagram Graph API source

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ConfigError, FetchError, Result};
use crate::source::MediaSource;
use crate::types::PageResponse;

const USER_AGENT: &str = concat!("ig-export/", env!("CARGO_PKG_VERSION"));

pub struct GraphClient {
    client: reqwest::Client,
    api: ApiConfig,
}

impl GraphClient {
    /// Create a client using the timeout from `api`
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(api.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            client,
            api: api.clone(),
        })
    }

    /// First page of `user_id`'s media listing
    ///
    /// `{base_url}/{version}/{user_id}/media?fields=...&access_token=...`
    pub fn seed_url(&self, user_id: &str, token: &SecretString) -> Result<String> {
        let base = self.api.base_url.trim_end_matches('/');
        let endpoint = format!("{}/{}/{}/media", base, self.api.version, user_id);
        let fields = self.api.fields.join(",");

        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("fields", fields.as_str()),
                ("access_token", token.expose_secret()),
            ],
        )
        .map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            reason: e.to_string(),
        })?;

        Ok(url.into())
    }
}

#[async_trait]
impl MediaSource for GraphClient {
    async fn fetch_page(&self, url: &str) -> std::result::Result<PageResponse, FetchError> {
        debug!(url = %redact_token(url), "Fetching page");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), body = %body, "API request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(body = %body, "Raw API response");

        let page: PageResponse = serde_json::from_str(&body)?;
        Ok(page)
    }

    fn name(&self) -> &str {
        "graph"
    }
}

/// Replace the `access_token` query value so URLs can be logged
pub fn redact_token(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_token" {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    if pairs.is_empty() {
        return url.to_string();
    }

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.into()
}
