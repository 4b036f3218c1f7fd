//! HTTP client for the search service.

use std::future::Future;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::WidgetConfig;
use crate::error::SearchError;
use crate::query::Query;
use crate::types::{ErrorBody, HealthStatus, TitleItem};

/// Anything that can answer a [`Query`] with a list of titles.
pub trait SearchBackend {
    fn search(&self, query: &Query) -> impl Future<Output = Result<Vec<TitleItem>, SearchError>>;
}

#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: Client,
    base_url: String,
    search_path: String,
    item_detail_path: String,
}

impl HttpSearchClient {
    pub fn new(config: &WidgetConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &WidgetConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_path: config.search_path.clone(),
            item_detail_path: config.item_detail_path.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn search_url(&self) -> String {
        self.url(&self.search_path)
    }

    /// POST the query and decode the result list.
    pub async fn search(&self, query: &Query) -> Result<Vec<TitleItem>, SearchError> {
        debug!(url = %self.search_url(), ?query, "Sending search");
        let response = self.client.post(self.search_url()).json(query).send().await?;
        decode(response).await
    }

    /// Fetch the service's detail record for one title.
    pub async fn item(&self, tconst: &str) -> Result<serde_json::Value, SearchError> {
        let url = self.url(&format!("{}/{}", self.item_detail_path, tconst));
        debug!(%url, "Fetching item detail");
        let response = self.client.post(url).send().await?;
        decode(response).await
    }

    pub async fn health(&self) -> Result<HealthStatus, SearchError> {
        let response = self.client.get(self.url("/hc")).send().await?;
        decode(response).await
    }
}

impl SearchBackend for HttpSearchClient {
    fn search(&self, query: &Query) -> impl Future<Output = Result<Vec<TitleItem>, SearchError>> {
        HttpSearchClient::search(self, query)
    }
}

/// Decode a success body, or turn a 4xx/5xx into [`SearchError::Status`] carrying the
/// service's `error` message when it sent one.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SearchError> {
    let status = response.status();
    let body = response.bytes().await?;

    if status.as_u16() >= 400 {
        let message = match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(err) => err.error,
            Err(_) => String::from_utf8_lossy(&body).into_owned(),
        };
        error!(status = status.as_u16(), body = %String::from_utf8_lossy(&body), "Search service error");
        return Err(SearchError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}
