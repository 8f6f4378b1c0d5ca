use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request failed with status {status}: {body}")]
    RequestFailed {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RemoteError>;

/// Client for the single remote quote collection
///
/// The endpoint is a plain collection resource: one GET returns everything,
/// one POST uploads everything. No auth, no pagination, no sync tokens.
pub struct RemoteClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string(), DEFAULT_TIMEOUT_SECS)
    }

    /// For pointing at a different endpoint, or a local stub in tests
    pub fn with_endpoint(endpoint: String, timeout_secs: u64) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("QuoteRack/0.1.0"),
        );

        // Bounded timeout so a hung request can't stall the sync tick forever
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, endpoint }
    }

    /// Fetch the full remote collection
    pub async fn fetch_items(&self) -> Result<Vec<RemoteItem>> {
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::RequestFailed { status, body });
        }

        let body = response.text().await?;
        let items: Vec<RemoteItem> = serde_json::from_str(&body)?;
        debug!("fetched {} items from {}", items.len(), self.endpoint);
        Ok(items)
    }

    /// Upload a full collection as the request body
    ///
    /// The body is whatever serializes to a JSON array of records. The
    /// placeholder endpoint just echoes it back; we only care that the POST
    /// was accepted.
    pub async fn push_items<T: Serialize + ?Sized>(&self, items: &T) -> Result<()> {
        let response = self.client.post(&self.endpoint).json(items).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::RequestFailed { status, body });
        }

        debug!("pushed local collection to {}", self.endpoint);
        Ok(())
    }
}

impl Default for RemoteClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape of one item on the remote endpoint
///
/// The remote knows nothing about quotes; it serves post-like objects. The
/// sync layer projects `title` into quote text and tags a fixed category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteItem {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_item_tolerates_missing_fields() {
        let item: RemoteItem = serde_json::from_str(r#"{"title": "stay curious"}"#).unwrap();
        assert_eq!(item.title, "stay curious");
        assert_eq!(item.id, 0);
        assert_eq!(item.body, "");
    }

    #[test]
    fn remote_item_parses_full_shape() {
        let item: RemoteItem =
            serde_json::from_str(r#"{"id": 7, "title": "t", "body": "b", "userId": 1}"#).unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.body, "b");
    }
}
