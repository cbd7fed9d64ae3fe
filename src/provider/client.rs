use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::provider::error::ProviderError;
use crate::provider::types::SeriesEndState;

/// Upstream match-data source, the injectable seam between the aggregation
/// pipeline and the provider. Tests supply an in-memory implementation.
pub trait SeriesSource: Send + Sync {
    /// Most recent series ids for a team, newest first, filtered to one
    /// game title.
    fn list_recent_series(
        &self,
        team_id: &str,
        limit: u32,
        title: &str,
    ) -> impl Future<Output = Result<Vec<String>, ProviderError>> + Send;

    /// Authoritative end-of-series payload.
    fn fetch_end_state(
        &self,
        series_id: &str,
    ) -> impl Future<Output = Result<SeriesEndState, ProviderError>> + Send;

    /// Raw compressed event archive (gzip bytes).
    fn fetch_event_archive(
        &self,
        series_id: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// HTTP client for the match-data provider.
///
/// Series discovery is a GraphQL query; end-state and event-archive
/// downloads are plain GETs. Retryable failures get exactly one retry after
/// the backoff delay.
pub struct ProviderClient {
    client: Client,
    base_url: String,
    api_key: String,
    backoff: Duration,
}

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Series listing response structure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllSeriesData {
    all_series: Option<SeriesConnection>,
}

#[derive(Debug, Deserialize)]
struct SeriesConnection {
    edges: Vec<SeriesEdge>,
}

#[derive(Debug, Deserialize)]
struct SeriesEdge {
    node: SeriesNode,
}

#[derive(Debug, Deserialize)]
struct SeriesNode {
    id: String,
}

impl ProviderClient {
    /// Create a new provider client.
    pub fn new(base_url: &str, api_key: &str, backoff: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            backoff,
        }
    }

    /// Run an operation, retrying once after backoff on retryable errors.
    async fn retry_once<T, Fut>(
        &self,
        what: &str,
        op: impl Fn() -> Fut,
    ) -> Result<T, ProviderError>
    where
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        match op().await {
            Err(e) if e.is_retryable() => {
                warn!("{} failed ({}), retrying after {:?}", what, e, self.backoff);
                sleep(self.backoff).await;
                op().await
            }
            other => other,
        }
    }

    async fn list_recent_series_once(
        &self,
        team_id: &str,
        limit: u32,
        title: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let query = r#"
            query RecentSeries($teamId: ID!, $limit: Int!, $title: String!) {
                allSeries(
                    filter: { teamIds: { in: [$teamId] }, titleId: $title }
                    orderBy: StartTimeScheduled
                    orderDirection: DESC
                    first: $limit
                ) {
                    edges {
                        node {
                            id
                        }
                    }
                }
            }
        "#;

        let url = format!("{}/graphql", self.base_url);
        debug!("Listing recent series for team {} from {}", team_id, url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": {
                    "teamId": team_id,
                    "limit": limit,
                    "title": title,
                }
            }))
            .send()
            .await?;

        let response = check_status(response, team_id).await?;

        let gql: GraphQlResponse<AllSeriesData> = response.json().await?;

        if let Some(errors) = gql.errors {
            if !errors.is_empty() {
                let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
                warn!("Provider GraphQL errors: {:?}", messages);
            }
        }

        let ids: Vec<String> = gql
            .data
            .and_then(|d| d.all_series)
            .map(|c| c.edges.into_iter().map(|e| e.node.id).collect())
            .unwrap_or_default();

        debug!("Found {} recent series for team {}", ids.len(), team_id);
        Ok(ids)
    }

    async fn fetch_end_state_once(&self, series_id: &str) -> Result<SeriesEndState, ProviderError> {
        let url = format!("{}/series/{}/end-state", self.base_url, series_id);
        debug!("Fetching end-state: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        let response = check_status(response, series_id).await?;
        let state: SeriesEndState = response.json().await?;
        Ok(state)
    }

    async fn fetch_event_archive_once(&self, series_id: &str) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{}/series/{}/events", self.base_url, series_id);
        debug!("Fetching event archive: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let response = check_status(response, series_id).await?;
        let bytes = response.bytes().await?;
        debug!("Downloaded {} byte archive for series {}", bytes.len(), series_id);
        Ok(bytes.to_vec())
    }
}

/// Map upstream HTTP status codes onto the error taxonomy.
async fn check_status(
    response: reqwest::Response,
    subject: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Auth),
        StatusCode::NOT_FOUND => Err(ProviderError::NotFound(subject.to_string())),
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl SeriesSource for ProviderClient {
    fn list_recent_series(
        &self,
        team_id: &str,
        limit: u32,
        title: &str,
    ) -> impl Future<Output = Result<Vec<String>, ProviderError>> + Send {
        async move {
            self.retry_once("list_recent_series", || {
                self.list_recent_series_once(team_id, limit, title)
            })
            .await
        }
    }

    fn fetch_end_state(
        &self,
        series_id: &str,
    ) -> impl Future<Output = Result<SeriesEndState, ProviderError>> + Send {
        async move {
            self.retry_once("fetch_end_state", || self.fetch_end_state_once(series_id))
                .await
        }
    }

    fn fetch_event_archive(
        &self,
        series_id: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send {
        async move {
            self.retry_once("fetch_event_archive", || {
                self.fetch_event_archive_once(series_id)
            })
            .await
        }
    }
}
