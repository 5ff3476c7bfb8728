use crate::errors::ApiError;
use crate::models::{ApiResponse, OfferSubmission, StatisticsSnapshot};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

#[async_trait]
pub trait OfferApi: Send + Sync {
    async fn submit(
        &self,
        submission: &OfferSubmission,
    ) -> Result<ApiResponse<OfferSubmission>, ApiError>;

    async fn check_health(&self) -> Result<ApiResponse<serde_json::Value>, ApiError>;

    /// `GET /api/stats`. Filters are only sent when present and non-empty.
    async fn get_stats(
        &self,
        industry: Option<&str>,
        salary_range: Option<&str>,
    ) -> Result<ApiResponse<StatisticsSnapshot>, ApiError>;
}

pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Query pairs for `/api/stats`, skipping absent or blank filters.
pub fn stats_query<'a>(
    industry: Option<&'a str>,
    salary_range: Option<&'a str>,
) -> Vec<(&'static str, &'a str)> {
    [("industry", industry), ("salaryRange", salary_range)]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect()
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json::<ApiResponse<T>>().await?)
}

#[async_trait]
impl OfferApi for ApiClient {
    async fn submit(
        &self,
        submission: &OfferSubmission,
    ) -> Result<ApiResponse<OfferSubmission>, ApiError> {
        debug!(?submission, "submitting offer");
        let result = async {
            let response = self
                .client
                .post(self.url("/api/offer"))
                .json(submission)
                .send()
                .await?;
            read_envelope(response).await
        }
        .await;

        if let Err(err) = &result {
            error!("offer submission failed: {err}");
        }
        result
    }

    async fn check_health(&self) -> Result<ApiResponse<serde_json::Value>, ApiError> {
        let result = async {
            let response = self.client.get(self.url("/")).send().await?;
            read_envelope(response).await
        }
        .await;

        if let Err(err) = &result {
            error!("health check failed: {err}");
        }
        result
    }

    async fn get_stats(
        &self,
        industry: Option<&str>,
        salary_range: Option<&str>,
    ) -> Result<ApiResponse<StatisticsSnapshot>, ApiError> {
        let query = stats_query(industry, salary_range);
        debug!(?query, "fetching stats");
        let result = async {
            let response = self
                .client
                .get(self.url("/api/stats"))
                .query(&query)
                .send()
                .await?;
            read_envelope(response).await
        }
        .await;

        if let Err(err) = &result {
            error!("fetching stats failed: {err}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_query_omits_missing_filters() {
        assert!(stats_query(None, None).is_empty());
        assert!(stats_query(Some(""), Some("")).is_empty());
        assert_eq!(stats_query(Some("金融"), None), vec![("industry", "金融")]);
        assert_eq!(
            stats_query(Some("金融"), Some("15-20K")),
            vec![("industry", "金融"), ("salaryRange", "15-20K")]
        );
    }

    #[test]
    fn base_url_is_normalised() {
        let client = ApiClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/stats"), "http://localhost:8080/api/stats");
    }
}
