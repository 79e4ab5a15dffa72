//! REST client for the admin notification endpoints.
//!
//! The controller only talks to the [`NotificationsApi`] trait; the
//! reqwest-backed [`HttpNotificationsApi`] is the production implementation,
//! and tests substitute an in-memory fake.

use async_trait::async_trait;
use neurorecall_notifications_util::Notification;
use serde::Deserialize;

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}")]
    Server { status: u16 },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}

/// The notification endpoints of the admin REST API.
#[async_trait]
pub trait NotificationsApi: Send + Sync + 'static {
    /// `GET /api/admin/notifications/count`
    async fn unread_count(&self) -> Result<u64, ApiError>;

    /// `GET /api/admin/notifications?limit={limit}`
    async fn recent(&self, limit: u32) -> Result<Vec<Notification>, ApiError>;

    /// `POST /api/admin/notifications/{id}/mark-read`
    async fn mark_read(&self, id: i64) -> Result<(), ApiError>;

    /// `POST /api/admin/notifications/mark-all-read`
    async fn mark_all_read(&self) -> Result<(), ApiError>;
}

/// Count endpoint body. A missing or null `count` reads as zero.
#[derive(Debug, Deserialize)]
struct CountResponse {
    #[serde(default)]
    count: Option<u64>,
}

/// reqwest-backed client.
///
/// The cookie store carries the admin session on every request, matching the
/// backend's cookie-based authentication.
pub struct HttpNotificationsApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpNotificationsApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Reuse an existing client, e.g. one that already holds a session cookie.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check_status(resp: &reqwest::Response) -> Result<(), ApiError> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Server {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl NotificationsApi for HttpNotificationsApi {
    async fn unread_count(&self) -> Result<u64, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/admin/notifications/count"))
            .send()
            .await?;
        Self::check_status(&resp)?;
        let body: CountResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.count.unwrap_or(0))
    }

    async fn recent(&self, limit: u32) -> Result<Vec<Notification>, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/admin/notifications"))
            .query(&[("limit", limit)])
            .send()
            .await?;
        Self::check_status(&resp)?;
        resp.json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn mark_read(&self, id: i64) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url(&format!("/api/admin/notifications/{id}/mark-read")))
            .send()
            .await?;
        Self::check_status(&resp)
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url("/api/admin/notifications/mark-all-read"))
            .send()
            .await?;
        Self::check_status(&resp)
    }
}
