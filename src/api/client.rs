//! HTTP client for the school management REST API.
//!
//! This module provides the `ApiClient` struct plus the concrete source
//! adapters that plug it into the dashboard pipeline: the roster endpoint as
//! the primary `RosterSource` and the five analytics endpoints as
//! `AnalyticsSource`s.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::models::{
    AnalyticsPayload, AttendanceAnalytics, ConversionAnalytics, CustomerConversionAnalytics,
    GeneralAnalytics, PaymentAnalytics, RosterLimit, RosterMeta, RosterPage, Student,
};
use crate::source::{AnalyticsSource, RosterSource, SourceKind};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
/// The settle-all executor applies its own (usually tighter) per-source
/// deadline on top of this.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the school management backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new ApiClient with the given token, sharing the connection pool
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidToken(e.to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// GET a JSON endpoint and unwrap the `{ success, data }` envelope.
    /// No retries: a failed call is the caller's signal, not ours to hide.
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .query(query)
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let envelope: ApiEnvelope<T> =
            serde_json::from_str(&text).map_err(|e| ApiError::bad_payload(path, e))?;
        Ok(envelope.data)
    }

    // ===== Data Fetching Methods =====

    /// Fetch a page of the student roster. `RosterLimit::All` requests the
    /// backend's unpaginated mode.
    pub async fn fetch_students(
        &self,
        page: u32,
        limit: RosterLimit,
    ) -> Result<RosterPage, ApiError> {
        let page_value = page.to_string();
        let limit_value = limit.as_query_value();
        let url = format!("{}/api/students", self.base_url);

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .query(&[("page", page_value.as_str()), ("limit", limit_value.as_str())])
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let parsed: StudentsEnvelope = serde_json::from_str(&text)
            .map_err(|e| ApiError::bad_payload("/api/students", e))?;

        debug!(
            count = parsed.data.len(),
            total = parsed.meta.total_count,
            returned_all = parsed.meta.returned_all,
            "Roster fetched"
        );

        Ok(RosterPage {
            students: parsed.data,
            meta: parsed.meta,
        })
    }

    /// Fetch student conversion analytics for the given period token
    pub async fn fetch_conversion_analytics(
        &self,
        period: &str,
    ) -> Result<ConversionAnalytics, ApiError> {
        self.get_data("/api/students/conversion-analytics", &[("period", period)])
            .await
    }

    /// Fetch customer conversion analytics for the given period token
    pub async fn fetch_customer_conversion_analytics(
        &self,
        period: &str,
    ) -> Result<CustomerConversionAnalytics, ApiError> {
        self.get_data("/api/customers/conversion-analytics", &[("period", period)])
            .await
    }

    /// Fetch attendance analytics for the given period token
    pub async fn fetch_attendance_analytics(
        &self,
        period: &str,
    ) -> Result<AttendanceAnalytics, ApiError> {
        self.get_data("/api/attendance/analytics", &[("period", period)])
            .await
    }

    /// Fetch payment analytics for the given period token
    pub async fn fetch_payment_analytics(
        &self,
        period: &str,
    ) -> Result<PaymentAnalytics, ApiError> {
        self.get_data("/api/payments/analytics", &[("period", period)])
            .await
    }

    /// Fetch the general engagement report for the given period token
    pub async fn fetch_general_analytics(
        &self,
        period: &str,
    ) -> Result<GeneralAnalytics, ApiError> {
        self.get_data("/api/analytics", &[("period", period)]).await
    }

    /// All five analytics endpoints as registered sources, in fold order
    pub fn analytics_sources(&self) -> Vec<Arc<dyn AnalyticsSource>> {
        [
            SourceKind::Conversion,
            SourceKind::CustomerConversion,
            SourceKind::Attendance,
            SourceKind::Payment,
            SourceKind::General,
        ]
        .into_iter()
        .map(|kind| {
            Arc::new(EndpointSource {
                client: self.clone(),
                kind,
            }) as Arc<dyn AnalyticsSource>
        })
        .collect()
    }
}

#[async_trait]
impl RosterSource for ApiClient {
    async fn fetch_roster(&self, page: u32, limit: RosterLimit) -> Result<RosterPage, ApiError> {
        self.fetch_students(page, limit).await
    }
}

/// One analytics endpoint bound to a client. Each instance covers exactly
/// one source kind; the dashboard registers five of these.
pub struct EndpointSource {
    client: ApiClient,
    kind: SourceKind,
}

#[async_trait]
impl AnalyticsSource for EndpointSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, period: &str) -> Result<AnalyticsPayload, ApiError> {
        match self.kind {
            SourceKind::Conversion => self
                .client
                .fetch_conversion_analytics(period)
                .await
                .map(AnalyticsPayload::Conversion),
            SourceKind::CustomerConversion => self
                .client
                .fetch_customer_conversion_analytics(period)
                .await
                .map(AnalyticsPayload::CustomerConversion),
            SourceKind::Attendance => self
                .client
                .fetch_attendance_analytics(period)
                .await
                .map(AnalyticsPayload::Attendance),
            SourceKind::Payment => self
                .client
                .fetch_payment_analytics(period)
                .await
                .map(AnalyticsPayload::Payment),
            SourceKind::General => self
                .client
                .fetch_general_analytics(period)
                .await
                .map(AnalyticsPayload::General),
        }
    }
}

// Internal API response types for parsing

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
struct StudentsEnvelope {
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
    #[serde(default)]
    data: Vec<Student>,
    #[serde(default)]
    meta: RosterMeta,
}
