//! HTTP client for `/api/balance-sheet`.
//!
//! One GET per call, no retries. Every failure is folded into a
//! [`FetchError`] whose `Display` is the text shown to the user.

use std::time::Instant;

use thiserror::Error;

use crate::error::Result;
use crate::model::{BalanceSheetPage, PageResult};

pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to fetch balance sheet";
pub const MALFORMED_MESSAGE: &str = "Unexpected response from the balance sheet API";
pub const NO_DATA_MESSAGE: &str = "No data available";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response at all (connection refused, DNS, timeout).
    #[error("Failed to fetch balance sheet")]
    Network { detail: String },

    /// Non-2xx response. `message` is the server's `detail.message` when the
    /// body carried one, the generic failure text otherwise.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body does not match the page schema.
    #[error("Unexpected response from the balance sheet API")]
    Malformed { detail: String },

    /// Valid response without a report or rows.
    #[error("No data available")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Info,
}

impl FetchError {
    pub fn severity(&self) -> Severity {
        match self {
            FetchError::Network { .. } | FetchError::Api { .. } => Severity::Error,
            FetchError::Malformed { .. } | FetchError::Empty => Severity::Info,
        }
    }
}

/// Anything that can produce one page of the balance sheet.
pub trait BalanceSheetSource: Send + Sync {
    fn fetch_page(&self, page: u32, page_size: u32)
        -> std::result::Result<BalanceSheetPage, FetchError>;
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("showme/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/api/balance-sheet", self.base_url)
    }
}

impl BalanceSheetSource for ApiClient {
    fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> std::result::Result<BalanceSheetPage, FetchError> {
        let started = Instant::now();
        let response = self
            .http
            .get(self.endpoint())
            .query(&[("page", page), ("page_size", page_size)])
            .send()
            .map_err(|e| {
                tracing::warn!(error = %e, page, page_size, "balance sheet request failed");
                FetchError::Network { detail: e.to_string() }
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| FetchError::Network { detail: e.to_string() })?;
        tracing::debug!(
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "balance sheet response"
        );

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!(status = status.as_u16(), %message, "balance sheet API error");
            return Err(FetchError::Api { status: status.as_u16(), message });
        }
        parse_page(&body)
    }
}

/// Decode and normalize a 2xx body.
pub fn parse_page(body: &str) -> std::result::Result<BalanceSheetPage, FetchError> {
    let result: PageResult = serde_json::from_str(body).map_err(|e| {
        tracing::warn!(error = %e, "balance sheet response did not match schema");
        FetchError::Malformed { detail: e.to_string() }
    })?;
    BalanceSheetPage::from_result(&result).ok_or(FetchError::Empty)
}

/// Pull `detail.message` out of an error body, falling back to the generic
/// text for anything else (empty body, HTML, validation lists, ...).
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("detail"))
        .and_then(|d| d.get("message"))
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string())
}
