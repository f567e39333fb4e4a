//! Balance-sheet API backend.
//!
//! `GET /api/balance-sheet?page=&page_size=` fetches the report from the
//! upstream accounting API (with retries), flattens its sections into one
//! run of body rows, and returns the requested page. The header row is
//! repeated at the top of every page.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::{json, Value};
use thiserror::Error;

use crate::model::{ErrorBody, ErrorDetail, PageResult, Report, ReportsEnvelope, Row, RowType};
use crate::pagination::total_pages;

pub const DEFAULT_PORT: u16 = 8000;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const MAX_ATTEMPTS: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("page must be greater than or equal to 1")]
    PageTooSmall,

    #[error("page_size must be greater than or equal to 1")]
    PageSizeTooSmall,

    #[error("page_size must be less than or equal to 100")]
    PageSizeTooLarge,

    #[error("{name} must be an integer, got '{value}'")]
    NotAnInteger { name: &'static str, value: String },

    #[error("Failed to fetch balance sheet after {attempts} attempts: {last}")]
    Upstream { attempts: u32, last: String },
}

impl BackendError {
    fn status(&self) -> StatusCode {
        match self {
            BackendError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            BackendError::Upstream { .. } => "UpstreamError",
            _ => "ValidationError",
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: ErrorDetail {
                message: self.to_string(),
                kind: self.kind().to_string(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Upstream client
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Upstream {
    base_url: String,
    http: reqwest::Client,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Upstream {
    pub fn new(base_url: impl Into<String>) -> crate::error::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        })
    }

    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    async fn fetch_once(&self, page: u32, page_size: u32) -> Result<ReportsEnvelope, String> {
        let url = format!("{}{}", self.base_url, super::mock::REPORT_PATH);
        let response = self
            .http
            .get(&url)
            .query(&[("page", page), ("pageSize", page_size)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;
        tracing::info!(status = response.status().as_u16(), "upstream responded");
        response
            .json::<ReportsEnvelope>()
            .await
            .map_err(|e| format!("invalid upstream response: {e}"))
    }

    /// Fetch the report, retrying any failure up to `max_attempts` times.
    pub async fn fetch_reports(&self, page: u32, page_size: u32) -> Result<Vec<Report>, BackendError> {
        let mut last = String::new();
        for attempt in 1..=self.max_attempts {
            tracing::info!(
                base_url = %self.base_url,
                attempt,
                max_attempts = self.max_attempts,
                "fetching balance sheet from upstream"
            );
            match self.fetch_once(page, page_size).await {
                Ok(envelope) => return Ok(envelope.reports),
                Err(e) => {
                    tracing::error!(error = %e, attempt, "upstream fetch failed");
                    last = e;
                    if attempt < self.max_attempts {
                        tracing::info!(delay_ms = self.retry_delay.as_millis() as u64, "retrying");
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        Err(BackendError::Upstream {
            attempts: self.max_attempts,
            last,
        })
    }
}

// ---------------------------------------------------------------------------
// Flattening and pagination
// ---------------------------------------------------------------------------

/// One run of body rows: each section becomes a heading row (children
/// detached) followed by its children; other rows are kept as they are.
pub fn flatten_body(rows: &[Row]) -> Vec<Row> {
    let mut out = Vec::new();
    for row in rows {
        if row.row_type == RowType::Section {
            out.push(Row {
                rows: None,
                ..row.clone()
            });
            out.extend(row.rows.iter().flatten().cloned());
        } else {
            out.push(row.clone());
        }
    }
    out
}

/// Build the page response from upstream reports. Only the first report is
/// kept; its body rows are flattened and sliced to the requested page.
pub fn paginate(reports: Vec<Report>, page: u32, page_size: u32) -> PageResult {
    let Some(mut report) = reports.into_iter().next() else {
        return PageResult {
            reports: Vec::new(),
            total_rows: 0,
            current_page: page,
            page_size,
            total_pages: 0,
        };
    };

    let (header, body) = match report.rows.split_first() {
        Some((header, body)) => (Some(header.clone()), flatten_body(body)),
        None => (None, Vec::new()),
    };
    let total_rows = body.len() as u32;
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
    let page_rows = body.into_iter().skip(start).take(page_size as usize);

    report.rows = header.into_iter().chain(page_rows).collect();
    report.report_date = normalize_report_date(&report.report_date);
    report.updated_date_utc = normalize_updated_date(&report.updated_date_utc);

    PageResult {
        reports: vec![report],
        total_rows,
        current_page: page,
        page_size,
        total_pages: total_pages(total_rows, page_size),
    }
}

/// "31 March 2024" becomes "2024-03-31T00:00:00"; anything else is kept.
pub fn normalize_report_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%d %B %Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn ms_date_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/Date\((\d+)(?:[+-]\d{4})?\)/").ok())
        .as_ref()
}

/// "/Date(1711843200000+0000)/" becomes an ISO timestamp (UTC); anything
/// else is kept.
pub fn normalize_updated_date(raw: &str) -> String {
    ms_date_re()
        .and_then(|re| re.captures(raw))
        .and_then(|c| c[1].parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        .unwrap_or_else(|| raw.to_string())
}

// ---------------------------------------------------------------------------
// HTTP surface
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct AppState {
    upstream: Upstream,
}

pub fn router(upstream: Upstream) -> Router {
    let api = Router::new()
        .route("/api/balance-sheet", get(balance_sheet))
        .route("/api/balance-sheet/", get(balance_sheet))
        .with_state(AppState { upstream });
    Router::new()
        .route("/", get(root))
        .merge(api)
        .merge(super::health_routes())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Show Me The Money API" }))
}

fn int_param(
    params: &HashMap<String, String>,
    name: &'static str,
    default: u32,
) -> Result<i64, BackendError> {
    match params.get(name) {
        None => Ok(i64::from(default)),
        Some(value) => value.trim().parse().map_err(|_| BackendError::NotAnInteger {
            name,
            value: value.clone(),
        }),
    }
}

/// Validate `page` (≥ 1) and `page_size` (1..=100), applying defaults.
pub fn parse_query(params: &HashMap<String, String>) -> Result<(u32, u32), BackendError> {
    let page = int_param(params, "page", DEFAULT_PAGE)?;
    let page_size = int_param(params, "page_size", DEFAULT_PAGE_SIZE)?;
    if page < 1 {
        return Err(BackendError::PageTooSmall);
    }
    if page_size < 1 {
        return Err(BackendError::PageSizeTooSmall);
    }
    if page_size > i64::from(MAX_PAGE_SIZE) {
        return Err(BackendError::PageSizeTooLarge);
    }
    let page = u32::try_from(page).map_err(|_| BackendError::NotAnInteger {
        name: "page",
        value: page.to_string(),
    })?;
    Ok((page, page_size as u32))
}

async fn balance_sheet(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PageResult>, BackendError> {
    let (page, page_size) = parse_query(&params).inspect_err(|e| {
        tracing::warn!(error = %e, "rejected balance sheet request");
    })?;
    tracing::info!(page, page_size, "balance sheet requested");
    let reports = state.upstream.fetch_reports(page, page_size).await.inspect_err(|e| {
        tracing::error!(error = %e, "balance sheet request failed");
    })?;
    let result = paginate(reports, page, page_size);
    tracing::info!(
        total_rows = result.total_rows,
        total_pages = result.total_pages,
        "balance sheet served"
    );
    Ok(Json(result))
}
