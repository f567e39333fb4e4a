use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::client::{BalanceSheetSource, Severity};
use crate::error::{Result, ShowMeError};
use crate::pagination::{Pagination, Summary};
use crate::render::{Align, DisplayCell, DisplayContent, RenderedTable, RowStyle};
use crate::shell::{Fetcher, Phase, Shell};

/// Fetch one page synchronously and format it for stdout. Network and API
/// failures are errors; empty or unreadable reports are plain messages.
pub fn balance_sheet(
    source: std::sync::Arc<dyn BalanceSheetSource>,
    pagination: Pagination,
) -> Result<String> {
    let mut shell = Shell::new(pagination);
    let fetcher = Fetcher::new(source);
    let done = fetcher.fetch_now(shell.mount());
    shell.complete(done.ticket, done.outcome);

    match shell.phase() {
        Phase::Ready(view) => {
            let summary = shell.summary();
            Ok(format_page(&view.table, summary, view.current_page, view.total_pages))
        }
        Phase::Empty { message } => Ok(message.clone()),
        Phase::Error { message, severity: Severity::Info } => Ok(message.clone()),
        Phase::Error { message, .. } => Err(ShowMeError::Other(message.clone())),
        Phase::Loading => Err(ShowMeError::Other("fetch did not complete".into())),
    }
}

// ---------------------------------------------------------------------------
// Pure formatting (display rows → String)
// ---------------------------------------------------------------------------

fn cell(c: &DisplayCell) -> Cell {
    let alignment = match c.align {
        Align::Left => CellAlignment::Left,
        Align::Right => CellAlignment::Right,
    };
    Cell::new(&c.value).set_alignment(alignment)
}

pub fn format_table(table: &RenderedTable) -> Table {
    let mut out = Table::new();
    if !table.header.is_empty() {
        out.set_header(table.header.iter().map(cell).collect::<Vec<_>>());
    }

    // comfy-table draws its own rule between rows, so separators are skipped
    for row in table.rows.iter().filter(|r| !r.is_separator()) {
        let cells: Vec<Cell> = match (&row.content, row.style) {
            (DisplayContent::FullWidth { text, span }, _) => {
                let mut cells = vec![Cell::new(text.as_str().cyan().bold())];
                cells.extend((1..*span).map(|_| Cell::new("")));
                cells
            }
            (DisplayContent::Cells(cells), RowStyle::Summary) => cells
                .iter()
                .map(|c| cell(&DisplayCell { value: c.value.bold().to_string(), align: c.align }))
                .collect(),
            (DisplayContent::Cells(cells), _) => cells.iter().map(cell).collect(),
        };
        out.add_row(cells);
    }
    out
}

pub fn format_page(
    table: &RenderedTable,
    summary: Option<Summary>,
    page: u32,
    total_pages: u32,
) -> String {
    let mut out = String::new();
    if !table.heading().is_empty() {
        out.push_str(&format!("{}\n", table.heading().bold()));
    }
    for subtitle in table.subtitles() {
        out.push_str(&format!("{subtitle}\n"));
    }
    out.push_str(&format_table(table).to_string());
    if let Some(summary) = summary {
        out.push_str(&format!("\n{summary}  (page {page} of {total_pages})"));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::ApiClient;
    use crate::model::PageResult;
    use crate::render::render_page;
    use crate::testing::{sample_page_json, spawn_router, unused_base_url};

    fn sample_table() -> RenderedTable {
        let page: PageResult = serde_json::from_value(sample_page_json(1, 10)).unwrap();
        render_page(&page).unwrap()
    }

    #[test]
    fn test_format_table_contains_rows() {
        let s = format_table(&sample_table()).to_string();
        assert!(s.contains("Account"));
        assert!(s.contains("Assets"));
        assert!(s.contains("Cash"));
        assert!(s.contains("50,000.00"));
        assert!(s.contains("Total Assets"));
        assert!(s.contains("200,000.00"));
        assert!(!s.contains("$"));
    }

    #[test]
    fn test_format_page_has_titles_and_summary() {
        let table = sample_table();
        let pagination = Pagination::default();
        let s = format_page(&table, Some(pagination.summary(3)), 1, 1);
        assert!(s.contains("Balance Sheet"));
        assert!(s.contains("Demo Company"));
        assert!(s.contains("Showing 1 to 3 of 3 entries"));
        assert!(s.contains("(page 1 of 1)"));
    }

    #[test]
    fn test_headerless_table_still_formats() {
        let table = RenderedTable {
            titles: vec![],
            header: vec![],
            columns: 1,
            rows: vec![],
        };
        let s = format_page(&table, None, 1, 1);
        assert!(!s.contains("Showing"));
    }

    #[test]
    fn test_balance_sheet_over_http() {
        use axum::routing::get;
        let router = axum::Router::new().route(
            "/api/balance-sheet",
            get(|| async { axum::Json(sample_page_json(1, 10)) }),
        );
        let client = ApiClient::new(spawn_router(router)).unwrap();
        let s = balance_sheet(Arc::new(client), Pagination::default()).unwrap();
        assert!(s.contains("Net Assets"));
        assert!(s.contains("Showing 1 to 3 of 3 entries"));
    }

    #[test]
    fn test_balance_sheet_failure_is_an_error() {
        let client = ApiClient::new(unused_base_url()).unwrap();
        let err = balance_sheet(Arc::new(client), Pagination::default()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch balance sheet");
    }

    #[test]
    fn test_malformed_response_is_a_message() {
        use axum::routing::get;
        let router = axum::Router::new().route(
            "/api/balance-sheet",
            get(|| async { axum::Json(serde_json::json!({"unexpected": true})) }),
        );
        let client = ApiClient::new(spawn_router(router)).unwrap();
        let s = balance_sheet(Arc::new(client), Pagination::default()).unwrap();
        assert_eq!(s, "Unexpected response from the balance sheet API");
    }

    #[test]
    fn test_empty_report_is_a_message() {
        use axum::routing::get;
        let router = axum::Router::new().route(
            "/api/balance-sheet",
            get(|| async { axum::Json(serde_json::json!({"Reports": [], "TotalRows": 0})) }),
        );
        let client = ApiClient::new(spawn_router(router)).unwrap();
        let s = balance_sheet(Arc::new(client), Pagination::default()).unwrap();
        assert_eq!(s, "No data available");
    }
}
