//! Mock upstream accounting API. Serves one static balance sheet.

use axum::routing::get;
use axum::{Json, Router};

use crate::fmt::thousands;
use crate::model::{Cell, Report, ReportsEnvelope, Row, RowType};

pub const REPORT_PATH: &str = "/api.xro/2.0/Reports/BalanceSheet";
pub const DEFAULT_PORT: u16 = 3000;

/// Accounts generated under each section of the fixture.
const ACCOUNTS_PER_SECTION: u64 = 20;

pub fn router() -> Router {
    Router::new()
        .route(REPORT_PATH, get(balance_sheet))
        .merge(super::health_routes())
}

async fn balance_sheet() -> Json<ReportsEnvelope> {
    tracing::info!("serving balance sheet fixture");
    Json(fixture())
}

fn dollars(val: u64) -> Cell {
    Cell::new(format!("${}", thousands(val)))
}

fn data_row(row_type: RowType, title: &str, current: u64, previous: u64, change: u64) -> Row {
    Row {
        row_type,
        title: Some(title.to_string()),
        cells: Some(vec![
            Cell::new(title),
            dollars(current),
            dollars(previous),
            dollars(change),
        ]),
        rows: None,
    }
}

fn test_accounts(count: u64) -> Vec<Row> {
    (0..count)
        .map(|i| {
            data_row(
                RowType::Row,
                &format!("Test Account {}", i + 1),
                10_000 + i * 1_000,
                9_000 + i * 1_000,
                1_000 + i * 100,
            )
        })
        .collect()
}

fn section(title: &str, current: u64, previous: u64, change: u64) -> Row {
    Row {
        rows: Some(test_accounts(ACCOUNTS_PER_SECTION)),
        ..data_row(RowType::Section, title, current, previous, change)
    }
}

/// The static balance sheet: header, Assets and Liabilities sections of
/// generated accounts, and a Net Assets summary.
pub fn fixture() -> ReportsEnvelope {
    let header = Row {
        row_type: RowType::Header,
        title: Some("Header".to_string()),
        cells: Some(
            ["Account", "Current", "Previous", "Change"]
                .into_iter()
                .map(Cell::new)
                .collect(),
        ),
        rows: None,
    };
    ReportsEnvelope {
        reports: vec![Report {
            report_id: "BalanceSheet".to_string(),
            report_name: "Balance Sheet".to_string(),
            report_type: "BalanceSheet".to_string(),
            report_titles: vec!["Balance Sheet".to_string()],
            report_date: "2024-03-24".to_string(),
            updated_date_utc: "2024-03-24T00:00:00".to_string(),
            rows: vec![
                header,
                section("Assets", 1_000_000, 900_000, 100_000),
                section("Liabilities", 800_000, 750_000, 50_000),
                data_row(RowType::SummaryRow, "Net Assets", 200_000, 150_000, 50_000),
            ],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_router;

    #[test]
    fn test_fixture_shape() {
        let envelope = fixture();
        assert_eq!(envelope.reports.len(), 1);
        let rows = &envelope.reports[0].rows;
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].row_type, RowType::Header);
        assert_eq!(rows[0].cells.as_ref().unwrap().len(), 4);

        let assets = rows[1].rows.as_ref().unwrap();
        assert_eq!(assets.len(), 20);
        let first = assets[0].cell_values().unwrap();
        assert_eq!(first, vec!["Test Account 1", "$10,000", "$9,000", "$1,000"]);
        let last = assets[19].cell_values().unwrap();
        assert_eq!(last, vec!["Test Account 20", "$29,000", "$28,000", "$2,900"]);

        assert_eq!(rows[3].row_type, RowType::SummaryRow);
        assert_eq!(rows[3].cell_values().unwrap()[1], "$200,000");
    }

    #[test]
    fn test_fixture_json_uses_wire_names() {
        let json = serde_json::to_value(fixture()).unwrap();
        let report = &json["Reports"][0];
        assert_eq!(report["ReportID"], "BalanceSheet");
        assert_eq!(report["Rows"][0]["RowType"], "Header");
        assert!(report["Rows"][0]["Rows"].is_null());
        assert_eq!(report["Rows"][1]["Rows"][0]["Cells"][1]["Value"], "$10,000");
    }

    #[test]
    fn test_routes() {
        let base = spawn_router(router());
        let health: serde_json::Value = reqwest::blocking::get(format!("{base}/health"))
            .unwrap()
            .json()
            .unwrap();
        assert_eq!(health, serde_json::json!({"status": "healthy"}));

        let envelope: ReportsEnvelope = reqwest::blocking::get(format!("{base}{REPORT_PATH}"))
            .unwrap()
            .json()
            .unwrap();
        assert_eq!(envelope, fixture());
    }
}
