//! Shared fixtures for unit tests: local HTTP servers and sample payloads.

use serde_json::{json, Value};

/// Serve `router` on an ephemeral localhost port from a background thread and
/// return its base URL. The listener is bound before returning, so requests
/// can be made immediately.
pub(crate) fn spawn_router(router: axum::Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub(crate) fn unused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A small but complete page: header, one titled section with a detail and a
/// summary child, and a top-level summary row.
pub(crate) fn sample_page_json(page: u32, page_size: u32) -> Value {
    json!({
        "Reports": [{
            "ReportID": "BalanceSheet",
            "ReportName": "Balance Sheet",
            "ReportType": "BalanceSheet",
            "ReportTitles": ["Balance Sheet", "Demo Company"],
            "ReportDate": "2024-03-24",
            "UpdatedDateUTC": "2024-03-24T00:00:00",
            "Rows": [
                {"RowType": "Header", "Title": null, "Cells": [
                    {"Value": "Account"}, {"Value": "Current"}, {"Value": "Previous"}, {"Value": "Change"}
                ], "Rows": null},
                {"RowType": "Section", "Title": "Assets", "Cells": null, "Rows": [
                    {"RowType": "Row", "Title": null, "Cells": [
                        {"Value": "Cash"}, {"Value": "$50,000"}, {"Value": "$40,000"}, {"Value": "$10,000"}
                    ], "Rows": null},
                    {"RowType": "SummaryRow", "Title": null, "Cells": [
                        {"Value": "Total Assets"}, {"Value": "$50,000"}, {"Value": "$40,000"}, {"Value": "$10,000"}
                    ], "Rows": null}
                ]},
                {"RowType": "SummaryRow", "Title": "Net Assets", "Cells": [
                    {"Value": "Net Assets"}, {"Value": "$200,000"}, {"Value": "$150,000"}, {"Value": "$50,000"}
                ], "Rows": null}
            ]
        }],
        "TotalRows": 3,
        "CurrentPage": page,
        "PageSize": page_size,
        "TotalPages": crate::pagination::total_pages(3, page_size),
    })
}
