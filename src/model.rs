//! Balance-sheet data contract.
//!
//! The wire types mirror the accounting API's PascalCase JSON and are shared
//! by the client, the backend and the mock upstream. [`ReportTable`] is the
//! normalized form the renderer works from: optional wire fields are resolved
//! once, right after a fetch, into [`BodyRow`] variants.

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "Value", default, deserialize_with = "null_as_empty")]
    pub value: String,
}

impl Cell {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

/// Row type tag. The set is open: anything unrecognised is kept verbatim in
/// `Other` and rendered like a plain row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RowType {
    Header,
    Section,
    Row,
    SummaryRow,
    Other(String),
}

impl From<String> for RowType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Header" => RowType::Header,
            "Section" => RowType::Section,
            "Row" => RowType::Row,
            "SummaryRow" => RowType::SummaryRow,
            _ => RowType::Other(s),
        }
    }
}

impl From<RowType> for String {
    fn from(t: RowType) -> Self {
        match t {
            RowType::Header => "Header".into(),
            RowType::Section => "Section".into(),
            RowType::Row => "Row".into(),
            RowType::SummaryRow => "SummaryRow".into(),
            RowType::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    pub row_type: RowType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cells: Option<Vec<Cell>>,
    #[serde(default)]
    pub rows: Option<Vec<Row>>,
}

impl Row {
    pub fn cell_values(&self) -> Option<Vec<String>> {
        self.cells
            .as_ref()
            .map(|cells| cells.iter().map(|c| c.value.clone()).collect())
    }

    fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    #[serde(rename = "ReportID", default)]
    pub report_id: String,
    #[serde(default)]
    pub report_name: String,
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub report_titles: Vec<String>,
    #[serde(default)]
    pub report_date: String,
    #[serde(rename = "UpdatedDateUTC", default)]
    pub updated_date_utc: String,
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// One page of the balance sheet as served by `/api/balance-sheet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageResult {
    pub reports: Vec<Report>,
    #[serde(default)]
    pub total_rows: u32,
    #[serde(default = "default_current_page")]
    pub current_page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
}

fn default_current_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

fn default_total_pages() -> u32 {
    1
}

/// Upstream accounting API response: reports only, no pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsEnvelope {
    #[serde(rename = "Reports")]
    pub reports: Vec<Report>,
}

/// Structured error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Normalized row tree
// ---------------------------------------------------------------------------

/// A body row with its optional fields resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyRow {
    Leaf(LeafRow),
    Section {
        heading: SectionHeading,
        children: Vec<LeafRow>,
    },
}

/// A row rendered as data cells. `cells` is `None` when the wire row had none.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafRow {
    pub row_type: RowType,
    pub cells: Option<Vec<String>>,
}

impl LeafRow {
    pub fn is_summary(&self) -> bool {
        self.row_type == RowType::SummaryRow
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionHeading {
    /// Labelled section: a full-width title row.
    Title(String),
    /// No title and no cells: an empty full-width heading row.
    Spacer,
    /// No title but cells present: no heading row at all.
    Bare,
}

impl From<&Row> for LeafRow {
    fn from(row: &Row) -> Self {
        Self {
            row_type: row.row_type.clone(),
            cells: row.cell_values(),
        }
    }
}

impl From<&Row> for BodyRow {
    fn from(row: &Row) -> Self {
        if row.row_type != RowType::Section {
            return BodyRow::Leaf(LeafRow::from(row));
        }
        let heading = match (&row.title, &row.cells) {
            (Some(title), _) if row.has_title() => SectionHeading::Title(title.clone()),
            (_, None) => SectionHeading::Spacer,
            (_, Some(_)) => SectionHeading::Bare,
        };
        let children = row
            .rows
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(LeafRow::from)
            .collect();
        BodyRow::Section { heading, children }
    }
}

/// A report ready for rendering: titles, header labels and normalized body.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub titles: Vec<String>,
    pub header: Vec<String>,
    pub body: Vec<BodyRow>,
}

impl ReportTable {
    /// Normalize a wire report. Returns `None` when it has no rows at all.
    pub fn from_report(report: &Report) -> Option<Self> {
        let (header_row, body) = report.rows.split_first()?;
        let titles = if report.report_titles.is_empty() && !report.report_name.is_empty() {
            vec![report.report_name.clone()]
        } else {
            report.report_titles.clone()
        };
        Some(Self {
            titles,
            header: header_row.cell_values().unwrap_or_default(),
            body: body.iter().map(BodyRow::from).collect(),
        })
    }

    pub fn heading(&self) -> &str {
        self.titles.first().map(String::as_str).unwrap_or("")
    }

    pub fn subtitles(&self) -> &[String] {
        self.titles.get(1..).unwrap_or_default()
    }

    /// Number of columns the table is laid out with. A header without cells
    /// still yields one column so full-width rows have something to span.
    pub fn column_count(&self) -> usize {
        self.header.len().max(1)
    }
}

/// A fetched page with its first report normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSheetPage {
    pub table: ReportTable,
    pub total_rows: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl BalanceSheetPage {
    /// Returns `None` when there is no report or the first report has no rows.
    pub fn from_result(result: &PageResult) -> Option<Self> {
        let report = result.reports.first()?;
        Some(Self {
            table: ReportTable::from_report(report)?,
            total_rows: result.total_rows,
            current_page: result.current_page,
            page_size: result.page_size,
            total_pages: result.total_pages,
        })
    }
}
