//! Row-tree flattening: turns a normalized report into display rows with
//! style, alignment and formatted values. Pure; no terminal types here.

use crate::fmt::format_cell;
use crate::model::{BodyRow, LeafRow, PageResult, Report, ReportTable, SectionHeading};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    SectionHeader,
    Summary,
    Detail,
    Spacer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

impl Align {
    /// Column 0 reads left to right, every other column is right-aligned.
    pub fn for_column(index: usize) -> Self {
        if index == 0 {
            Align::Left
        } else {
            Align::Right
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCell {
    pub value: String,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayContent {
    Cells(Vec<DisplayCell>),
    /// One cell spanning `span` columns (section titles and separators).
    FullWidth { text: String, span: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub key: String,
    pub style: RowStyle,
    pub content: DisplayContent,
}

impl DisplayRow {
    pub fn cell_count(&self) -> usize {
        match &self.content {
            DisplayContent::Cells(cells) => cells.len(),
            DisplayContent::FullWidth { .. } => 1,
        }
    }

    pub fn is_separator(&self) -> bool {
        self.style == RowStyle::Spacer
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub titles: Vec<String>,
    pub header: Vec<DisplayCell>,
    pub columns: usize,
    pub rows: Vec<DisplayRow>,
}

impl RenderedTable {
    pub fn heading(&self) -> &str {
        self.titles.first().map(String::as_str).unwrap_or("")
    }

    pub fn subtitles(&self) -> &[String] {
        self.titles.get(1..).unwrap_or_default()
    }
}

/// The report had no rows (or the page had no report) to draw a table from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoData;

impl std::fmt::Display for NoData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("No data available")
    }
}

impl std::error::Error for NoData {}

pub fn render_page(result: &PageResult) -> Result<RenderedTable, NoData> {
    render_report(result.reports.first().ok_or(NoData)?)
}

pub fn render_report(report: &Report) -> Result<RenderedTable, NoData> {
    ReportTable::from_report(report)
        .map(|table| render_table(&table))
        .ok_or(NoData)
}

/// Flatten a normalized report into display rows.
pub fn render_table(table: &ReportTable) -> RenderedTable {
    let columns = table.column_count();
    let mut out = Emitter {
        columns,
        rows: Vec::new(),
    };

    for (i, row) in table.body.iter().enumerate() {
        match row {
            BodyRow::Section { heading, children } => {
                match heading {
                    SectionHeading::Title(title) => out.full_width(format!("{i}-title"), title),
                    SectionHeading::Spacer => out.full_width(format!("{i}-heading"), ""),
                    SectionHeading::Bare => {}
                }
                for (j, child) in children.iter().enumerate() {
                    out.leaf(format!("{i}-{j}"), child);
                }
            }
            BodyRow::Leaf(leaf) => out.leaf(i.to_string(), leaf),
        }
    }

    RenderedTable {
        titles: table.titles.clone(),
        header: table
            .header
            .iter()
            .enumerate()
            .map(|(idx, label)| DisplayCell {
                value: label.clone(),
                align: Align::for_column(idx),
            })
            .collect(),
        columns,
        rows: out.rows,
    }
}

struct Emitter {
    columns: usize,
    rows: Vec<DisplayRow>,
}

impl Emitter {
    fn push(&mut self, row: DisplayRow) {
        let sep_key = format!("{}-sep", row.key);
        self.rows.push(row);
        self.rows.push(DisplayRow {
            key: sep_key,
            style: RowStyle::Spacer,
            content: DisplayContent::FullWidth {
                text: String::new(),
                span: self.columns,
            },
        });
    }

    fn full_width(&mut self, key: String, text: &str) {
        self.push(DisplayRow {
            key,
            style: RowStyle::SectionHeader,
            content: DisplayContent::FullWidth {
                text: text.to_string(),
                span: self.columns,
            },
        });
    }

    fn leaf(&mut self, key: String, leaf: &LeafRow) {
        // A row without cells is skipped along with its separator, even at
        // the top level where the web table still drew an empty spacer.
        let Some(cells) = &leaf.cells else {
            return;
        };
        let style = if leaf.is_summary() {
            RowStyle::Summary
        } else {
            RowStyle::Detail
        };
        let cells = cells
            .iter()
            .take(self.columns)
            .enumerate()
            .map(|(idx, raw)| DisplayCell {
                value: format_cell(raw),
                align: Align::for_column(idx),
            })
            .collect();
        self.push(DisplayRow {
            key,
            style,
            content: DisplayContent::Cells(cells),
        });
    }
}
