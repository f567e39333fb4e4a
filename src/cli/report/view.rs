use std::sync::Arc;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crossterm::event::KeyCode;

use crate::client::BalanceSheetSource;
use crate::error::Result;
use crate::pagination::Pagination;
use crate::render::{Align, DisplayCell, DisplayContent, RenderedTable, RowStyle};
use crate::shell::{FetchTicket, Fetcher, Phase, Shell};
use crate::tui::{
    run_view, severity_style, wrap_text, View, ViewAction, COLUMN_HEADER_STYLE, FOOTER_STYLE,
    HEADER_STYLE, LOADING_STYLE, SECTION_STYLE, SUMMARY_STYLE,
};

/// Open the interactive balance-sheet view and block until the user quits.
pub fn run(source: Arc<dyn BalanceSheetSource>, pagination: Pagination) -> Result<()> {
    let mut view = BalanceSheetView::new(source, pagination);
    run_view(&mut view)
}

pub(crate) struct BalanceSheetView {
    shell: Shell,
    fetcher: Fetcher,
    offset: usize,
    visible_count: usize,
}

impl BalanceSheetView {
    pub(crate) fn new(source: Arc<dyn BalanceSheetSource>, pagination: Pagination) -> Self {
        let mut shell = Shell::new(pagination);
        let fetcher = Fetcher::new(source);
        fetcher.spawn(shell.mount());
        Self {
            shell,
            fetcher,
            offset: 0,
            visible_count: 20,
        }
    }

    fn dispatch(&mut self, ticket: Option<FetchTicket>) {
        if let Some(ticket) = ticket {
            self.fetcher.spawn(ticket);
        }
    }

    fn row_count(&self) -> usize {
        match self.shell.phase() {
            Phase::Ready(view) => body_rows(&view.table).len(),
            _ => 0,
        }
    }

    fn draw_body(&mut self, frame: &mut Frame, area: Rect) {
        match self.shell.phase() {
            Phase::Loading => {
                frame.render_widget(
                    Paragraph::new("Loading balance sheet\u{2026}")
                        .style(LOADING_STYLE)
                        .alignment(Alignment::Center),
                    area,
                );
            }
            Phase::Error { message, severity } => {
                let (wrapped, _) = wrap_text(message, area.width.saturating_sub(2) as usize);
                frame.render_widget(
                    Paragraph::new(wrapped)
                        .style(severity_style(*severity))
                        .alignment(Alignment::Center),
                    area,
                );
            }
            Phase::Empty { message } => {
                frame.render_widget(
                    Paragraph::new(message.as_str())
                        .style(FOOTER_STYLE)
                        .alignment(Alignment::Center),
                    area,
                );
            }
            Phase::Ready(view) => {
                let table = &view.table;
                // Column header plus its bottom margin
                let visible = area.height.saturating_sub(2) as usize;
                self.visible_count = visible.max(1);

                let rows: Vec<Row> = body_rows(table)
                    .into_iter()
                    .skip(self.offset)
                    .take(visible)
                    .collect();
                let header = Row::new(
                    table
                        .header
                        .iter()
                        .map(|c| Cell::from(aligned(c)))
                        .collect::<Vec<_>>(),
                )
                .style(COLUMN_HEADER_STYLE)
                .bottom_margin(1);
                let widths = column_widths(table.columns);
                frame.render_widget(
                    Table::new(rows, widths).header(header).column_spacing(2),
                    area,
                );
            }
        }
    }

    fn footer_text(&self) -> String {
        let p = self.shell.pagination();
        let summary = self
            .shell
            .summary()
            .map(|s| format!("{s}  "))
            .unwrap_or_default();
        let pages = match self.shell.phase() {
            Phase::Ready(view) => format!("page {} / {}  ", p.page(), view.total_pages),
            _ => String::new(),
        };
        format!(
            " {summary}{pages}rows/page {}  \u{2190}/\u{2192}=page  Home/End=first/last  +/-/s=rows  \u{2191}/\u{2193}=scroll  q/Esc=quit",
            p.page_size()
        )
    }
}

impl View for BalanceSheetView {
    fn tick(&mut self) {
        while let Some(done) = self.fetcher.try_recv() {
            if self.shell.complete(done.ticket, done.outcome) {
                self.offset = 0;
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let (heading, subtitles) = match self.shell.phase() {
            Phase::Ready(view) => (
                view.table.heading().to_string(),
                view.table.subtitles().to_vec(),
            ),
            _ => ("Balance Sheet".to_string(), Vec::new()),
        };

        let [title_area, subtitle_area, sep_area, content_area, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(subtitles.len() as u16),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .areas(area);

        let mut title = vec![Span::styled(format!(" {heading}"), HEADER_STYLE)];
        if self.shell.is_page_loading() {
            title.push(Span::styled("  loading\u{2026}", LOADING_STYLE));
        }
        frame.render_widget(Paragraph::new(Line::from(title)), title_area);

        let subtitle_lines: Vec<Line> = subtitles
            .iter()
            .map(|s| Line::styled(format!(" {s}"), FOOTER_STYLE))
            .collect();
        frame.render_widget(Paragraph::new(subtitle_lines), subtitle_area);

        frame.render_widget(
            Paragraph::new("━".repeat(area.width as usize)).style(FOOTER_STYLE),
            sep_area,
        );

        self.draw_body(frame, content_area);

        frame.render_widget(
            Paragraph::new(self.footer_text()).style(FOOTER_STYLE),
            footer_area,
        );
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        let page = self.visible_count;
        let max = self.row_count().saturating_sub(page);
        let size = self.shell.pagination().page_size();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Close,
            KeyCode::Left | KeyCode::Char('h') => {
                let ticket = self.shell.prev_page();
                self.dispatch(ticket);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let ticket = self.shell.next_page();
                self.dispatch(ticket);
            }
            KeyCode::Home => {
                let ticket = self.shell.first_page();
                self.dispatch(ticket);
            }
            KeyCode::End => {
                let ticket = self.shell.last_page();
                self.dispatch(ticket);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let ticket = size.larger().map(|s| self.shell.change_page_size(s));
                self.dispatch(ticket);
            }
            KeyCode::Char('-') => {
                let ticket = size.smaller().map(|s| self.shell.change_page_size(s));
                self.dispatch(ticket);
            }
            KeyCode::Char('s') => {
                let ticket = self.shell.change_page_size(size.cycled());
                self.dispatch(Some(ticket));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.offset = self.offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.offset = (self.offset + 1).min(max);
            }
            KeyCode::PageUp => {
                self.offset = self.offset.saturating_sub(page);
            }
            KeyCode::PageDown => {
                self.offset = (self.offset + page).min(max);
            }
            _ => {}
        }
        ViewAction::Continue
    }
}

// ---------------------------------------------------------------------------
// Display rows → ratatui rows
// ---------------------------------------------------------------------------

fn aligned(cell: &DisplayCell) -> Line<'static> {
    let line = Line::from(cell.value.clone());
    match cell.align {
        Align::Left => line.left_aligned(),
        Align::Right => line.right_aligned(),
    }
}

/// First column takes the slack; numeric columns get a fixed width.
fn column_widths(columns: usize) -> Vec<Constraint> {
    let mut widths = vec![Constraint::Fill(1)];
    widths.extend(std::iter::repeat(Constraint::Length(16)).take(columns.saturating_sub(1)));
    widths
}

/// Body rows for the table widget. Separators are dropped; full-width rows
/// put their text in the first column.
pub(crate) fn body_rows(table: &RenderedTable) -> Vec<Row<'static>> {
    table
        .rows
        .iter()
        .filter(|r| !r.is_separator())
        .map(|r| {
            let style = match r.style {
                RowStyle::SectionHeader => SECTION_STYLE,
                RowStyle::Summary => SUMMARY_STYLE,
                RowStyle::Detail | RowStyle::Spacer => Default::default(),
            };
            let cells: Vec<Cell> = match &r.content {
                DisplayContent::Cells(cells) => {
                    cells.iter().map(|c| Cell::from(aligned(c))).collect()
                }
                DisplayContent::FullWidth { text, span } => {
                    let mut cells = vec![Cell::from(text.clone())];
                    cells.extend((1..*span).map(|_| Cell::from("")));
                    cells
                }
            };
            Row::new(cells).style(style)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::client::ApiClient;
    use crate::pagination::PageSize;
    use crate::testing::{sample_page_json, spawn_router, unused_base_url};

    fn sample_server() -> String {
        use axum::extract::Query;
        use axum::routing::get;
        use std::collections::HashMap;

        let router = axum::Router::new().route(
            "/api/balance-sheet",
            get(|Query(q): Query<HashMap<String, u32>>| async move {
                axum::Json(sample_page_json(
                    q.get("page").copied().unwrap_or(1),
                    q.get("page_size").copied().unwrap_or(10),
                ))
            }),
        );
        spawn_router(router)
    }

    fn view_for(base: String) -> BalanceSheetView {
        let client = ApiClient::new(base).unwrap();
        BalanceSheetView::new(Arc::new(client), Pagination::default())
    }

    fn settle(view: &mut BalanceSheetView) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            view.tick();
            if !matches!(view.shell.phase(), Phase::Loading) && !view.shell.is_page_loading() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("fetch did not complete");
    }

    fn screen(view: &mut BalanceSheetView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 20)).unwrap();
        terminal.draw(|f| view.draw(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_ready_view_draws_table_and_footer() {
        let mut view = view_for(sample_server());
        settle(&mut view);
        let text = screen(&mut view);
        assert!(text.contains("Balance Sheet"));
        assert!(text.contains("Demo Company"));
        assert!(text.contains("Assets"));
        assert!(text.contains("50,000.00"));
        assert!(text.contains("Showing 1 to 3 of 3 entries"));
        assert!(text.contains("page 1 / 1"));
        assert!(text.contains("rows/page 10"));
    }

    #[test]
    fn test_page_size_keys_refetch() {
        let mut view = view_for(sample_server());
        settle(&mut view);
        view.handle_key(KeyCode::Char('+'));
        assert_eq!(view.shell.pagination().page_size(), PageSize::TwentyFive);
        settle(&mut view);
        assert!(screen(&mut view).contains("rows/page 25"));

        view.handle_key(KeyCode::Char('s'));
        assert_eq!(view.shell.pagination().page_size(), PageSize::Fifty);
        view.handle_key(KeyCode::Char('-'));
        assert_eq!(view.shell.pagination().page_size(), PageSize::TwentyFive);
    }

    #[test]
    fn test_next_page_is_bounded() {
        let mut view = view_for(sample_server());
        settle(&mut view);
        view.handle_key(KeyCode::Right);
        assert_eq!(view.shell.pagination().page(), 1);
        assert!(!view.shell.is_page_loading());
    }

    #[test]
    fn test_error_is_shown_inline() {
        let mut view = view_for(unused_base_url());
        settle(&mut view);
        let text = screen(&mut view);
        assert!(text.contains("Failed to fetch balance sheet"));
        assert!(!text.contains("retry"));
    }

    #[test]
    fn test_error_waits_for_a_pagination_change() {
        let mut view = view_for(unused_base_url());
        settle(&mut view);
        assert!(matches!(view.shell.phase(), Phase::Error { .. }));

        view.handle_key(KeyCode::Char('r'));
        assert_eq!(view.shell.pagination(), Pagination::default());
        assert!(!view.shell.is_page_loading());

        view.handle_key(KeyCode::Char('s'));
        assert!(view.shell.is_page_loading());
    }

    #[test]
    fn test_quit_keys() {
        let mut view = view_for(unused_base_url());
        assert!(matches!(view.handle_key(KeyCode::Char('q')), ViewAction::Close));
        assert!(matches!(view.handle_key(KeyCode::Esc), ViewAction::Close));
        assert!(matches!(view.handle_key(KeyCode::Up), ViewAction::Continue));
    }

    #[test]
    fn test_body_rows_skip_separators() {
        let page: crate::model::PageResult =
            serde_json::from_value(sample_page_json(1, 10)).unwrap();
        let table = crate::render::render_page(&page).unwrap();
        // Assets title, Cash, Total Assets, Net Assets
        assert_eq!(body_rows(&table).len(), 4);
        assert_eq!(column_widths(4).len(), 4);
    }
}
