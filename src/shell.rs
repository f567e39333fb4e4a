//! Presentation shell: owns the pagination state and the single page-result
//! cell, and decides which fetch completions get applied.
//!
//! Each dispatched fetch carries a [`FetchTicket`] (sequence number plus the
//! pagination snapshot it was issued for). Completions are applied only when
//! their ticket is the latest one dispatched; older ones are dropped, so a
//! slow response for page 2 can never overwrite page 3 after the user has
//! moved on.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use crate::client::{BalanceSheetSource, FetchError, Severity};
use crate::error::Result;
use crate::model::BalanceSheetPage;
use crate::pagination::{PageSize, Pagination, Summary};
use crate::render::{render_table, RenderedTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub table: RenderedTable,
    pub total_rows: u32,
    pub total_pages: u32,
    pub current_page: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Nothing fetched yet.
    Loading,
    Error { message: String, severity: Severity },
    Empty { message: String },
    Ready(Box<ReadyView>),
}

pub struct Shell {
    pagination: Pagination,
    phase: Phase,
    latest: u64,
    in_flight: bool,
    known_total_pages: Option<u32>,
}

impl Shell {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            pagination,
            phase: Phase::Loading,
            latest: 0,
            in_flight: false,
            known_total_pages: None,
        }
    }

    /// Initial fetch. The shell starts (and stays) in `Loading` until the
    /// first completion lands.
    pub fn mount(&mut self) -> FetchTicket {
        self.dispatch()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// A fetch is outstanding after the first page has been shown (or failed).
    /// Distinguishes "page loading" from the initial `Loading` phase.
    pub fn is_page_loading(&self) -> bool {
        self.in_flight && !matches!(self.phase, Phase::Loading)
    }

    pub fn summary(&self) -> Option<Summary> {
        match &self.phase {
            Phase::Ready(view) => Some(self.pagination.summary(view.total_rows)),
            _ => None,
        }
    }

    fn dispatch(&mut self) -> FetchTicket {
        self.latest += 1;
        self.in_flight = true;
        let ticket = FetchTicket {
            seq: self.latest,
            pagination: self.pagination,
        };
        tracing::debug!(
            seq = ticket.seq,
            page = self.pagination.page(),
            page_size = self.pagination.page_size().rows(),
            "dispatching fetch"
        );
        ticket
    }

    pub fn change_page(&mut self, page: u32) -> Result<FetchTicket> {
        self.pagination.set_page(page)?;
        Ok(self.dispatch())
    }

    pub fn change_page_size(&mut self, page_size: PageSize) -> FetchTicket {
        self.pagination.set_page_size(page_size);
        self.dispatch()
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let total = self.known_total_pages?;
        self.pagination.next_page(total).then(|| self.dispatch())
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        self.pagination.prev_page().then(|| self.dispatch())
    }

    pub fn first_page(&mut self) -> Option<FetchTicket> {
        self.pagination.first_page().then(|| self.dispatch())
    }

    pub fn last_page(&mut self) -> Option<FetchTicket> {
        let total = self.known_total_pages?;
        self.pagination.last_page(total).then(|| self.dispatch())
    }

    /// Apply a completion. Returns `false` when the ticket is stale and the
    /// outcome was discarded.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: std::result::Result<BalanceSheetPage, FetchError>,
    ) -> bool {
        if ticket.seq != self.latest {
            tracing::debug!(seq = ticket.seq, latest = self.latest, "discarding stale response");
            return false;
        }
        self.in_flight = false;
        self.phase = match outcome {
            Ok(page) => {
                self.known_total_pages = Some(page.total_pages);
                Phase::Ready(Box::new(ReadyView {
                    table: render_table(&page.table),
                    total_rows: page.total_rows,
                    total_pages: page.total_pages,
                    current_page: page.current_page,
                }))
            }
            Err(FetchError::Empty) => Phase::Empty {
                message: FetchError::Empty.to_string(),
            },
            Err(e) => Phase::Error {
                message: e.to_string(),
                severity: e.severity(),
            },
        };
        true
    }
}

/// A finished fetch, delivered back to the event loop.
pub struct Completion {
    pub ticket: FetchTicket,
    pub outcome: std::result::Result<BalanceSheetPage, FetchError>,
}

/// Runs each fetch on its own short-lived thread and funnels the results into
/// one channel. In-flight requests are never cancelled.
pub struct Fetcher {
    source: Arc<dyn BalanceSheetSource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn BalanceSheetSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { source, tx, rx }
    }

    pub fn spawn(&self, ticket: FetchTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let p = ticket.pagination;
            let outcome = source.fetch_page(p.page(), p.page_size().rows());
            // The receiver is gone only when the view has exited.
            let _ = tx.send(Completion { ticket, outcome });
        });
    }

    pub fn try_recv(&self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Fetch on the calling thread.
    pub fn fetch_now(&self, ticket: FetchTicket) -> Completion {
        let p = ticket.pagination;
        Completion {
            ticket,
            outcome: self.source.fetch_page(p.page(), p.page_size().rows()),
        }
    }
}
