//! Search session state: one explicit struct updated through a single
//! reducer function, instead of ambient shared variables.

use serde::Serialize;
use tracing::debug;

use crate::searcher::TorrentResult;

use super::{paginate, sort_results, PageState, SortField, SortState};

/// Events fed into the session reducer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A search response arrived. `seq` is the sequence number allocated by
    /// `begin_search` for the request that produced it.
    ResultsLoaded {
        seq: u64,
        query: String,
        results: Vec<TorrentResult>,
    },
    /// The user requested a sort on a field (toggle contract).
    SortRequested { field: SortField },
    /// The user navigated to a page (clamped into range).
    PageChanged { page: usize },
}

/// One page of the current view, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub query: String,
    pub results: Vec<TorrentResult>,
    pub sort: SortState,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// The search session: last-fetched raw set plus sort and page state.
///
/// Responses are tagged with a monotonic sequence number; a response whose
/// sequence is older than the newest applied one is discarded, so a slow
/// early request can never overwrite the results of a later one.
#[derive(Debug, Default)]
pub struct SearchSession {
    query: String,
    results: Vec<TorrentResult>,
    sort: SortState,
    page: PageState,
    next_seq: u64,
    applied_seq: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a sequence number for a search that is about to start.
    pub fn begin_search(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Apply one event to the session.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ResultsLoaded {
                seq,
                query,
                results,
            } => {
                if seq <= self.applied_seq {
                    debug!(
                        seq,
                        applied = self.applied_seq,
                        "Discarding stale search response"
                    );
                    return;
                }
                self.applied_seq = seq;
                self.query = query;
                // Default ordering is computed once at fetch time, before
                // any user interaction.
                self.sort = SortState::default_for_results();
                self.results = sort_results(&results, self.sort.field, self.sort.direction);
                self.page = PageState::first();
            }
            SessionEvent::SortRequested { field } => {
                self.sort = self.sort.toggle(field);
                self.results = sort_results(&self.results, self.sort.field, self.sort.direction);
                self.page.page = 1;
            }
            SessionEvent::PageChanged { page } => {
                self.page.page = self.page.clamp(page, self.results.len());
            }
        }
    }

    /// The current page of the view.
    pub fn page_view(&self) -> PageView {
        let slice = paginate(&self.results, self.page.page, self.page.page_size);
        PageView {
            query: self.query.clone(),
            results: slice.to_vec(),
            sort: self.sort,
            page: self.page.page,
            total_pages: self.page.total_pages(self.results.len()),
            total: self.results.len(),
        }
    }

    /// The full current result set, in display order.
    pub fn all_results(&self) -> &[TorrentResult] {
        &self.results
    }
}
