//! Result ranking and pagination engine.
//!
//! Pure functions over an in-memory result set: stable sorting by a chosen
//! field/direction and fixed-size page slicing. The displayed set is always
//! a pure function of (raw results, sort state, page state) — nothing here
//! mutates, drops, or duplicates source entries.

mod session;

pub use session::{PageView, SearchSession, SessionEvent};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::searcher::TorrentResult;

/// Number of results per page.
pub const PAGE_SIZE: usize = 50;

/// Sortable fields of a torrent result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Size,
    Seeders,
    Peers,
    PublishDate,
    Category,
    Indexer,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Current sort selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Default ordering for fresh search results: seeders, descending.
    pub fn default_for_results() -> Self {
        Self {
            field: SortField::Seeders,
            direction: SortDirection::Descending,
        }
    }

    /// Apply a sort request: the same field flips direction, a new field
    /// resets to ascending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: match self.direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                },
            }
        } else {
            Self {
                field,
                direction: SortDirection::Ascending,
            }
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::default_for_results()
    }
}

/// Current page selection. Pages are 1-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageState {
    pub page: usize,
    pub page_size: usize,
}

impl PageState {
    pub fn first() -> Self {
        Self {
            page: 1,
            page_size: PAGE_SIZE,
        }
    }

    /// Total pages for a result count (at least 1, so page 1 is always valid).
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Clamp a requested page into `[1, total_pages]`.
    pub fn clamp(&self, page: usize, total: usize) -> usize {
        page.clamp(1, self.total_pages(total))
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::first()
    }
}

/// Compare two results on one field with native ordering: numeric for
/// numeric fields, case-insensitive lexicographic for strings, chronological
/// for dates (absent dates order first).
fn compare_field(a: &TorrentResult, b: &TorrentResult, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Size => a.size_bytes.cmp(&b.size_bytes),
        SortField::Seeders => a.seeders.cmp(&b.seeders),
        SortField::Peers => a.peers.cmp(&b.peers),
        SortField::PublishDate => a.publish_date.cmp(&b.publish_date),
        SortField::Category => option_str_key(&a.category).cmp(&option_str_key(&b.category)),
        SortField::Indexer => a.indexer.to_lowercase().cmp(&b.indexer.to_lowercase()),
    }
}

fn option_str_key(s: &Option<String>) -> Option<String> {
    s.as_ref().map(|s| s.to_lowercase())
}

/// Sort a result set by the given field and direction.
///
/// Returns a new ordered sequence; the sort is stable, so records with equal
/// keys retain their relative input order.
pub fn sort_results(
    results: &[TorrentResult],
    field: SortField,
    direction: SortDirection,
) -> Vec<TorrentResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare_field(a, b, field);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

/// Slice one page out of a result set: `[(page-1)*size, page*size)`.
///
/// Callers are expected to clamp the page via `PageState::clamp` first; an
/// out-of-range page yields an empty slice rather than panicking.
pub fn paginate<T>(results: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= results.len() {
        return &[];
    }
    let end = (start + page_size).min(results.len());
    &results[start..end]
}
