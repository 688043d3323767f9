//! Torrent search abstraction.
//!
//! Provides a `Searcher` trait for querying torrent-indexer aggregation
//! backends (Jackett) and the `TorrentResult` wire-independent record type.

mod jackett;
mod types;

pub use jackett::JackettSearcher;
pub use types::*;
