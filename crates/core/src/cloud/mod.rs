//! Cloud storage abstraction.
//!
//! Provides a `CloudClient` trait over a session-authenticated JSON API
//! (user info, offline-download tasks, file listings, download submission)
//! and the PikPak implementation.

mod pikpak;
mod types;

pub use pikpak::PikPakClient;
pub use types::*;
