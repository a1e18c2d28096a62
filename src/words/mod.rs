//! Target-word sources.
//!
//! Local providers implement [`WordProvider`]. The remote random-word API is
//! async and lives in [`RandomWordClient`]; callers fetch from it once per
//! round and fall back to a local list when it fails.

mod client;
mod provider;
mod retry;

pub use client::{RandomWordClient, WordApiError, DEFAULT_WORD_API_URL};
pub use provider::{FixedWord, WordList, WordProvider, WordSourceError, DEFAULT_WORDS};
