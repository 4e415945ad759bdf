//! Transcription session tracking
//!
//! A session accumulates the text of every accepted audio chunk for one
//! client stream. Chunks carry a caller-assigned index; only indices strictly
//! greater than the last accepted one mutate the session, so duplicates and
//! late arrivals are dropped.
//!
//! Sessions live for the lifetime of the process (no eviction).

mod session;
mod store;

pub use session::{ChunkOutcome, Session};
pub use store::SessionStore;
