//! Error types for replay setup
//!
//! The per-event path never fails (malformed events degrade to
//! bookkeeping-only); errors here cover fight setup and version
//! selection, surfaced by callers such as the cli.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("unknown game version: {0:?} (expected \"classic\" or \"tbc\")")]
    UnknownGameVersion(String),

    #[error("fight has no events")]
    EmptyFight,
}
