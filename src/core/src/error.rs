//! Error taxonomy for the match engine and league ingest path.
//!
//! Mirrors the five-row table in spec §7: configuration validation,
//! contract/ID violations, adapter shape violations, and season-ingest
//! errors are all returned as `EngineError`. `ResolutionWarning`s (the
//! fifth row) are never returned as errors — the possession loop must
//! always terminate — they are instead collected into
//! `PossessionContext::errors` (see `possession::mod`).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Configuration problems: missing derived-ability keys, unknown
    /// tactic keys, multipliers outside the configured bounds. Only
    /// raised in strict mode; permissive mode clamps and warns instead.
    #[error("validation error: {0}")]
    Validation(String),

    /// ID-contract violations: duplicate pid within a team, pid shared
    /// across teams, non-canonical team_id, home == away. Always fatal.
    #[error("contract error: {0}")]
    Contract(String),

    /// Raw-to-v2 adapter shape violations: missing required keys,
    /// unexpected side keys, a player-keyed map referencing an unknown
    /// pid. Never silently rewritten.
    #[error("raw matchengine result invalid: {0}")]
    Adapter(String),

    /// Season-ingest problems other than a clean rollover (which is not
    /// an error — see `league::rollover`).
    #[error("ingest error: {0}")]
    Ingest(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
