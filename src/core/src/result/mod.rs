//! Game-result shapes and the raw-to-external transformation (spec §4.6):
//! [`raw`] is the engine's internal, team-id-keyed output;
//! [`v2`]/[`adapter`] produce the external [`v2::GameResultV2`] contract
//! callers actually persist.

pub mod adapter;
pub mod raw;
pub mod v2;
