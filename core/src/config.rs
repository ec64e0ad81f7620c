//! Engine configuration and screening-list data files.
//!
//! Tunables live in `EngineConfig` with defaults matching the program's
//! published thresholds. The sanctions watchlist and PEP registry are plain
//! JSON data files loaded at startup and seeded into the store, so the lists
//! can be refreshed without a rebuild.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{
    error::ComplianceResult,
    screening::MatchThresholds,
    store::{PepEntryRow, WatchlistEntryRow},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Raise TTRs automatically when a transaction trips the threshold.
    pub auto_raise_ttr: bool,
    /// A customer counts as a repeat transactor when they transacted within
    /// this many days before the current transaction.
    pub repeat_window_days: i64,
    pub screening: MatchThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_raise_ttr: true,
            repeat_window_days: 30,
            screening: MatchThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> ComplianceResult<Self> {
        let raw = fs::read_to_string(path).map_err(anyhow::Error::from)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

// ── Screening list files ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct WatchlistFile {
    entries: Vec<WatchlistEntryRow>,
}

#[derive(Debug, Clone, Deserialize)]
struct PepRegistryFile {
    entries: Vec<PepEntryRow>,
}

pub fn load_watchlist(path: &Path) -> ComplianceResult<Vec<WatchlistEntryRow>> {
    let raw = fs::read_to_string(path).map_err(anyhow::Error::from)?;
    let file: WatchlistFile = serde_json::from_str(&raw)?;
    Ok(file.entries)
}

pub fn load_pep_registry(path: &Path) -> ComplianceResult<Vec<PepEntryRow>> {
    let raw = fs::read_to_string(path).map_err(anyhow::Error::from)?;
    let file: PepRegistryFile = serde_json::from_str(&raw)?;
    Ok(file.entries)
}
