//! Sanctions and PEP screening.
//!
//! Screens a customer name against the sanctions watchlist and the PEP
//! registry held in the store. Matching is a deterministic token-overlap
//! heuristic: exact names score 1.0, shared or prefix-matching tokens score
//! by overlap ratio. Screening never fails a transaction by itself; the
//! engine decides what a hit means.

use serde::{Deserialize, Serialize};

use crate::store::{PepEntryRow, WatchlistEntryRow};

// ── Constants ────────────────────────────────────────────────────────────────

pub const SANCTIONS_EXACT_MATCH_THRESHOLD: f64 = 0.95;
pub const SANCTIONS_FUZZY_MATCH_THRESHOLD: f64 = 0.80;
pub const PEP_NAME_MATCH_THRESHOLD: f64 = 0.85;

// ── Outcomes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningList {
    Sanctions,
    Pep,
}

impl ScreeningList {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreeningList::Sanctions => "sanctions",
            ScreeningList::Pep => "pep",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningHit {
    pub list: ScreeningList,
    /// Watchlist entry or PEP registry id that matched.
    pub list_ref: String,
    pub matched_name: String,
    pub score: f64,
    pub exact: bool,
}

/// Per-engine screening thresholds, overridable through config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchThresholds {
    pub sanctions_exact: f64,
    pub sanctions_fuzzy: f64,
    pub pep: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            sanctions_exact: SANCTIONS_EXACT_MATCH_THRESHOLD,
            sanctions_fuzzy: SANCTIONS_FUZZY_MATCH_THRESHOLD,
            pep: PEP_NAME_MATCH_THRESHOLD,
        }
    }
}

// ── Screening ────────────────────────────────────────────────────────────────

/// Screen a name against both lists. At most one hit per list is returned:
/// the best-scoring entry, if it reaches the list's threshold. Scanning the
/// whole list before thresholding matters — a fuzzy variant must never
/// shadow an exact match further down the list.
pub fn screen_name(
    candidate: &str,
    watchlist: &[WatchlistEntryRow],
    pep_registry: &[PepEntryRow],
    thresholds: &MatchThresholds,
) -> Vec<ScreeningHit> {
    let mut hits = Vec::new();

    let mut best_wl: Option<(&WatchlistEntryRow, f64)> = None;
    for entry in watchlist {
        let score = name_match_score(candidate, &entry.full_name);
        if best_wl.map(|(_, s)| score > s).unwrap_or(true) {
            best_wl = Some((entry, score));
        }
    }
    if let Some((entry, score)) = best_wl {
        if score >= thresholds.sanctions_fuzzy {
            hits.push(ScreeningHit {
                list: ScreeningList::Sanctions,
                list_ref: entry.entry_id.clone(),
                matched_name: entry.full_name.clone(),
                score,
                exact: score >= thresholds.sanctions_exact,
            });
        }
    }

    let mut best_pep: Option<(&PepEntryRow, f64)> = None;
    for pep in pep_registry {
        let score = name_match_score(candidate, &pep.full_name);
        if best_pep.map(|(_, s)| score > s).unwrap_or(true) {
            best_pep = Some((pep, score));
        }
    }
    if let Some((pep, score)) = best_pep {
        if score >= thresholds.pep {
            hits.push(ScreeningHit {
                list: ScreeningList::Pep,
                list_ref: pep.pep_id.clone(),
                matched_name: pep.full_name.clone(),
                score,
                exact: score >= 1.0,
            });
        }
    }

    hits
}

/// Token-overlap name similarity in [0, 1].
///
/// Case-insensitive. An exact match scores 1.0; otherwise tokens count as
/// matching when equal or when one is a prefix of the other (covers initials
/// and truncated transliterations), scored by overlap over the longer name.
pub fn name_match_score(name1: &str, name2: &str) -> f64 {
    let n1 = name1.to_lowercase();
    let n2 = name2.to_lowercase();

    if n1 == n2 {
        return 1.0;
    }

    let words1: Vec<&str> = n1.split_whitespace().collect();
    let words2: Vec<&str> = n2.split_whitespace().collect();

    if words1.is_empty() || words2.is_empty() {
        return 0.0;
    }

    let mut matching_words = 0;
    for w1 in &words1 {
        for w2 in &words2 {
            if w1 == w2 || w1.starts_with(w2) || w2.starts_with(w1) {
                matching_words += 1;
                break;
            }
        }
    }

    matching_words as f64 / words1.len().max(words2.len()) as f64
}
