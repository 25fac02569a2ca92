//! Typosquatting Detector
//!
//! Compares a hostname against every legitimate reference domain using
//! Levenshtein distance. A hostname one or two edits away from a trusted
//! site is reported as an imitation of it. Every registry entry is checked,
//! so a hostname can imitate several sites at once.

use crate::core::store::LegitimateSiteRegistry;
use crate::models::types::{Severity, ThreatFinding, ThreatType};
use crate::utils::constants::{
    TYPOSQUAT_MAX_DISTANCE, TYPOSQUAT_MAX_LENGTH_DIFF, TYPOSQUAT_MIN_DISTANCE,
};

/// Edit distance with unit cost for insert, delete and substitute.
///
/// Operates on Unicode scalar values and keeps a single row of the DP table.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}

/// Whether `candidate` looks like a near-miss spelling of `legit`
pub fn is_similar(candidate: &str, legit: &str) -> bool {
    let len_a = candidate.chars().count();
    let len_b = legit.chars().count();
    if len_a.abs_diff(len_b) > TYPOSQUAT_MAX_LENGTH_DIFF {
        return false;
    }

    let distance = levenshtein(candidate, legit);
    (TYPOSQUAT_MIN_DISTANCE..=TYPOSQUAT_MAX_DISTANCE).contains(&distance)
}

/// One TYPOSQUATTING / HIGH finding per imitated registry entry
pub fn check_typosquatting(hostname: &str, registry: &LegitimateSiteRegistry) -> Vec<ThreatFinding> {
    registry
        .iter()
        .filter(|legit| *legit != hostname && is_similar(hostname, legit))
        .map(|legit| {
            ThreatFinding::new(
                ThreatType::Typosquatting,
                Severity::High,
                format!("Possible imitation of {}", legit),
                format!(
                    "{} is very similar to the legitimate site {}. It may be a trap.",
                    hostname, legit
                ),
            )
        })
        .collect()
}
