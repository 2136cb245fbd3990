//! Query Engine
//!
//! Evaluates multi-criteria queries over a loaded event set. A file
//! must match every requested category (set intersection), while every
//! event returned only has to match some requested category. That
//! asymmetry is intentional: file-level AND across criteria,
//! event-level OR within a qualifying file.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::events::{DetectionEvent, EventKind, EventSet};
use crate::{CoreError, CoreResult};

// =============================================================================
// Criterion
// =============================================================================

/// One search criterion: a category plus a needle matched
/// case-insensitively as a substring of the event label
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    kind: EventKind,
    needle: String,
}

impl Criterion {
    /// Creates a criterion; the needle is trimmed and lower-cased once
    /// here so matching stays cheap
    pub fn new(kind: EventKind, needle: &str) -> Self {
        Self {
            kind,
            needle: needle.trim().to_lowercase(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Case-insensitive substring containment against the trimmed label
    pub fn matches(&self, event: &DetectionEvent) -> bool {
        event.kind == self.kind && event.label.trim().to_lowercase().contains(&self.needle)
    }
}

// =============================================================================
// Query
// =============================================================================

/// Runs a multi-criteria query over the event set.
///
/// Returns the events whose file matches every criterion and which
/// themselves match at least one criterion, preserving input order.
/// The input set is never mutated. An empty criteria list is a caller
/// error; an empty result is a normal outcome.
pub fn query(events: &EventSet, criteria: &[Criterion]) -> CoreResult<EventSet> {
    if criteria.is_empty() {
        return Err(CoreError::EmptyQuery);
    }

    // Per-criterion sets of matching file names, dropping empty sets.
    let mut file_sets: Vec<HashSet<&str>> = Vec::new();
    for criterion in criteria {
        let matched: HashSet<&str> = events
            .iter()
            .filter(|event| criterion.matches(event))
            .map(|event| event.file_name.as_str())
            .collect();
        if !matched.is_empty() {
            file_sets.push(matched);
        }
    }

    // Any criterion without matches empties the intersection.
    if file_sets.len() != criteria.len() {
        return Ok(EventSet::default());
    }

    let mut valid_files = file_sets[0].clone();
    for file_set in &file_sets[1..] {
        valid_files.retain(|file| file_set.contains(file));
    }

    Ok(events
        .iter()
        .filter(|event| {
            valid_files.contains(event.file_name.as_str())
                && criteria.iter().any(|criterion| criterion.matches(event))
        })
        .cloned()
        .collect())
}
