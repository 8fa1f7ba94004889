//! Token budget enforcement.

use serde::Serialize;

/// Per-source accounting, logged after each assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub source: &'static str,
    pub budget: usize,
    pub tokens: usize,
    pub items_included: usize,
    pub items_total: usize,
}

/// Items kept in rank order and the tokens they consume.
#[derive(Debug)]
pub struct Selection<T> {
    pub items: Vec<T>,
    pub tokens: usize,
    pub stats: SourceStats,
}

/// Accumulate items in order while the running total stays within `budget`.
/// Stops at the first item that would exceed it, so a lower-ranked item
/// never displaces a higher-ranked one.
pub fn take_within_budget<T>(
    source: &'static str,
    items: Vec<T>,
    budget: usize,
    cost: impl Fn(&T) -> usize,
) -> Selection<T> {
    let items_total = items.len();
    let mut kept = Vec::new();
    let mut used = 0usize;

    for item in items {
        let tokens = cost(&item);
        if used + tokens > budget {
            break;
        }
        used += tokens;
        kept.push(item);
    }

    Selection {
        stats: SourceStats {
            source,
            budget,
            tokens: used,
            items_included: kept.len(),
            items_total,
        },
        items: kept,
        tokens: used,
    }
}
