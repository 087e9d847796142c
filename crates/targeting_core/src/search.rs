//! Quick search: merging local navigation with backend hits, and
//! discarding responses that arrive after a newer request was issued.
//!
//! The async driver lives in the adapter layer; everything here is pure so
//! the ordering rules can be tested without a runtime.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Maximum results shown when backend hits are merged in.
pub const MERGED_CAP: usize = 12;

/// Maximum results shown when only local pages are available.
pub const FALLBACK_CAP: usize = 8;

/// What a search hit points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    /// A dashboard screen
    Page,
    /// A target record
    Target,
    /// An ORBAT unit
    Unit,
    /// A BDA report
    Report,
}

impl SearchKind {
    /// Short tag shown next to the hit.
    pub fn tag(&self) -> &'static str {
        match self {
            SearchKind::Page => "PAGE",
            SearchKind::Target => "TGT",
            SearchKind::Unit => "UNIT",
            SearchKind::Report => "BDA",
        }
    }
}

/// One search result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Display title
    pub title: String,
    /// Navigation key, unique per destination
    pub path: String,
    /// Destination type
    pub kind: SearchKind,
    /// Secondary text
    pub subtitle: Option<String>,
}

impl SearchHit {
    /// Create a page hit.
    pub fn page(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            kind: SearchKind::Page,
            subtitle: None,
        }
    }
}

/// A navigable page known to the client without asking the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalPage {
    /// Display title
    pub title: &'static str,
    /// Navigation key
    pub path: &'static str,
    /// Extra words that should match this page
    pub keywords: &'static [&'static str],
}

impl LocalPage {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.path.contains(needle)
            || self.keywords.iter().any(|k| k.contains(needle))
    }

    fn to_hit(self) -> SearchHit {
        SearchHit::page(self.title, self.path)
    }
}

/// Pages of the dashboard, in the order they are suggested.
pub const LOCAL_PAGES: &[LocalPage] = &[
    LocalPage { title: "Decision Gates", path: "/gates", keywords: &["roe", "cde", "weather", "deconfliction", "status"] },
    LocalPage { title: "Target List", path: "/targets", keywords: &["nomination", "jtb", "f3ead", "kill chain"] },
    LocalPage { title: "Order of Battle", path: "/orbat", keywords: &["orbat", "units", "blue", "red", "hierarchy"] },
    LocalPage { title: "BDA Review", path: "/bda", keywords: &["damage", "assessment", "report"] },
    LocalPage { title: "BDA Version Comparison", path: "/bda/compare", keywords: &["diff", "history", "versions"] },
    LocalPage { title: "Planning Assumptions", path: "/assumptions", keywords: &["assumption", "planning", "risk"] },
    LocalPage { title: "Rules of Engagement", path: "/roe", keywords: &["roe", "rules", "engagement"] },
];

/// Local pages matching `query` (case-insensitive), in table order.
pub fn local_page_matches(query: &str, pages: &[LocalPage]) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    pages
        .iter()
        .filter(|page| page.matches(&needle))
        .map(|page| page.to_hit())
        .collect()
}

/// Concatenate `sources` in order, keep the first hit per `path`, and stop
/// at `cap` results.
pub fn merge_results<I>(sources: I, cap: usize) -> Vec<SearchHit>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = SearchHit>,
{
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .flatten()
        .filter(|hit| seen.insert(hit.path.clone()))
        .take(cap)
        .collect()
}

/// Results for a query once the backend answered (or failed).
///
/// Local pages come first. A failed backend search yields only local
/// pages, capped at [`FALLBACK_CAP`].
pub fn combine(query: &str, remote: Option<Vec<SearchHit>>) -> Vec<SearchHit> {
    let local = local_page_matches(query, LOCAL_PAGES);
    match remote {
        Some(remote) => merge_results([local, remote], MERGED_CAP),
        None => merge_results([local], FALLBACK_CAP),
    }
}

/// Identifies one issued search request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    /// Raw sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and remembers which one is current.
///
/// Only the response to the most recently issued ticket may be applied.
#[derive(Clone, Debug, Default)]
pub struct SearchSequence {
    latest: u64,
}

impl SearchSequence {
    /// Create a sequence with no tickets issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding all earlier ones.
    pub fn issue(&mut self) -> SearchTicket {
        self.latest += 1;
        SearchTicket(self.latest)
    }

    /// Supersede all outstanding requests without issuing a new one,
    /// e.g. when the query is cleared.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    /// Whether a response for `ticket` may still be applied.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, path: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            path: path.to_string(),
            kind: SearchKind::Target,
            subtitle: None,
        }
    }

    #[test]
    fn test_merge_keeps_first_seen() {
        let local = vec![SearchHit::page("Target List", "/targets")];
        let remote = vec![hit("Remote dup", "/targets"), hit("Bridge", "/targets/t1")];

        let merged = merge_results([local, remote], MERGED_CAP);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "Target List");
        assert_eq!(merged[1].path, "/targets/t1");
    }

    #[test]
    fn test_merge_respects_cap() {
        let remote: Vec<SearchHit> = (0..30).map(|i| hit("t", &format!("/targets/{}", i))).collect();
        assert_eq!(merge_results([remote], MERGED_CAP).len(), MERGED_CAP);
    }

    #[test]
    fn test_fallback_cap() {
        let hits = combine("a", None);
        assert!(hits.len() <= FALLBACK_CAP);
        assert!(hits.iter().all(|h| h.kind == SearchKind::Page));
    }

    #[test]
    fn test_local_matching_uses_keywords() {
        let hits = local_page_matches("ORBAT", LOCAL_PAGES);
        assert_eq!(hits[0].path, "/orbat");
        assert!(local_page_matches("   ", LOCAL_PAGES).is_empty());
    }

    #[test]
    fn test_combine_places_local_first() {
        let hits = combine("bda", Some(vec![hit("BDA-17", "/bda/17")]));
        assert_eq!(hits.first().map(|h| h.kind), Some(SearchKind::Page));
        assert_eq!(hits.last().map(|h| h.path.as_str()), Some("/bda/17"));
    }

    #[test]
    fn test_only_latest_ticket_is_current() {
        let mut seq = SearchSequence::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));

        seq.invalidate();
        assert!(!seq.is_current(second));
    }
}
