//! Discovery session - transient candidate links plus the user's selection.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::types::link::DiscoveredLink;

/// The in-memory state of one discovery+ingest cycle.
///
/// Holds the current candidate links and an insertion-ordered set of
/// selected URLs. Never persisted; the UI layer that starts discovery
/// owns its lifetime and clears it when the batch completes or discovery
/// is reset. Selection order is preserved so batches run in the order the
/// user picked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoverySession {
    /// Candidate links from the discovery cascade.
    pub links: Vec<DiscoveredLink>,

    /// URLs the user selected for ingestion, in selection order.
    pub selected: IndexSet<String>,
}

impl DiscoverySession {
    /// Start a session from discovery results.
    pub fn new(links: Vec<DiscoveredLink>) -> Self {
        Self {
            links,
            selected: IndexSet::new(),
        }
    }

    /// Select a URL. No-op unless it is one of the session's candidates.
    pub fn select(&mut self, url: &str) {
        if self.links.iter().any(|l| l.url == url) {
            self.selected.insert(url.to_string());
        }
    }

    /// Deselect a URL.
    pub fn deselect(&mut self, url: &str) {
        self.selected.shift_remove(url);
    }

    /// Toggle a URL's selection state.
    pub fn toggle(&mut self, url: &str) {
        if self.selected.contains(url) {
            self.deselect(url);
        } else {
            self.select(url);
        }
    }

    /// Select every candidate link, in candidate order.
    pub fn select_all(&mut self) {
        let urls: Vec<String> = self.links.iter().map(|l| l.url.clone()).collect();
        for url in urls {
            self.selected.insert(url);
        }
    }

    /// Clear the selection but keep the candidates.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Reset the whole session.
    pub fn reset(&mut self) {
        self.links.clear();
        self.selected.clear();
    }

    /// Selected URLs in selection order.
    pub fn selected_urls(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Whether a URL is selected.
    pub fn is_selected(&self, url: &str) -> bool {
        self.selected.contains(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DiscoverySession {
        DiscoverySession::new(vec![
            DiscoveredLink::new("https://example.com/a", "A"),
            DiscoveredLink::new("https://example.com/b", "B"),
            DiscoveredLink::new("https://example.com/c", "C"),
        ])
    }

    #[test]
    fn test_select_only_known_candidates() {
        let mut s = session();
        s.select("https://example.com/a");
        s.select("https://elsewhere.com/x");

        assert!(s.is_selected("https://example.com/a"));
        assert!(!s.is_selected("https://elsewhere.com/x"));
        assert_eq!(s.selected.len(), 1);
    }

    #[test]
    fn test_selection_order_preserved() {
        let mut s = session();
        s.select("https://example.com/c");
        s.select("https://example.com/a");

        assert_eq!(
            s.selected_urls(),
            vec!["https://example.com/c", "https://example.com/a"]
        );
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut s = session();
        s.toggle("https://example.com/b");
        assert!(s.is_selected("https://example.com/b"));
        s.toggle("https://example.com/b");
        assert!(!s.is_selected("https://example.com/b"));

        s.select_all();
        assert_eq!(s.selected.len(), 3);
        s.clear_selection();
        assert!(s.selected.is_empty());
        assert_eq!(s.links.len(), 3);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = session();
        s.select_all();
        s.reset();
        assert!(s.links.is_empty());
        assert!(s.selected.is_empty());
    }
}
