//! Ordered breadcrumb trail
//!
//! Entries are kept in navigation depth order. Two invariants hold after
//! every mutation:
//! - no two entries share a label
//! - every entry's path is a string prefix of the route path that was
//!   current when the trail was last advanced

use serde::{Deserialize, Serialize};

/// A single breadcrumb: what to show and where it leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    /// Display label (uniqueness key within a trail)
    pub label: String,
    /// Route path recorded when the entry was appended
    pub path: String,
}

impl BreadcrumbEntry {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// What to do when the incoming label already exists in the trail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMatchPolicy {
    /// Leave the existing entry untouched, even if its path is outdated
    #[default]
    Keep,
    /// Truncate the trail after the matching entry and point it at the
    /// current path
    Refresh,
}

/// Summary of a single trail advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrailChange {
    /// Entries evicted from the end of the trail
    pub evicted: usize,
    /// A new entry was appended
    pub appended: bool,
    /// An existing entry was re-pointed at the current path
    pub refreshed: bool,
}

/// Ordered sequence of breadcrumbs, shallowest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreadcrumbTrail {
    entries: Vec<BreadcrumbEntry>,
}

impl BreadcrumbTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[BreadcrumbEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in trail order
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Check whether an entry with this label exists
    pub fn contains_label(&self, label: &str) -> bool {
        self.entries.iter().any(|e| e.label == label)
    }

    /// Number of trailing entries whose path is not a prefix of `current_path`
    ///
    /// Each appended path extends the one before it, so stale entries
    /// always form a suffix of the trail.
    pub fn stale_tail_len(&self, current_path: &str) -> usize {
        self.entries
            .iter()
            .rev()
            .take_while(|e| !current_path.starts_with(e.path.as_str()))
            .count()
    }

    /// Advance the trail to a newly navigated item
    ///
    /// Stale trailing entries are evicted last-in-first-out before the item
    /// is considered. With [`LabelMatchPolicy::Keep`] the label check runs
    /// against the trail as it was before eviction, so a label that only
    /// matched an evicted entry is not re-appended.
    pub fn advance(&mut self, label: &str, current_path: &str, policy: LabelMatchPolicy) -> TrailChange {
        let evicted = self.stale_tail_len(current_path);

        match policy {
            LabelMatchPolicy::Keep => {
                let contains = self.contains_label(label);
                self.evict(evicted);

                let appended = !contains;
                if appended {
                    self.entries.push(BreadcrumbEntry::new(label, current_path));
                }

                TrailChange {
                    evicted,
                    appended,
                    refreshed: false,
                }
            }
            LabelMatchPolicy::Refresh => {
                self.evict(evicted);

                match self.entries.iter().position(|e| e.label == label) {
                    Some(pos) => {
                        let dropped = self.entries.len() - (pos + 1);
                        self.entries.truncate(pos + 1);
                        self.entries[pos].path = current_path.to_string();
                        TrailChange {
                            evicted: evicted + dropped,
                            appended: false,
                            refreshed: true,
                        }
                    }
                    None => {
                        self.entries.push(BreadcrumbEntry::new(label, current_path));
                        TrailChange {
                            evicted,
                            appended: true,
                            refreshed: false,
                        }
                    }
                }
            }
        }
    }

    fn evict(&mut self, count: usize) {
        for _ in 0..count {
            self.entries.pop();
        }
    }
}
