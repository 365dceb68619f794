//! Unfiltered browse view: level filter, "load more" paging and
//! next/previous navigation in canonical index order.

use crate::catalog::{EpisodeDescriptor, Level};
use crate::index::IndexSnapshot;
use serde::Serialize;

/// Level tab selected in the browse view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Only(Level),
}

impl LevelFilter {
    pub fn matches(&self, descriptor: &EpisodeDescriptor) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(level) => &descriptor.level == level,
        }
    }
}

impl std::str::FromStr for LevelFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            Ok(LevelFilter::All)
        } else {
            Ok(LevelFilter::Only(Level::from(s.to_string())))
        }
    }
}

impl std::fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelFilter::All => f.write_str("all"),
            LevelFilter::Only(level) => write!(f, "{}", level),
        }
    }
}

/// Descriptors passing `filter`, in index order.
pub fn filter<'a>(descriptors: &'a [EpisodeDescriptor], filter: &LevelFilter) -> Vec<&'a EpisodeDescriptor> {
    descriptors.iter().filter(|d| filter.matches(d)).collect()
}

/// The visible prefix of a filtered list.
#[derive(Debug, Serialize)]
pub struct Page<'a> {
    pub items: Vec<&'a EpisodeDescriptor>,
    pub total: usize,
    pub remaining: usize,
}

/// Browse state: selected level plus how many episodes are shown.
#[derive(Debug, Clone)]
pub struct BrowseState {
    filter: LevelFilter,
    shown: usize,
    page_size: usize,
}

impl BrowseState {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            filter: LevelFilter::All,
            shown: page_size,
            page_size,
        }
    }

    pub fn filter(&self) -> &LevelFilter {
        &self.filter
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    /// Switch level tab; resets to the first page.
    pub fn set_filter(&mut self, filter: LevelFilter) {
        self.filter = filter;
        self.shown = self.page_size;
    }

    /// Show one more page.
    pub fn load_more(&mut self) {
        self.shown = self.shown.saturating_add(self.page_size);
    }

    /// Show at least `shown` episodes, rounded up to whole pages.
    pub fn show_at_least(&mut self, shown: usize) {
        let pages = shown.div_ceil(self.page_size).max(1);
        self.shown = pages.saturating_mul(self.page_size);
    }

    pub fn page<'a>(&self, snapshot: &'a IndexSnapshot) -> Page<'a> {
        let matching = filter(snapshot.descriptors(), &self.filter);
        let total = matching.len();
        let items: Vec<_> = matching.into_iter().take(self.shown).collect();
        let remaining = total - items.len();
        Page {
            items,
            total,
            remaining,
        }
    }
}

/// Episode after `id` in index order.
pub fn next<'a>(snapshot: &'a IndexSnapshot, id: &str) -> Option<&'a EpisodeDescriptor> {
    let position = snapshot.position(id)?;
    snapshot.descriptors().get(position + 1)
}

/// Episode before `id` in index order.
pub fn previous<'a>(snapshot: &'a IndexSnapshot, id: &str) -> Option<&'a EpisodeDescriptor> {
    let position = snapshot.position(id)?;
    position
        .checked_sub(1)
        .and_then(|p| snapshot.descriptors().get(p))
}
