use std::collections::HashSet;
use std::time::{Duration, Instant};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::debug;

use crate::layout::TreeLayout;
use crate::timer::{Debounce, Generation};
use crate::tree::NodeId;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring of the label.
    #[default]
    Substring,
    /// Skim-style fuzzy subsequence match.
    Fuzzy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub debounce: Duration,
    pub match_mode: MatchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            match_mode: MatchMode::Substring,
        }
    }
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Turns keystrokes into a settled query and the set of matching nodes.
#[derive(Debug)]
pub struct SearchController {
    match_mode: MatchMode,
    raw_query: String,
    debounced_query: String,
    matched_ids: HashSet<NodeId>,
    first_match: Option<NodeId>,
    pending: Debounce<String>,
    generation: Generation,
}

impl SearchController {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            match_mode: config.match_mode,
            raw_query: String::new(),
            debounced_query: String::new(),
            matched_ids: HashSet::new(),
            first_match: None,
            pending: Debounce::new(config.debounce),
            generation: Generation::default(),
        }
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn debounced_query(&self) -> &str {
        &self.debounced_query
    }

    pub fn matched_ids(&self) -> &HashSet<NodeId> {
        &self.matched_ids
    }

    pub fn is_match(&self, id: &str) -> bool {
        self.matched_ids.contains(id)
    }

    /// First match in pre-order, left to right.
    pub fn first_match(&self) -> Option<&NodeId> {
        self.first_match.as_ref()
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Records the input immediately and restarts the debounce window.
    pub fn set_query(&mut self, raw: impl Into<String>, now: Instant) {
        self.raw_query = raw.into();
        self.pending
            .schedule(self.raw_query.clone(), now, self.generation);
    }

    /// Applies a due debounced query and recomputes the matches. Returns the
    /// newly applied query.
    pub fn poll(&mut self, now: Instant, layout: &TreeLayout) -> Option<&str> {
        let query = self.pending.poll(now, self.generation)?;

        self.debounced_query = query;
        self.recompute(layout);
        Some(&self.debounced_query)
    }

    /// Rematches against a new layout. A query still waiting out its window
    /// moves to the new generation with its due time unchanged, so it lands
    /// against the new data.
    pub fn invalidate(&mut self, layout: &TreeLayout) {
        self.generation = self.generation.next();
        self.pending.restamp(self.generation);
        self.recompute(layout);
    }

    pub fn set_match_mode(&mut self, mode: MatchMode, layout: &TreeLayout) {
        if self.match_mode != mode {
            self.match_mode = mode;
            self.recompute(layout);
        }
    }

    fn recompute(&mut self, layout: &TreeLayout) {
        self.matched_ids.clear();
        self.first_match = None;

        let query = self.debounced_query.trim();
        if query.is_empty() {
            return;
        }

        let needle = query.to_lowercase();
        let matcher = SkimMatcherV2::default();
        for node in &layout.nodes {
            let hit = match self.match_mode {
                MatchMode::Substring => node.label.to_lowercase().contains(&needle),
                MatchMode::Fuzzy => fuzzy_match_score(&matcher, &node.label, query).is_some(),
            };
            if hit {
                if self.first_match.is_none() {
                    self.first_match = Some(node.id.clone());
                }
                self.matched_ids.insert(node.id.clone());
            }
        }

        debug!(
            query,
            matches = self.matched_ids.len(),
            "search matches recomputed"
        );
    }
}
