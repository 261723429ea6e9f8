//! Infinite-scroll pagination with cross-page duplicate suppression.
//!
//! The underlying result ordering is not stable across fetches, so offsets
//! alone cannot prevent duplicates. A pager session tracks the line ids and
//! snippet fingerprints it has already emitted for one (query, scope)
//! combination and filters repeats out of later pages. Exhaustion is judged
//! on the raw fetch size, never on the post-dedup survivor count, so heavy
//! in-page duplication does not falsely end the stream.

use std::sync::Arc;

use ahash::AHashSet;
use log::debug;

use crate::analysis::normalize;
use crate::content::{ContentIndex, LineHit, SearchScope};
use crate::error::Result;
use crate::snippet::{MARK_POST, MARK_PRE};

/// Pager lifecycle for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// No page loaded yet.
    Idle,
    /// A load for the given page index is in flight.
    Loading(usize),
    /// The given page index loaded successfully.
    Loaded(usize),
    /// The load for the given page index failed; the same index is
    /// retryable.
    Error(usize),
    /// A raw fetch came back short; no further pages exist.
    Exhausted,
}

/// One page of deduplicated results.
#[derive(Debug, Clone)]
pub struct Page {
    /// Hits surviving duplicate suppression, in rank order.
    pub hits: Vec<LineHit>,
    /// Key of the preceding page, `None` at page zero.
    pub prev_key: Option<usize>,
    /// Key of the following page, `None` once the stream is exhausted.
    pub next_key: Option<usize>,
}

/// Stateful adapter from offset-based content searches to a page stream.
///
/// One instance serves one live search session. Loads must be serialized by
/// the caller (`load` takes `&mut self`); independent concurrent sessions
/// use independent instances. A result from an abandoned call must simply
/// not be applied — exclusive access makes that the caller's choice alone.
pub struct SearchResultPager {
    content: Arc<ContentIndex>,
    query: String,
    scope: SearchScope,
    slop: u32,
    page_size: usize,
    seen_line_ids: AHashSet<u64>,
    seen_fingerprints: AHashSet<String>,
    state: PagerState,
}

impl SearchResultPager {
    pub fn new(
        content: Arc<ContentIndex>,
        query: impl Into<String>,
        scope: SearchScope,
        slop: u32,
        page_size: usize,
    ) -> Self {
        SearchResultPager {
            content,
            query: query.into(),
            scope,
            slop,
            page_size,
            seen_line_ids: AHashSet::new(),
            seen_fingerprints: AHashSet::new(),
            state: PagerState::Idle,
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Start a new session for a changed query text or scope: both seen-sets
    /// are discarded and the pager returns to `Idle`.
    pub fn reset(&mut self, query: impl Into<String>, scope: SearchScope) {
        self.query = query.into();
        self.scope = scope;
        self.seen_line_ids.clear();
        self.seen_fingerprints.clear();
        self.state = PagerState::Idle;
    }

    /// Reset to the given query and scope, then load page zero.
    pub fn refresh(&mut self, query: impl Into<String>, scope: SearchScope) -> Result<Page> {
        self.reset(query, scope);
        self.load(0)
    }

    /// Load one page.
    ///
    /// Fetches `page_size` raw hits at `page_index * page_size`, filters out
    /// every hit whose line id or snippet fingerprint was already emitted in
    /// this session, and records the survivors. On failure the page stays
    /// retryable and the seen-sets are not rolled back: survivors recorded
    /// by an earlier attempt of the same page remain recorded.
    pub fn load(&mut self, page_index: usize) -> Result<Page> {
        self.state = PagerState::Loading(page_index);
        let offset = page_index * self.page_size;

        let raw = match self
            .content
            .search(&self.query, self.slop, self.scope, self.page_size, offset)
        {
            Ok(hits) => hits,
            Err(err) => {
                self.state = PagerState::Error(page_index);
                return Err(err);
            }
        };

        let raw_count = raw.len();
        let mut hits = Vec::with_capacity(raw_count);
        for hit in raw {
            let fingerprint = snippet_fingerprint(&hit.snippet);
            if self.seen_line_ids.contains(&hit.line_id)
                || self.seen_fingerprints.contains(&fingerprint)
            {
                debug!("dropping duplicate hit line_id={}", hit.line_id);
                continue;
            }
            self.seen_line_ids.insert(hit.line_id);
            self.seen_fingerprints.insert(fingerprint);
            hits.push(hit);
        }

        let next_key = if raw_count < self.page_size {
            self.state = PagerState::Exhausted;
            None
        } else {
            self.state = PagerState::Loaded(page_index);
            Some(page_index + 1)
        };

        Ok(Page {
            hits,
            prev_key: page_index.checked_sub(1),
            next_key,
        })
    }
}

/// Resolve the page to reload after a UI-driven invalidation that did not
/// change the query: the page adjacent to the last anchor, preferring the one
/// after `prev_key`, else the one before `next_key`, else page zero.
pub fn resolve_refresh_key(prev_key: Option<usize>, next_key: Option<usize>) -> usize {
    match (prev_key, next_key) {
        (Some(prev), _) => prev + 1,
        (None, Some(next)) => next.saturating_sub(1),
        (None, None) => 0,
    }
}

/// Content identity of a snippet, independent of emphasis markers, ellipses,
/// and residual pointing. Guards against the index yielding the same passage
/// under distinct line ids.
fn snippet_fingerprint(snippet: &str) -> String {
    let stripped = snippet
        .replace(MARK_PRE, "")
        .replace(MARK_POST, "")
        .replace('\u{2026}', "");
    normalize(&stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_key_prefers_page_after_prev() {
        assert_eq!(resolve_refresh_key(Some(3), Some(5)), 4);
        assert_eq!(resolve_refresh_key(Some(0), None), 1);
    }

    #[test]
    fn refresh_key_falls_back_to_page_before_next() {
        assert_eq!(resolve_refresh_key(None, Some(5)), 4);
        assert_eq!(resolve_refresh_key(None, Some(0)), 0);
    }

    #[test]
    fn refresh_key_defaults_to_zero() {
        assert_eq!(resolve_refresh_key(None, None), 0);
    }

    #[test]
    fn fingerprint_ignores_markers_and_pointing() {
        let a = snippet_fingerprint("\u{2026}<b>יְהִי</b> אוֹר");
        let b = snippet_fingerprint("יהי <b>אור</b>");
        assert_eq!(a, b);
    }
}
