//! Type-ahead prefix search over book titles and TOC entries.
//!
//! Both lookups build the same query shape: a partition filter plus one
//! prefix clause per query token, all AND-ed, so every token must prefix
//! some analyzed term of the candidate. Failures degrade to an empty result:
//! suggestion lists are best-effort and must never disrupt typing.

use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, RegexQuery, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{TantivyDocument, Term};

use crate::analysis::{normalize, tokenize};
use crate::error::Result;
use crate::index::CorpusIndex;
use crate::schema::DocKind;

/// A table-of-contents suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocHit {
    pub toc_id: u64,
    pub book_id: u64,
    pub book_title: String,
    /// Normalized TOC label.
    pub text: String,
    pub level: u64,
    pub score: f32,
}

/// Prefix search over the title and TOC partitions.
pub struct LookupIndex {
    index: Arc<CorpusIndex>,
}

impl LookupIndex {
    pub fn new(index: Arc<CorpusIndex>) -> Self {
        LookupIndex { index }
    }

    /// Book ids whose analyzed title is prefix-matched by every query token,
    /// in first-occurrence result order, deduplicated, at most `limit`.
    ///
    /// Empty on empty query and on any backend failure.
    pub fn book_ids_by_title_prefix(&self, raw: &str, limit: usize) -> Vec<u64> {
        self.title_prefix_search(raw, limit).unwrap_or_else(|err| {
            warn!("title lookup degraded to empty result: {err}");
            Vec::new()
        })
    }

    /// TOC entries whose analyzed label is prefix-matched by every query
    /// token, in result order, at most `limit`.
    ///
    /// Empty on empty query and on any backend failure.
    pub fn toc_by_prefix(&self, raw: &str, limit: usize) -> Vec<TocHit> {
        self.toc_prefix_search(raw, limit).unwrap_or_else(|err| {
            warn!("toc lookup degraded to empty result: {err}");
            Vec::new()
        })
    }

    fn title_prefix_search(&self, raw: &str, limit: usize) -> Result<Vec<u64>> {
        let normalized = normalize(raw);
        let tokens = tokenize(&normalized);
        if tokens.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let fields = self.index.fields();
        let query = prefix_query(fields.kind, DocKind::Title, fields.title, &tokens)?;
        let searcher = self.index.snapshot()?;
        let top = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut seen = ahash::AHashSet::new();
        let mut ids = Vec::new();
        for (_score, addr) in top {
            let doc: TantivyDocument = searcher.doc(addr)?;
            if let Some(id) = doc.get_first(fields.book_id).and_then(|v| v.as_u64()) {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    fn toc_prefix_search(&self, raw: &str, limit: usize) -> Result<Vec<TocHit>> {
        let normalized = normalize(raw);
        let tokens = tokenize(&normalized);
        if tokens.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let fields = self.index.fields();
        let query = prefix_query(fields.kind, DocKind::Toc, fields.toc_text, &tokens)?;
        let searcher = self.index.snapshot()?;
        let top = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut hits = Vec::with_capacity(top.len());
        for (score, addr) in top {
            let doc: TantivyDocument = searcher.doc(addr)?;
            hits.push(TocHit {
                toc_id: doc.get_first(fields.toc_id).and_then(|v| v.as_u64()).unwrap_or(0),
                book_id: doc.get_first(fields.book_id).and_then(|v| v.as_u64()).unwrap_or(0),
                book_title: doc
                    .get_first(fields.book_title)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
                text: doc
                    .get_first(fields.toc_text)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string(),
                level: doc.get_first(fields.level).and_then(|v| v.as_u64()).unwrap_or(0),
                score,
            });
        }
        Ok(hits)
    }
}

/// Partition filter AND one term-prefix clause per token.
fn prefix_query(
    kind_field: Field,
    kind: DocKind,
    text_field: Field,
    tokens: &[&str],
) -> Result<BooleanQuery> {
    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(tokens.len() + 1);
    clauses.push((
        Occur::Must,
        Box::new(TermQuery::new(
            Term::from_field_text(kind_field, kind.as_str()),
            IndexRecordOption::Basic,
        )),
    ));
    for token in tokens {
        // The term-dictionary regex is anchored, so `tok.*` is a prefix match.
        let pattern = format!("{}.*", escape_for_regex(token));
        clauses.push((
            Occur::Must,
            Box::new(RegexQuery::from_pattern(&pattern, text_field)?),
        ));
    }
    Ok(BooleanQuery::new(clauses))
}

fn escape_for_regex(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '.' | '+' | '*' | '?' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
            | '\\' => format!("\\{}", c),
            _ => c.to_string(),
        })
        .collect()
}
