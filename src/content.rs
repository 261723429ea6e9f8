//! Proximity full-text search over the line partition.
//!
//! Unlike the lookup layer, failures here propagate: a line search is the
//! user's primary action and needs a retryable failure signal rather than a
//! silently empty page.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, PhraseQuery, Query, TermQuery};
use tantivy::schema::{IndexRecordOption, Value};
use tantivy::{TantivyDocument, Term};

use crate::analysis::{normalize, tokenize};
use crate::error::Result;
use crate::index::CorpusIndex;
use crate::schema::DocKind;
use crate::snippet::{build_snippet, DEFAULT_CONTEXT_CHARS};

/// Optional restriction of a content search to one book or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    All,
    Book(u64),
    Category(u64),
}

/// A matched line with its highlighted snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineHit {
    pub book_id: u64,
    pub book_title: String,
    pub line_id: u64,
    pub line_index: u64,
    pub snippet: String,
    pub score: f32,
}

/// Proximity (slop-phrase) search over line bodies.
pub struct ContentIndex {
    index: Arc<CorpusIndex>,
}

impl ContentIndex {
    pub fn new(index: Arc<CorpusIndex>) -> Self {
        ContentIndex { index }
    }

    /// Search line bodies for the query tokens within the given slop budget.
    ///
    /// Executes the top `offset + limit` ranked hits and discards the first
    /// `offset` (the engine exposes top-N, not a native offset). An offset
    /// beyond the available hits yields an empty page, not an error. An
    /// empty query yields an empty page on every path.
    pub fn search(
        &self,
        raw: &str,
        slop: u32,
        scope: SearchScope,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LineHit>> {
        let normalized = normalize(raw);
        let tokens = tokenize(&normalized);
        if tokens.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let query = self.line_query(&tokens, slop, scope);
        let searcher = self.index.snapshot()?;
        let top = searcher.search(&query, &TopDocs::with_limit(offset + limit))?;

        let mut hits = Vec::with_capacity(top.len().saturating_sub(offset));
        for (score, addr) in top.into_iter().skip(offset) {
            let doc: TantivyDocument = searcher.doc(addr)?;
            hits.push(self.to_line_hit(&doc, score, &tokens));
        }
        Ok(hits)
    }

    /// Unscoped search across the whole corpus.
    pub fn search_all_text(
        &self,
        raw: &str,
        slop: u32,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LineHit>> {
        self.search(raw, slop, SearchScope::All, limit, offset)
    }

    /// Search restricted to one book.
    pub fn search_in_book(
        &self,
        raw: &str,
        slop: u32,
        book_id: u64,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LineHit>> {
        self.search(raw, slop, SearchScope::Book(book_id), limit, offset)
    }

    /// Search restricted to one category.
    pub fn search_in_category(
        &self,
        raw: &str,
        slop: u32,
        category_id: u64,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LineHit>> {
        self.search(raw, slop, SearchScope::Category(category_id), limit, offset)
    }

    /// Partition filter, optional scope filter, then the proximity clause.
    fn line_query(&self, tokens: &[&str], slop: u32, scope: SearchScope) -> BooleanQuery {
        let fields = self.index.fields();
        let mut clauses: Vec<(Occur, Box<dyn Query>)> = vec![(
            Occur::Must,
            Box::new(TermQuery::new(
                Term::from_field_text(fields.kind, DocKind::Line.as_str()),
                IndexRecordOption::Basic,
            )),
        )];

        match scope {
            SearchScope::All => {}
            SearchScope::Book(id) => clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(
                    Term::from_field_u64(fields.book_id, id),
                    IndexRecordOption::Basic,
                )),
            )),
            SearchScope::Category(id) => clauses.push((
                Occur::Must,
                Box::new(TermQuery::new(
                    Term::from_field_u64(fields.category_id, id),
                    IndexRecordOption::Basic,
                )),
            )),
        }

        clauses.push((Occur::Must, self.proximity_query(tokens, slop)));
        BooleanQuery::new(clauses)
    }

    /// Ordered phrase with a slop budget; a single token needs no phrase.
    fn proximity_query(&self, tokens: &[&str], slop: u32) -> Box<dyn Query> {
        let fields = self.index.fields();
        if tokens.len() == 1 {
            return Box::new(TermQuery::new(
                Term::from_field_text(fields.text, tokens[0]),
                IndexRecordOption::Basic,
            ));
        }
        let terms: Vec<(usize, Term)> = tokens
            .iter()
            .enumerate()
            .map(|(pos, tok)| (pos, Term::from_field_text(fields.text, tok)))
            .collect();
        Box::new(PhraseQuery::new_with_offset_and_slop(terms, slop))
    }

    fn to_line_hit(&self, doc: &TantivyDocument, score: f32, tokens: &[&str]) -> LineHit {
        let fields = self.index.fields();
        let text_raw = doc
            .get_first(fields.text_raw)
            .and_then(|v| v.as_str())
            .unwrap_or("");
        LineHit {
            book_id: doc.get_first(fields.book_id).and_then(|v| v.as_u64()).unwrap_or(0),
            book_title: doc
                .get_first(fields.book_title)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            line_id: doc.get_first(fields.line_id).and_then(|v| v.as_u64()).unwrap_or(0),
            line_index: doc
                .get_first(fields.line_index)
                .and_then(|v| v.as_u64())
                .unwrap_or(0),
            snippet: build_snippet(text_raw, tokens, DEFAULT_CONTEXT_CHARS),
            score,
        }
    }
}
