//! Index schema: document partitions and field handles.
//!
//! The corpus is stored as a single physical index partitioned by a `kind`
//! discriminator term. Every query filters on `kind` before any other clause,
//! so the partitions never cross-contaminate.

use serde::{Deserialize, Serialize};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, INDEXED, STORED, STRING,
};

/// Tokenizer name registered on the index for all analyzed fields.
///
/// Analyzed fields receive pre-normalized text (see [`crate::analysis`]), so a
/// plain whitespace split is the whole analysis chain.
pub(crate) const TOKENIZER_NAME: &str = "whitespace";

/// Document partition discriminator.
///
/// Encoded as an indexed term on the `kind` field; kept as an enum so call
/// sites never spell partition names as ad hoc string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Title,
    Toc,
    Line,
}

impl DocKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocKind::Title => "title",
            DocKind::Toc => "toc",
            DocKind::Line => "line",
        }
    }
}

/// A document to be indexed, one variant per partition.
///
/// Analyzed text is carried raw here; the writer applies the shared
/// normalization when mapping into index fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IndexedDocument {
    /// A book title, searchable by prefix. Only the book id is retrievable.
    Title { book_id: u64, title: String },

    /// A table-of-contents entry referencing a position within a book.
    Toc {
        toc_id: u64,
        book_id: u64,
        book_title: String,
        text: String,
        level: u64,
    },

    /// One line of body text. `text_raw` is stored verbatim for snippet
    /// extraction; the analyzed form is derived from it at write time.
    Line {
        book_id: u64,
        book_title: String,
        category_id: u64,
        line_id: u64,
        line_index: u64,
        text_raw: String,
    },
}

impl IndexedDocument {
    pub fn kind(&self) -> DocKind {
        match self {
            IndexedDocument::Title { .. } => DocKind::Title,
            IndexedDocument::Toc { .. } => DocKind::Toc,
            IndexedDocument::Line { .. } => DocKind::Line,
        }
    }
}

/// The corpus schema with pre-resolved field handles.
#[derive(Debug, Clone)]
pub struct CorpusSchema {
    pub schema: Schema,
    /// Partition discriminator term, always the first filter clause.
    pub kind: Field,
    pub book_id: Field,
    pub category_id: Field,
    pub toc_id: Field,
    pub line_id: Field,
    pub line_index: Field,
    pub level: Field,
    /// Raw book title, stored for display on TOC and line hits.
    pub book_title: Field,
    /// Analyzed book title (normalized, indexed, not stored).
    pub title: Field,
    /// TOC label, analyzed and stored. The stored value is the normalized
    /// label, since a single field carries both roles.
    pub toc_text: Field,
    /// Analyzed line body, indexed with positions for slop phrases.
    pub text: Field,
    /// Raw line body, stored verbatim for snippet extraction.
    pub text_raw: Field,
}

impl CorpusSchema {
    /// Build the schema. Construction is deterministic, so handles resolved
    /// here are valid against any index created from this schema.
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let kind = builder.add_text_field("kind", STRING);

        let book_id = builder.add_u64_field("book_id", INDEXED | STORED);
        let category_id = builder.add_u64_field("category_id", INDEXED);
        let toc_id = builder.add_u64_field("toc_id", STORED);
        let line_id = builder.add_u64_field("line_id", STORED);
        let line_index = builder.add_u64_field("line_index", STORED);
        let level = builder.add_u64_field("level", STORED);

        let book_title = builder.add_text_field("book_title", STORED);

        let analyzed = TextFieldIndexing::default()
            .set_tokenizer(TOKENIZER_NAME)
            .set_index_option(IndexRecordOption::Basic);
        let title = builder.add_text_field(
            "title",
            TextOptions::default().set_indexing_options(analyzed.clone()),
        );
        let toc_text = builder.add_text_field(
            "toc_text",
            TextOptions::default()
                .set_indexing_options(analyzed)
                .set_stored(),
        );

        // Positions are required for proximity (slop) phrase queries.
        let with_positions = TextFieldIndexing::default()
            .set_tokenizer(TOKENIZER_NAME)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let text = builder.add_text_field(
            "text",
            TextOptions::default().set_indexing_options(with_positions),
        );
        let text_raw = builder.add_text_field("text_raw", STORED);

        let schema = builder.build();

        CorpusSchema {
            schema,
            kind,
            book_id,
            category_id,
            toc_id,
            line_id,
            line_index,
            level,
            book_title,
            title,
            toc_text,
            text,
            text_raw,
        }
    }
}

impl Default for CorpusSchema {
    fn default() -> Self {
        Self::new()
    }
}
