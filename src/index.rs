//! Physical index handle and document writer.
//!
//! [`CorpusIndex`] binds the schema to an on-disk tantivy index. Population
//! of the corpus from its relational source is an external batch process;
//! [`CorpusWriter`] is the primitive that process (and the tests) drive.

use std::path::Path;

use tantivy::tokenizer::WhitespaceTokenizer;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument};

use crate::analysis::normalize;
use crate::error::{OtzarError, Result};
use crate::schema::{CorpusSchema, IndexedDocument, TOKENIZER_NAME};

const WRITER_MEMORY_BUDGET: usize = 50_000_000;

/// A queryable handle bound to an index location.
#[derive(Debug)]
pub struct CorpusIndex {
    index: Index,
    fields: CorpusSchema,
}

impl CorpusIndex {
    /// Create a fresh index at `path`.
    pub fn create_in(path: &Path) -> Result<Self> {
        let fields = CorpusSchema::new();
        let index = Index::create_in_dir(path, fields.schema.clone())
            .map_err(|e| OtzarError::index_unavailable(e.to_string()))?;
        Self::register_tokenizer(&index);
        Ok(CorpusIndex { index, fields })
    }

    /// Open an existing index at `path`.
    pub fn open_in(path: &Path) -> Result<Self> {
        let index = Index::open_in_dir(path)
            .map_err(|e| OtzarError::index_unavailable(e.to_string()))?;
        Self::register_tokenizer(&index);
        Ok(CorpusIndex {
            index,
            fields: CorpusSchema::new(),
        })
    }

    fn register_tokenizer(index: &Index) {
        index
            .tokenizers()
            .register(TOKENIZER_NAME, WhitespaceTokenizer::default());
    }

    /// Open a read-only snapshot of the index.
    ///
    /// Each search call acquires its own snapshot and releases it when the
    /// returned searcher drops, on every exit path. A concurrent rebuild
    /// never affects an in-flight call.
    pub(crate) fn snapshot(&self) -> Result<Searcher> {
        let reader: IndexReader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(reader.searcher())
    }

    pub(crate) fn fields(&self) -> &CorpusSchema {
        &self.fields
    }

    /// Create a writer for populating the index.
    pub fn writer(&self) -> Result<CorpusWriter> {
        let writer = self.index.writer(WRITER_MEMORY_BUDGET)?;
        Ok(CorpusWriter {
            writer,
            fields: self.fields.clone(),
        })
    }
}

/// Maps [`IndexedDocument`] variants into index documents.
///
/// Analyzed fields receive normalized text here; stored raw fields are kept
/// verbatim. This is the single point where the build-time side of the
/// normalization contract is applied.
pub struct CorpusWriter {
    writer: IndexWriter,
    fields: CorpusSchema,
}

impl CorpusWriter {
    /// Queue one document for indexing.
    pub fn add(&mut self, doc: IndexedDocument) -> Result<()> {
        let f = &self.fields;
        let kind = doc.kind();
        let mut out = TantivyDocument::default();
        out.add_text(f.kind, kind.as_str());

        match doc {
            IndexedDocument::Title { book_id, title } => {
                out.add_u64(f.book_id, book_id);
                out.add_text(f.title, normalize(&title));
            }
            IndexedDocument::Toc {
                toc_id,
                book_id,
                book_title,
                text,
                level,
            } => {
                out.add_u64(f.toc_id, toc_id);
                out.add_u64(f.book_id, book_id);
                out.add_text(f.book_title, book_title);
                out.add_text(f.toc_text, normalize(&text));
                out.add_u64(f.level, level);
            }
            IndexedDocument::Line {
                book_id,
                book_title,
                category_id,
                line_id,
                line_index,
                text_raw,
            } => {
                out.add_u64(f.book_id, book_id);
                out.add_text(f.book_title, book_title);
                out.add_u64(f.category_id, category_id);
                out.add_u64(f.line_id, line_id);
                out.add_u64(f.line_index, line_index);
                out.add_text(f.text, normalize(&text_raw));
                out.add_text(f.text_raw, text_raw);
            }
        }

        self.writer.add_document(out)?;
        Ok(())
    }

    /// Commit queued documents, making them visible to new snapshots.
    pub fn commit(&mut self) -> Result<()> {
        self.writer.commit()?;
        Ok(())
    }
}
