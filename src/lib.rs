//! # Otzar
//!
//! Search layer for a large Hebrew-language text corpus: books, categories,
//! table-of-contents entries, and lines, indexed into partitions of a single
//! tantivy index and served through three query shapes:
//!
//! - type-ahead prefix search over book titles,
//! - type-ahead prefix search over TOC labels,
//! - scoped or unscoped proximity full-text search over line bodies,
//!   exposed as a deduplicated, paginated, snippet-highlighted page stream.
//!
//! Index calls are synchronous and open a scoped read snapshot per call;
//! invoke them off the caller's primary thread. The normalizer and snippet
//! builder are pure and freely parallel; a [`SearchResultPager`] serves one
//! session and must not see overlapping loads.

pub mod analysis;
mod content;
mod error;
mod index;
mod lookup;
mod pager;
mod schema;
pub mod snippet;

pub use content::{ContentIndex, LineHit, SearchScope};
pub use error::{OtzarError, Result};
pub use index::{CorpusIndex, CorpusWriter};
pub use lookup::{LookupIndex, TocHit};
pub use pager::{resolve_refresh_key, Page, PagerState, SearchResultPager};
pub use schema::{CorpusSchema, DocKind, IndexedDocument};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
