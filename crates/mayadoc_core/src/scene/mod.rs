mod abort;
mod ascii;
mod binary;
mod bytes;
mod chunk;
mod error;
mod open;
mod options;
mod summary;
mod tag;
mod tree;
mod walker;

/// Shared cooperative cancellation flag.
pub use abort::AbortHandle;
/// Text scene extractor and its line tokenizer.
pub use ascii::{DEFAULT_CODEPAGE, SIGNATURE, encoding_for, extract_text, tokenize};
/// Binary scene extractor, its handler table, and the tags it reacts to.
pub use binary::{FRDI, FREF, HEAD, MAYA, XFRM, extract_binary, scene_handlers};
/// Bounded big-endian reader over a seekable stream.
pub use bytes::ChunkReader;
/// Chunk header records and alignment rules.
pub use chunk::{Alignment, Chunk, GroupChunk, Node, align_up};
/// Error and result aliases.
pub use error::{ErrorKind, Result, SceneError};
/// Path-based entry points that pick an extractor by extension.
pub use open::{summarize, try_summarize};
/// Extraction tunables.
pub use options::ExtractOptions;
/// Summary record and file statistics.
pub use summary::{FileStat, SceneKind, SceneSummary, format_kb_size};
/// Four-byte chunk identifiers.
pub use tag::{ParseTagError, Tag};
/// Materialized chunk hierarchy.
pub use tree::{ChunkTree, read_tree};
/// Container walker, handler registry, and streaming iterator.
pub use walker::{ChunkHandler, ChunkStream, GroupHandler, HandlerTable, Walker};
