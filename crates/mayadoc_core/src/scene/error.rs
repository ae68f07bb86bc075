use thiserror::Error;

use crate::scene::Tag;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Coarse failure category for [`SceneError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Bad signature, malformed chunk geometry, or truncated stream.
	Format,
	/// Missing, unreadable, or locked file.
	Io,
	/// Declared codepage is unknown or unusable.
	Encoding,
	/// File extension does not select any extractor.
	Unsupported,
}

impl ErrorKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Format => "format",
			Self::Io => "io",
			Self::Encoding => "encoding",
			Self::Unsupported => "unsupported",
		}
	}
}

/// Errors produced while walking chunk containers and extracting scene summaries.
#[derive(Debug, Error)]
pub enum SceneError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: u64,
		/// Requested bytes.
		need: u64,
		/// Bytes still available.
		rem: u64,
	},
	/// Chunk tag contained bytes outside printable ASCII.
	#[error("invalid chunk tag {tag:?} at offset {at}")]
	InvalidTag {
		/// Offset of the tag bytes.
		at: u64,
		/// Raw tag bytes.
		tag: [u8; 4],
	},
	/// Declared chunk length runs past the end of the stream.
	#[error("chunk {tag} at offset {at} with length {len} exceeds stream length {stream_len}")]
	ChunkOutOfRange {
		/// Chunk tag.
		tag: Tag,
		/// Offset of the chunk header.
		at: u64,
		/// Declared data length.
		len: u64,
		/// Total stream length.
		stream_len: u64,
	},
	/// Chunk extends past the end of the group that contains it.
	#[error("chunk {tag} at offset {at} ends at {end}, past its parent group end {parent_end}")]
	ChunkOverrunsParent {
		/// Chunk tag.
		tag: Tag,
		/// Offset of the chunk header.
		at: u64,
		/// End offset of the chunk, including padding.
		end: u64,
		/// End offset of the enclosing group.
		parent_end: u64,
	},
	/// Group chunk declared a length too small to hold its group-type tag.
	#[error("group {tag} at offset {at} declares length {len}, need at least 4")]
	GroupTooShort {
		/// Group tag.
		tag: Tag,
		/// Offset of the chunk header.
		at: u64,
		/// Declared data length.
		len: u64,
	},
	/// First chunk of the stream is not a group.
	#[error("stream must start with a group chunk, got {tag}")]
	RootNotGroup {
		/// Tag of the first chunk.
		tag: Tag,
	},
	/// Root group type did not match the expected format marker.
	#[error("wrong file type: expected root group type {expected}, got {got}")]
	RootTypeMismatch {
		/// Expected group type.
		expected: Tag,
		/// Actual group type.
		got: Tag,
	},
	/// Null-terminated string ran to the end of its chunk without a terminator.
	#[error("unterminated string at offset {at} (chunk ends at {end})")]
	UnterminatedString {
		/// Offset where the string started.
		at: u64,
		/// End offset of the enclosing chunk data.
		end: u64,
	},
	/// Text scene did not start with the required signature line.
	#[error("maya ascii files need to start with {expected:?}")]
	MissingSignature {
		/// Required line prefix.
		expected: &'static str,
	},
	/// `codeset` directive named a codepage with no known encoding.
	#[error("unknown codepage {codepage}")]
	UnknownCodepage {
		/// Declared codepage number.
		codepage: i64,
	},
	/// Codepage maps to an encoding that cannot be read line by line.
	#[error("codepage {codepage} ({name}) is not ascii-compatible")]
	UnsupportedEncoding {
		/// Declared codepage number.
		codepage: u16,
		/// Encoding label.
		name: &'static str,
	},
	/// Encoding restarts exceeded the configured cap.
	#[error("encoding restart limit exceeded (max={max})")]
	RestartLimit {
		/// Configured restart ceiling.
		max: usize,
	},
	/// File extension does not select an extractor.
	#[error("unsupported scene file extension: {path}")]
	UnsupportedExtension {
		/// Offending path.
		path: String,
	},
}

impl SceneError {
	/// Reduce this error to its failure category.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Io(_) => ErrorKind::Io,
			Self::UnknownCodepage { .. } | Self::UnsupportedEncoding { .. } | Self::RestartLimit { .. } => ErrorKind::Encoding,
			Self::UnsupportedExtension { .. } => ErrorKind::Unsupported,
			Self::UnexpectedEof { .. }
			| Self::InvalidTag { .. }
			| Self::ChunkOutOfRange { .. }
			| Self::ChunkOverrunsParent { .. }
			| Self::GroupTooShort { .. }
			| Self::RootNotGroup { .. }
			| Self::RootTypeMismatch { .. }
			| Self::UnterminatedString { .. }
			| Self::MissingSignature { .. } => ErrorKind::Format,
		}
	}
}
