use std::collections::HashMap;
use std::io::{Read, Seek};

use tracing::trace;

use crate::scene::{AbortHandle, Alignment, Chunk, ChunkReader, GroupChunk, Node, Result, SceneError, Tag};

/// Callback that takes over a whole group of a registered group type.
///
/// The reader sits at the group's first child header on entry. Whatever the handler
/// consumes, traversal resumes at the group's end offset afterwards.
pub type GroupHandler<R, C> = fn(&mut Walker<R, C>, &GroupChunk) -> Result<()>;

/// Callback that receives a non-group chunk of a registered tag instead of the stream.
///
/// The reader sits at the chunk's first payload byte on entry.
pub type ChunkHandler<R, C> = fn(&mut Walker<R, C>, &Chunk) -> Result<()>;

/// Fixed mapping from tags to handlers, assembled before traversal starts.
pub struct HandlerTable<R, C> {
	groups: HashMap<Tag, GroupHandler<R, C>>,
	chunks: HashMap<Tag, ChunkHandler<R, C>>,
}

impl<R, C> Default for HandlerTable<R, C> {
	fn default() -> Self {
		Self {
			groups: HashMap::new(),
			chunks: HashMap::new(),
		}
	}
}

impl<R, C> HandlerTable<R, C> {
	/// Create an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Route groups whose group-type tag is `group_type` to `handler`.
	pub fn register_group_handler(&mut self, group_type: Tag, handler: GroupHandler<R, C>) -> &mut Self {
		self.groups.insert(group_type, handler);
		self
	}

	/// Route non-group chunks tagged `tag` to `handler`.
	pub fn register_chunk_handler(&mut self, tag: Tag, handler: ChunkHandler<R, C>) -> &mut Self {
		self.chunks.insert(tag, handler);
		self
	}

	/// Return `true` when no handlers are registered.
	pub fn is_empty(&self) -> bool {
		self.groups.is_empty() && self.chunks.is_empty()
	}
}

/// Format-agnostic decoder for nested length-prefixed chunk streams.
///
/// `C` is caller state that handlers mutate while the walker drives them.
pub struct Walker<R, C> {
	reader: ChunkReader<R>,
	handlers: HandlerTable<R, C>,
	state: C,
	abort: AbortHandle,
	active: Vec<Tag>,
	root: Option<GroupChunk>,
}

impl<R: Read + Seek, C> Walker<R, C> {
	/// Create a walker with no handlers.
	pub fn new(inner: R, state: C) -> Result<Self> {
		Self::with_handlers(inner, state, HandlerTable::new())
	}

	/// Create a walker dispatching to `handlers`.
	pub fn with_handlers(inner: R, state: C, handlers: HandlerTable<R, C>) -> Result<Self> {
		Ok(Self {
			reader: ChunkReader::new(inner)?,
			handlers,
			state,
			abort: AbortHandle::new(),
			active: Vec::new(),
			root: None,
		})
	}

	/// Share cancellation with an externally owned handle.
	pub fn with_abort_handle(mut self, abort: AbortHandle) -> Self {
		self.abort = abort;
		self
	}

	/// Drive the whole stream, requiring the root group type to be `expected_root`.
	pub fn parse(&mut self, expected_root: Tag) -> Result<()> {
		for node in self.stream_expecting(expected_root) {
			node?;
		}
		Ok(())
	}

	/// Lazily yield every chunk not claimed by a handler, depth-first, starting at the root group.
	pub fn stream(&mut self) -> ChunkStream<'_, R, C> {
		ChunkStream::root(self, None)
	}

	/// Like [`stream`](Self::stream), failing unless the root group type is `expected_root`.
	pub fn stream_expecting(&mut self, expected_root: Tag) -> ChunkStream<'_, R, C> {
		ChunkStream::root(self, Some(expected_root))
	}

	/// Lazily yield the descendants of `group`, which must be the group currently being handled.
	pub fn stream_group(&mut self, group: &GroupChunk) -> ChunkStream<'_, R, C> {
		ChunkStream::group(self, group)
	}

	/// Stop traversal before the next chunk header; the sequence then ends without error.
	pub fn abort(&self) {
		self.abort.abort();
	}

	/// Return `true` once traversal has been aborted.
	pub fn is_aborted(&self) -> bool {
		self.abort.is_aborted()
	}

	/// Clone of the cancellation handle.
	pub fn abort_handle(&self) -> AbortHandle {
		self.abort.clone()
	}

	/// Root group header, once the first chunk has been decoded.
	pub fn root(&self) -> Option<&GroupChunk> {
		self.root.as_ref()
	}

	/// Underlying positioned reader.
	pub fn reader(&mut self) -> &mut ChunkReader<R> {
		&mut self.reader
	}

	/// Borrow caller state.
	pub fn state(&self) -> &C {
		&self.state
	}

	/// Mutably borrow caller state.
	pub fn state_mut(&mut self) -> &mut C {
		&mut self.state
	}

	/// Consume the walker and return caller state.
	pub fn into_state(self) -> C {
		self.state
	}

	/// Read a chunk's whole payload as ASCII text, dropping trailing NUL padding.
	pub fn read_text(&mut self, chunk: &Chunk) -> Result<String> {
		self.reader.seek_to(chunk.data_start)?;
		let bytes = self.reader.read_bytes(chunk.data_len)?;
		let trimmed = match bytes.iter().rposition(|byte| *byte != 0) {
			Some(last) => &bytes[..=last],
			None => &[],
		};
		Ok(ascii_lossy(trimmed))
	}

	/// Read the next null-terminated ASCII string inside `chunk`'s payload.
	pub fn read_cstring(&mut self, chunk: &Chunk) -> Result<String> {
		let bytes = self.reader.read_cstring_bytes(chunk.data_end())?;
		Ok(ascii_lossy(&bytes))
	}

	fn group_handler(&self, group_type: Tag) -> Option<GroupHandler<R, C>> {
		if self.active.contains(&group_type) {
			return None;
		}
		self.handlers.groups.get(&group_type).copied()
	}

	fn chunk_handler(&self, tag: Tag) -> Option<ChunkHandler<R, C>> {
		self.handlers.chunks.get(&tag).copied()
	}
}

/// Decode bytes as 7-bit ASCII, mapping anything else to `?`.
fn ascii_lossy(bytes: &[u8]) -> String {
	bytes.iter().map(|byte| if byte.is_ascii() { char::from(*byte) } else { '?' }).collect()
}

#[derive(Debug, Clone, Copy)]
struct Frame {
	alignment: Alignment,
	end: u64,
}

/// Forward-only, non-restartable sequence of chunks over a [`Walker`]'s stream.
///
/// Driven by an explicit group stack; never recurses except through handlers. A child that
/// ends past its enclosing group fails with [`SceneError::ChunkOverrunsParent`].
pub struct ChunkStream<'w, R, C> {
	walker: &'w mut Walker<R, C>,
	stack: Vec<Frame>,
	pending_root: Option<Option<Tag>>,
	resume_at: Option<u64>,
	depth: usize,
	done: bool,
}

impl<'w, R: Read + Seek, C> ChunkStream<'w, R, C> {
	fn root(walker: &'w mut Walker<R, C>, expected: Option<Tag>) -> Self {
		Self {
			walker,
			stack: Vec::new(),
			pending_root: Some(expected),
			resume_at: Some(0),
			depth: 0,
			done: false,
		}
	}

	fn group(walker: &'w mut Walker<R, C>, group: &GroupChunk) -> Self {
		Self {
			walker,
			stack: vec![Frame {
				alignment: group.alignment,
				end: group.end(),
			}],
			pending_root: None,
			resume_at: Some(group.children_start()),
			depth: 0,
			done: false,
		}
	}

	/// Walker driving this stream, for reading the payload of the last yielded chunk.
	pub fn walker(&mut self) -> &mut Walker<R, C> {
		&mut *self.walker
	}

	/// Number of enclosing groups around the last yielded node (the root is depth 0).
	pub fn depth(&self) -> usize {
		self.depth
	}

	fn advance(&mut self) -> Result<Option<Node>> {
		if let Some(offset) = self.resume_at.take() {
			self.walker.reader.seek_to(offset)?;
		}

		if let Some(expected) = self.pending_root.take() {
			if self.walker.is_aborted() {
				return Ok(None);
			}
			let root = decode_root(&mut self.walker.reader, expected)?;
			self.walker.root = Some(root.clone());
			if let Some(node) = self.enter_group(root, 0)? {
				return Ok(Some(node));
			}
		}

		loop {
			if self.walker.is_aborted() {
				return Ok(None);
			}

			let Some(frame) = self.stack.last().copied() else {
				return Ok(None);
			};
			if self.walker.reader.pos() >= frame.end {
				self.stack.pop();
				self.walker.reader.seek_to(frame.end)?;
				continue;
			}

			let depth = self.stack.len();
			let at = self.walker.reader.pos();
			let node = decode_header(&mut self.walker.reader, frame.alignment)?;
			if node.end() > frame.end {
				return Err(SceneError::ChunkOverrunsParent {
					tag: node.tag(),
					at,
					end: node.end(),
					parent_end: frame.end,
				});
			}
			match node {
				Node::Group(group) => {
					if let Some(node) = self.enter_group(group, depth)? {
						return Ok(Some(node));
					}
				}
				Node::Chunk(chunk) => {
					if let Some(handler) = self.walker.chunk_handler(chunk.tag) {
						trace!(tag = %chunk.tag, offset = chunk.data_start, "dispatching chunk handler");
						handler(&mut *self.walker, &chunk)?;
						self.walker.reader.seek_to(chunk.end())?;
						continue;
					}
					self.resume_at = Some(chunk.end());
					self.depth = depth;
					return Ok(Some(Node::Chunk(chunk)));
				}
			}
		}
	}

	fn enter_group(&mut self, group: GroupChunk, depth: usize) -> Result<Option<Node>> {
		if let Some(handler) = self.walker.group_handler(group.group_type) {
			trace!(group_type = %group.group_type, offset = group.data_start, "dispatching group handler");
			self.walker.active.push(group.group_type);
			let outcome = handler(&mut *self.walker, &group);
			self.walker.active.pop();
			outcome?;
			self.walker.reader.seek_to(group.end())?;
			return Ok(None);
		}

		self.stack.push(Frame {
			alignment: group.alignment,
			end: group.end(),
		});
		self.resume_at = Some(group.children_start());
		self.depth = depth;
		Ok(Some(Node::Group(group)))
	}
}

impl<R: Read + Seek, C> Iterator for ChunkStream<'_, R, C> {
	type Item = Result<Node>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}

		match self.advance() {
			Ok(Some(node)) => Some(Ok(node)),
			Ok(None) => {
				self.done = true;
				None
			}
			Err(err) => {
				self.done = true;
				Some(Err(err))
			}
		}
	}
}

fn decode_root<R: Read + Seek>(reader: &mut ChunkReader<R>, expected: Option<Tag>) -> Result<GroupChunk> {
	let at = reader.pos();
	let tag = read_valid_tag(reader)?;
	let Some(alignment) = tag.group_alignment() else {
		return Err(SceneError::RootNotGroup { tag });
	};

	let Node::Group(root) = finish_header(reader, tag, at, alignment)? else {
		return Err(SceneError::RootNotGroup { tag });
	};
	if let Some(expected) = expected {
		if root.group_type != expected {
			return Err(SceneError::RootTypeMismatch {
				expected,
				got: root.group_type,
			});
		}
	}
	Ok(root)
}

/// Decode one chunk header using the alignment of the enclosing group.
fn decode_header<R: Read + Seek>(reader: &mut ChunkReader<R>, alignment: Alignment) -> Result<Node> {
	let at = reader.pos();
	let tag = read_valid_tag(reader)?;
	finish_header(reader, tag, at, alignment)
}

fn finish_header<R: Read + Seek>(reader: &mut ChunkReader<R>, tag: Tag, at: u64, alignment: Alignment) -> Result<Node> {
	let data_len = match alignment {
		Alignment::Eight => {
			reader.skip(4)?;
			reader.read_u64_be()?
		}
		Alignment::Two | Alignment::Four => u64::from(reader.read_u32_be()?),
	};
	let data_start = reader.pos();
	let stream_len = reader.len();
	let out_of_range = || SceneError::ChunkOutOfRange {
		tag,
		at,
		len: data_len,
		stream_len,
	};

	let Some(group_alignment) = tag.group_alignment() else {
		let chunk = Chunk {
			tag,
			alignment,
			data_start,
			data_len,
		};
		if chunk.end() > stream_len {
			return Err(out_of_range());
		}
		return Ok(Node::Chunk(chunk));
	};

	if data_len < 4 {
		return Err(SceneError::GroupTooShort { tag, at, len: data_len });
	}
	if data_start.saturating_add(data_len) > stream_len {
		return Err(out_of_range());
	}
	let group_type = read_valid_tag(reader)?;
	Ok(Node::Group(GroupChunk {
		tag,
		group_type,
		alignment: group_alignment,
		data_start,
		data_len,
		children: Vec::new(),
	}))
}

fn read_valid_tag<R: Read + Seek>(reader: &mut ChunkReader<R>) -> Result<Tag> {
	let at = reader.pos();
	let tag = reader.read_tag()?;
	if !tag.is_printable() {
		return Err(SceneError::InvalidTag { at, tag: tag.bytes() });
	}
	Ok(tag)
}
