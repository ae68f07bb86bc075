use crate::scene::Tag;

/// Byte boundary a non-group chunk's end offset is padded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
	/// `FORM`, `LIST`, `CAT `, `PROP`.
	Two,
	/// `FOR4`, `LIS4`, `CAT4`, `PRO4`.
	Four,
	/// `FOR8`, `LIS8`, `CAT8`, `PRO8`; chunk headers carry 64-bit lengths.
	Eight,
}

impl Alignment {
	/// Alignment in bytes.
	pub fn bytes(self) -> u64 {
		match self {
			Self::Two => 2,
			Self::Four => 4,
			Self::Eight => 8,
		}
	}

	/// Round `value` up to this alignment.
	pub fn align_up(self, value: u64) -> u64 {
		align_up(value, self.bytes())
	}
}

/// Round `value` up to the next multiple of `alignment`, leaving exact multiples unchanged.
///
/// An alignment of zero leaves `value` unchanged.
pub fn align_up(value: u64, alignment: u64) -> u64 {
	match value.checked_rem(alignment) {
		None | Some(0) => value,
		Some(rem) => value.saturating_add(alignment - rem),
	}
}

/// One decoded non-group chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
	/// Four-byte chunk tag.
	pub tag: Tag,
	/// Alignment inherited from the enclosing group.
	pub alignment: Alignment,
	/// Absolute offset of the first payload byte.
	pub data_start: u64,
	/// Declared payload length, excluding padding.
	pub data_len: u64,
}

impl Chunk {
	/// Offset one past the last payload byte.
	pub fn data_end(&self) -> u64 {
		self.data_start.saturating_add(self.data_len)
	}

	/// Offset of the next sibling header, including padding.
	pub fn end(&self) -> u64 {
		self.data_start.saturating_add(self.alignment.align_up(self.data_len))
	}
}

/// One decoded group chunk and, once materialized, its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupChunk {
	/// Group tag (`FORM`, `FOR4`, `LIS8`, ...).
	pub tag: Tag,
	/// Inner group-type tag stored as the first four payload bytes.
	pub group_type: Tag,
	/// Alignment this group imposes on its descendants.
	pub alignment: Alignment,
	/// Absolute offset of the first payload byte (the group-type tag).
	pub data_start: u64,
	/// Declared payload length, including the group-type tag.
	pub data_len: u64,
	/// Child chunks in file order.
	///
	/// Streaming leaves this empty; [`read_tree`](crate::scene::read_tree) fills it.
	pub children: Vec<Node>,
}

impl GroupChunk {
	/// Offset of the first child header.
	pub fn children_start(&self) -> u64 {
		self.data_start.saturating_add(4)
	}

	/// Offset one past the group's last byte; groups carry no outer padding.
	pub fn end(&self) -> u64 {
		self.data_start.saturating_add(self.data_len)
	}
}

/// Either kind of decoded chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	/// Leaf chunk.
	Chunk(Chunk),
	/// Group chunk.
	Group(GroupChunk),
}

impl Node {
	/// Chunk tag.
	pub fn tag(&self) -> Tag {
		match self {
			Self::Chunk(chunk) => chunk.tag,
			Self::Group(group) => group.tag,
		}
	}

	/// Absolute payload start offset.
	pub fn data_start(&self) -> u64 {
		match self {
			Self::Chunk(chunk) => chunk.data_start,
			Self::Group(group) => group.data_start,
		}
	}

	/// Offset of the next sibling header.
	pub fn end(&self) -> u64 {
		match self {
			Self::Chunk(chunk) => chunk.end(),
			Self::Group(group) => group.end(),
		}
	}

	/// Borrow as a group when this node is one.
	pub fn as_group(&self) -> Option<&GroupChunk> {
		match self {
			Self::Group(group) => Some(group),
			Self::Chunk(_) => None,
		}
	}
}
