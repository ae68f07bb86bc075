use std::io::{Read, Seek, SeekFrom};

use crate::scene::{Result, SceneError, Tag};

/// Bounded big-endian reader over a seekable byte stream.
///
/// Tracks its own position so bounds checks never need a seek round-trip.
pub struct ChunkReader<R> {
	inner: R,
	pos: u64,
	len: u64,
}

impl<R: Read + Seek> ChunkReader<R> {
	/// Wrap `inner`, measuring its length and rewinding to offset 0.
	pub fn new(mut inner: R) -> Result<Self> {
		let len = inner.seek(SeekFrom::End(0))?;
		inner.seek(SeekFrom::Start(0))?;
		Ok(Self { inner, pos: 0, len })
	}

	/// Return current byte offset.
	pub fn pos(&self) -> u64 {
		self.pos
	}

	/// Return total stream length.
	pub fn len(&self) -> u64 {
		self.len
	}

	/// Return `true` when the stream holds no bytes.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> u64 {
		self.len.saturating_sub(self.pos)
	}

	/// Move to absolute `offset`, which may equal the stream length.
	pub fn seek_to(&mut self, offset: u64) -> Result<()> {
		if offset > self.len {
			return Err(SceneError::UnexpectedEof {
				at: self.pos,
				need: offset - self.pos,
				rem: self.remaining(),
			});
		}
		if offset != self.pos {
			self.inner.seek(SeekFrom::Start(offset))?;
			self.pos = offset;
		}
		Ok(())
	}

	/// Skip `n` bytes forward.
	pub fn skip(&mut self, n: u64) -> Result<()> {
		self.ensure(n)?;
		self.seek_to(self.pos + n)
	}

	/// Read exactly `n` bytes and advance.
	pub fn read_bytes(&mut self, n: u64) -> Result<Vec<u8>> {
		self.ensure(n)?;
		let mut out = vec![0_u8; n as usize];
		self.inner.read_exact(&mut out)?;
		self.pos += n;
		Ok(out)
	}

	/// Read a four-byte tag without validating it.
	pub fn read_tag(&mut self) -> Result<Tag> {
		Ok(Tag(self.read_array::<4>()?))
	}

	/// Read a big-endian `u32`.
	pub fn read_u32_be(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_array::<4>()?))
	}

	/// Read a big-endian `i32`.
	pub fn read_i32_be(&mut self) -> Result<i32> {
		Ok(i32::from_be_bytes(self.read_array::<4>()?))
	}

	/// Read a big-endian `u64`.
	pub fn read_u64_be(&mut self) -> Result<u64> {
		Ok(u64::from_be_bytes(self.read_array::<8>()?))
	}

	/// Read a zero-terminated byte string without the terminator.
	///
	/// The terminator must appear before `end`; the cursor is left just past it.
	pub fn read_cstring_bytes(&mut self, end: u64) -> Result<Vec<u8>> {
		let start = self.pos;
		let end = end.min(self.len);
		let mut out = Vec::new();
		let mut byte = [0_u8; 1];
		while self.pos < end {
			self.inner.read_exact(&mut byte)?;
			self.pos += 1;
			if byte[0] == 0 {
				return Ok(out);
			}
			out.push(byte[0]);
		}
		Err(SceneError::UnterminatedString { at: start, end })
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		self.ensure(N as u64)?;
		let mut out = [0_u8; N];
		self.inner.read_exact(&mut out)?;
		self.pos += N as u64;
		Ok(out)
	}

	fn ensure(&self, n: u64) -> Result<()> {
		if n > self.remaining() {
			return Err(SceneError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}
		Ok(())
	}
}
