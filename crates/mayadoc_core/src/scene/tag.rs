use std::fmt;
use std::str::FromStr;

use crate::scene::Alignment;

/// Four-byte chunk identity as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub [u8; 4]);

impl Tag {
	/// 2-byte-aligned FORM group.
	pub const FORM: Self = Self(*b"FORM");
	/// 4-byte-aligned FORM group.
	pub const FOR4: Self = Self(*b"FOR4");
	/// 8-byte-aligned FORM group.
	pub const FOR8: Self = Self(*b"FOR8");
	/// 2-byte-aligned LIST group.
	pub const LIST: Self = Self(*b"LIST");
	/// 4-byte-aligned LIST group.
	pub const LIS4: Self = Self(*b"LIS4");
	/// 8-byte-aligned LIST group.
	pub const LIS8: Self = Self(*b"LIS8");
	/// 2-byte-aligned CAT group.
	pub const CAT: Self = Self(*b"CAT ");
	/// 4-byte-aligned CAT group.
	pub const CAT4: Self = Self(*b"CAT4");
	/// 8-byte-aligned CAT group.
	pub const CAT8: Self = Self(*b"CAT8");
	/// 2-byte-aligned PROP group.
	pub const PROP: Self = Self(*b"PROP");
	/// 4-byte-aligned PROP group.
	pub const PRO4: Self = Self(*b"PRO4");
	/// 8-byte-aligned PROP group.
	pub const PRO8: Self = Self(*b"PRO8");

	/// Build a tag from a byte-string literal.
	pub const fn new(bytes: &[u8; 4]) -> Self {
		Self(*bytes)
	}

	/// Return the raw tag bytes.
	pub fn bytes(self) -> [u8; 4] {
		self.0
	}

	/// Return `true` when every byte is printable ASCII or a space.
	pub fn is_printable(self) -> bool {
		self.0.iter().all(|byte| byte.is_ascii_graphic() || *byte == b' ')
	}

	/// Return `true` for any of the twelve group-chunk tags.
	pub fn is_group(self) -> bool {
		self.group_alignment().is_some()
	}

	/// Alignment a group of this tag imposes on its children.
	pub fn group_alignment(self) -> Option<Alignment> {
		match self {
			Self::FORM | Self::LIST | Self::CAT | Self::PROP => Some(Alignment::Two),
			Self::FOR4 | Self::LIS4 | Self::CAT4 | Self::PRO4 => Some(Alignment::Four),
			Self::FOR8 | Self::LIS8 | Self::CAT8 | Self::PRO8 => Some(Alignment::Eight),
			_ => None,
		}
	}

	/// Render as printable label, replacing non-printable bytes with `.`.
	pub fn label(self) -> String {
		let mut out = String::with_capacity(4);
		for byte in self.0 {
			if byte.is_ascii_graphic() || byte == b' ' {
				out.push(char::from(byte));
			} else {
				out.push('.');
			}
		}
		out
	}
}

impl fmt::Display for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.label())
	}
}

/// Error returned when a string is not exactly four ASCII characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError {
	/// Rejected input.
	pub input: String,
}

impl fmt::Display for ParseTagError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "chunk tags must be four ascii characters: {:?}", self.input)
	}
}

impl std::error::Error for ParseTagError {}

impl FromStr for Tag {
	type Err = ParseTagError;

	fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
		let reject = || ParseTagError { input: value.to_owned() };
		if !value.is_ascii() {
			return Err(reject());
		}
		let bytes: [u8; 4] = value.as_bytes().try_into().map_err(|_| reject())?;
		Ok(Self(bytes))
	}
}
