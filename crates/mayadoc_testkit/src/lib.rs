//! Shared test helpers for workspace crates.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Builder for nested IFF chunk streams with per-group alignment and padding.
///
/// Headers use the alignment of the enclosing group (or the root tag's own alignment),
/// so `FOR8` trees get 64-bit lengths and every leaf is zero-padded.
#[derive(Default)]
pub struct IffWriter {
	buf: Vec<u8>,
	open: Vec<OpenGroup>,
}

struct OpenGroup {
	len_at: usize,
	wide: bool,
	data_start: usize,
	alignment: usize,
}

impl IffWriter {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Open a group chunk; children follow until [`end`](Self::end).
	pub fn group(&mut self, tag: &[u8; 4], group_type: &[u8; 4]) -> &mut Self {
		let alignment = group_alignment(tag).unwrap_or_else(|| panic!("{:?} is not a group tag", String::from_utf8_lossy(tag)));
		let header_alignment = self.open.last().map_or(alignment, |group| group.alignment);
		let len_at = self.write_header(tag, header_alignment);
		let data_start = self.buf.len();
		self.buf.extend_from_slice(group_type);
		self.open.push(OpenGroup {
			len_at,
			wide: header_alignment == 8,
			data_start,
			alignment,
		});
		self
	}

	/// Close the innermost open group and patch its length.
	pub fn end(&mut self) -> &mut Self {
		let group = self.open.pop().expect("no open group to end");
		let len = self.buf.len() - group.data_start;
		self.patch_len(group.len_at, group.wide, len);
		self
	}

	/// Append a leaf chunk, padded to the enclosing group's alignment.
	pub fn chunk(&mut self, tag: &[u8; 4], data: &[u8]) -> &mut Self {
		let alignment = self.open.last().expect("leaf chunks need an enclosing group").alignment;
		let len_at = self.write_header(tag, alignment);
		self.patch_len(len_at, alignment == 8, data.len());
		self.buf.extend_from_slice(data);
		let padded = data.len().div_ceil(alignment) * alignment;
		self.buf.resize(self.buf.len() + (padded - data.len()), 0);
		self
	}

	/// Append raw bytes without any framing.
	pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
		self.buf.extend_from_slice(bytes);
		self
	}

	/// Close all open groups and return the encoded stream.
	pub fn finish(&mut self) -> Vec<u8> {
		while !self.open.is_empty() {
			self.end();
		}
		std::mem::take(&mut self.buf)
	}

	fn write_header(&mut self, tag: &[u8; 4], alignment: usize) -> usize {
		self.buf.extend_from_slice(tag);
		if alignment == 8 {
			self.buf.extend_from_slice(&[0_u8; 4]);
			let at = self.buf.len();
			self.buf.extend_from_slice(&[0_u8; 8]);
			at
		} else {
			let at = self.buf.len();
			self.buf.extend_from_slice(&[0_u8; 4]);
			at
		}
	}

	fn patch_len(&mut self, at: usize, wide: bool, len: usize) {
		if wide {
			self.buf[at..at + 8].copy_from_slice(&(len as u64).to_be_bytes());
		} else {
			self.buf[at..at + 4].copy_from_slice(&(len as u32).to_be_bytes());
		}
	}
}

fn group_alignment(tag: &[u8; 4]) -> Option<usize> {
	match tag {
		b"FORM" | b"LIST" | b"CAT " | b"PROP" => Some(2),
		b"FOR4" | b"LIS4" | b"CAT4" | b"PRO4" => Some(4),
		b"FOR8" | b"LIS8" | b"CAT8" | b"PRO8" => Some(8),
		_ => None,
	}
}

/// Encode `value` followed by a NUL terminator.
pub fn cstr(value: &str) -> Vec<u8> {
	let mut out = value.as_bytes().to_vec();
	out.push(0);
	out
}

/// Encode a key/value record as two consecutive null-terminated strings.
pub fn cstr_pair(key: &str, value: &str) -> Vec<u8> {
	let mut out = cstr(key);
	out.extend_from_slice(&cstr(value));
	out
}

/// Binary scene with a full header, both reference groups, a node marker, and a decoy header after it.
///
/// `form` selects the group variant used throughout (`FOR4` or `FOR8`).
pub fn sample_binary_scene(form: &[u8; 4]) -> Vec<u8> {
	let mut depth_record = 1_i32.to_be_bytes().to_vec();
	depth_record.extend_from_slice(&cstr("C:/assets/nested.mb"));

	IffWriter::new()
		.group(form, b"Maya")
		.group(form, b"HEAD")
		.chunk(b"VERS", b"2020")
		.chunk(b"UVER", b"undef")
		.chunk(b"MADE", b"undef")
		.chunk(b"CHNG", b"Mon Jan 06 10:00:00 2020")
		.chunk(b"ICON", b"undef")
		.chunk(b"INFO", b"undef")
		.chunk(b"OBJN", b"undef")
		.chunk(b"INCL", b"undef")
		.chunk(b"LUNI", b"cm")
		.chunk(b"TUNI", b"film")
		.chunk(b"AUNI", b"deg")
		.chunk(b"FINF", &cstr_pair("product", "Maya 2020"))
		.chunk(b"FINF", &cstr_pair("version", "2020"))
		.chunk(b"PLUG", &cstr_pair("stereoCamera", "10.0"))
		.end()
		.group(form, b"FREF")
		.chunk(b"FREF", &cstr("C:/assets/cube.mb"))
		.chunk(b"FREF", &cstr("C:/assets/cube.mb"))
		.end()
		.group(form, b"FRDI")
		.chunk(b"FRDI", &depth_record)
		.end()
		.group(form, b"XFRM")
		.chunk(b"CREA", &cstr("pCube1"))
		.end()
		.group(form, b"HEAD")
		.chunk(b"VERS", b"9999")
		.end()
		.finish()
}

/// Text scene matching [`sample_binary_scene`]'s metadata.
pub fn sample_ascii_scene() -> String {
	[
		"//Maya ASCII 2020 scene",
		"//Name: sample.ma",
		"//Last modified: Mon, Jan 06, 2020 10:00:00 AM",
		"//Codeset: 1252",
		"file -rdi 1 -ns \"nested\" -rfn \"nestedRN\" \"C:/assets/nested.mb\";",
		"file -r -ns \"cube\" -dr 1 -rfn \"cubeRN\" \"C:/assets/cube.mb\";",
		"file -r -ns \"cube1\" -dr 1 -rfn \"cubeRN1\" \"C:/assets/cube.mb\";",
		"requires maya \"2020\";",
		"requires \"stereoCamera\" \"10.0\";",
		"currentUnit -l centimeter -a degree -t film;",
		"fileInfo \"application\" \"maya\";",
		"fileInfo \"product\" \"Maya 2020\";",
		"fileInfo \"version\" \"2020\";",
		"createNode transform -n \"pCube1\";",
		"requires maya \"9999\";",
		"",
	]
	.join("\n")
}

/// Temporary directory holding generated fixture files.
pub struct Fixtures {
	dir: TempDir,
}

impl Fixtures {
	/// Create a fresh temporary directory.
	pub fn new() -> Self {
		Self {
			dir: tempfile::tempdir().expect("temp dir is created"),
		}
	}

	/// Write `bytes` to `name` inside the directory and return its path.
	pub fn write(&self, name: &str, bytes: impl AsRef<[u8]>) -> PathBuf {
		let path = self.path(name);
		fs::write(&path, bytes).expect("fixture is written");
		path
	}

	/// Path of `name` inside the directory, whether or not it exists.
	pub fn path(&self, name: &str) -> PathBuf {
		self.dir.path().join(name)
	}
}

impl Default for Fixtures {
	fn default() -> Self {
		Self::new()
	}
}
