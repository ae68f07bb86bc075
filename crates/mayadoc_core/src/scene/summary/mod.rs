use std::fmt;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};

/// Serialization a summary was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
	/// Line-oriented `.ma` scene.
	Ascii,
	/// Chunked `.mb` scene with 2- or 4-byte-aligned groups.
	Binary32,
	/// Chunked `.mb` scene with 8-byte-aligned groups.
	Binary64,
}

impl SceneKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Ascii => "ascii",
			Self::Binary32 => "binary32",
			Self::Binary64 => "binary64",
		}
	}

	/// Human-readable file type.
	pub fn display_name(self) -> &'static str {
		match self {
			Self::Ascii => "Maya Ascii File",
			Self::Binary32 => "Maya Binary File (32 bit)",
			Self::Binary64 => "Maya Binary File (64 bit)",
		}
	}
}

/// Filesystem facts attached by [`summarize`](crate::scene::summarize), independent of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
	/// File name with extension.
	pub name: String,
	/// Absolute containing directory.
	pub folder: String,
	/// Size in bytes.
	pub size: u64,
}

impl FileStat {
	/// Describe `path` with a known byte size.
	pub fn new(path: &Path, size: u64) -> Self {
		let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
		Self {
			name: absolute.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default(),
			folder: absolute.parent().map(|parent| parent.display().to_string()).unwrap_or_default(),
			size,
		}
	}

	/// Size rendered in whole kilobytes, rounded up, with thousands separators (`"1,234 KB"`).
	pub fn display_size(&self) -> String {
		format_kb_size(self.size)
	}
}

/// Render a byte count in whole kilobytes, rounded up.
pub fn format_kb_size(bytes: u64) -> String {
	let kb = bytes.div_ceil(1024).to_string();
	let mut out = String::with_capacity(kb.len() + kb.len() / 3 + 3);
	for (index, digit) in kb.chars().enumerate() {
		if index > 0 && (kb.len() - index) % 3 == 0 {
			out.push(',');
		}
		out.push(digit);
	}
	out.push_str(" KB");
	out
}

/// Header-level metadata of one scene file.
///
/// Built empty, filled by exactly one extractor, then handed out by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneSummary {
	/// Serialization the summary came from.
	pub kind: Option<SceneKind>,
	/// Application version that saved the file.
	pub version: Option<String>,
	/// Linear unit name.
	pub distance_unit: Option<String>,
	/// Angular unit name.
	pub angle_unit: Option<String>,
	/// Time unit name.
	pub time_unit: Option<String>,
	/// Last-saved stamp, verbatim.
	pub last_saved: Option<String>,
	/// `fileInfo` entries; later writes replace earlier values in place.
	pub file_info: IndexMap<String, String>,
	/// Required plugin name to version.
	pub plugins: IndexMap<String, String>,
	/// Referenced scene paths, unique, in first-seen order.
	pub references: IndexSet<String>,
	/// Filesystem facts, present only on summaries returned by the dispatch facade.
	pub file: Option<FileStat>,
}

const TIME_UNIT_FPS: &[(&str, u32)] = &[
	("game", 15),
	("film", 24),
	("pal", 25),
	("ntsc", 25),
	("show", 48),
	("palf", 50),
	("ntscf", 60),
];

const DISTANCE_UNIT_NAMES: &[(&str, &str)] = &[
	("mm", "millimeter"),
	("cm", "centimeter"),
	("m", "meter"),
	("km", "kilometer"),
	("in", "inch"),
	("ft", "foot"),
	("yd", "yard"),
	("mi", "mile"),
];

const ANGLE_UNIT_NAMES: &[(&str, &str)] = &[("deg", "degree"), ("rad", "radian")];

impl SceneSummary {
	/// Create an empty summary for `kind`.
	pub fn new(kind: SceneKind) -> Self {
		Self {
			kind: Some(kind),
			..Self::default()
		}
	}

	/// Add a reference path unless an identical one is already present.
	///
	/// Returns `true` when the path was new.
	pub fn add_reference(&mut self, path: impl Into<String>) -> bool {
		self.references.insert(path.into())
	}

	/// Set a `fileInfo` entry, replacing any previous value for `key`.
	pub fn set_file_info(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.file_info.insert(key.into(), value.into());
	}

	/// Set a required plugin version, replacing any previous value for `name`.
	pub fn set_plugin(&mut self, name: impl Into<String>, version: impl Into<String>) {
		self.plugins.insert(name.into(), version.into());
	}

	/// Whether the file was saved by a preview (beta) build.
	pub fn is_beta(&self) -> bool {
		self.file_info.get("version").is_some_and(|version| version.to_lowercase().contains("preview"))
	}

	/// Product string, suffixed with `(Beta)` for preview builds.
	pub fn product(&self) -> String {
		match self.file_info.get("product") {
			Some(product) if self.is_beta() => format!("{product} (Beta)"),
			Some(product) => product.clone(),
			None => "Unknown".to_owned(),
		}
	}

	/// Version string used to pick a matching application install.
	///
	/// Preview builds use the first four-digit run of the product name, then the
	/// `fileInfo` version, then the first four characters of the header version.
	pub fn install_version(&self) -> String {
		if self.is_beta() {
			if let Some(year) = self.file_info.get("product").and_then(|product| first_four_digit_run(product)) {
				return year.to_owned();
			}
		}
		if let Some(version) = self.file_info.get("version") {
			return version.clone();
		}
		self.version
			.as_deref()
			.and_then(|version| version.get(..4))
			.map_or_else(|| "Unknown".to_owned(), str::to_owned)
	}

	/// Distance unit expanded from its short name where known.
	pub fn display_distance_unit(&self) -> Option<String> {
		self.distance_unit.as_deref().map(|unit| lookup(DISTANCE_UNIT_NAMES, unit).unwrap_or(unit).to_owned())
	}

	/// Angle unit expanded from its short name where known.
	pub fn display_angle_unit(&self) -> Option<String> {
		self.angle_unit.as_deref().map(|unit| lookup(ANGLE_UNIT_NAMES, unit).unwrap_or(unit).to_owned())
	}

	/// Time unit with its frame rate where known (`"24fps (film)"`).
	pub fn display_time_unit(&self) -> Option<String> {
		self.time_unit.as_deref().map(|unit| match TIME_UNIT_FPS.iter().find(|(name, _)| *name == unit) {
			Some((_, fps)) => format!("{fps}fps ({unit})"),
			None => unit.to_owned(),
		})
	}
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
	table.iter().find(|(name, _)| *name == key).map(|(_, value)| *value)
}

fn first_four_digit_run(text: &str) -> Option<&str> {
	let bytes = text.as_bytes();
	bytes
		.windows(4)
		.position(|window| window.iter().all(u8::is_ascii_digit))
		.map(|start| &text[start..start + 4])
}

impl fmt::Display for SceneSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(file) = &self.file {
			writeln!(f, "Name: {}", file.name)?;
			writeln!(f, "Folder: {}", file.folder)?;
			writeln!(f, "Size: {}", file.display_size())?;
		}
		if let Some(kind) = self.kind {
			writeln!(f, "Type: {}", kind.display_name())?;
		}

		let fields = [
			("Version", &self.version),
			("Last Saved", &self.last_saved),
			("Distance Unit", &self.distance_unit),
			("Time Unit", &self.time_unit),
			("Angle Unit", &self.angle_unit),
		];
		for (label, value) in fields {
			if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
				writeln!(f, "{label}: {value}")?;
			}
		}

		if !self.file_info.is_empty() {
			writeln!(f, "File Info:")?;
			for (key, value) in &self.file_info {
				writeln!(f, "\t{key}: {value}")?;
			}
		}
		if !self.plugins.is_empty() {
			writeln!(f, "Required Plugins:")?;
			for (name, version) in &self.plugins {
				writeln!(f, "\t{name}: {version}")?;
			}
		}
		if !self.references.is_empty() {
			writeln!(f, "Required References:")?;
			for reference in &self.references {
				writeln!(f, "\t{reference}")?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
