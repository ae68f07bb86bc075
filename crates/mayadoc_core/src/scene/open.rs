use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::scene::{AbortHandle, ExtractOptions, FileStat, Result, SceneError, SceneSummary, extract_binary, extract_text};

/// Summarize the scene at `path`, or `None` when it cannot be read.
///
/// Every failure is discarded here; use [`try_summarize`] to see why.
pub fn summarize(path: impl AsRef<Path>) -> Option<SceneSummary> {
	let path = path.as_ref();
	match try_summarize(path, &ExtractOptions::default(), &AbortHandle::new()) {
		Ok(summary) => Some(summary),
		Err(err) => {
			debug!(path = %path.display(), kind = err.kind().as_str(), error = %err, "scene summary discarded");
			None
		}
	}
}

/// Summarize the scene at `path`, picking the extractor from its extension.
///
/// `.ma` selects the text extractor and `.mb` the binary one, compared case-insensitively.
/// On success the summary carries the file's name, folder, and size.
pub fn try_summarize(path: impl AsRef<Path>, options: &ExtractOptions, abort: &AbortHandle) -> Result<SceneSummary> {
	let path = path.as_ref();
	let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);

	let mut summary = match extension.as_deref() {
		Some("ma") => extract_text(|| File::open(path).map(BufReader::new), options, abort)?,
		Some("mb") => extract_binary(BufReader::new(File::open(path)?), abort)?,
		_ => {
			return Err(SceneError::UnsupportedExtension {
				path: path.display().to_string(),
			});
		}
	};

	let size = std::fs::metadata(path)?.len();
	summary.file = Some(FileStat::new(path, size));
	Ok(summary)
}
