use std::io::BufRead;

use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

use crate::scene::{AbortHandle, ExtractOptions, Result, SceneError, SceneKind, SceneSummary};

mod tokens;

pub use tokens::tokenize;

/// Required prefix of a text scene's first line.
pub const SIGNATURE: &str = "//Maya";
/// Western codepage assumed until a `codeset` directive names another.
pub const DEFAULT_CODEPAGE: u16 = 1252;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Extract header metadata from a text scene.
///
/// `open` must yield a fresh reader positioned at the start of the file each time it is
/// called: a `codeset` directive that changes the encoding discards everything read so far
/// and restarts from the first line under the new encoding. A file that starts with a UTF-8
/// byte order mark is read as UTF-8 throughout and never restarts.
pub fn extract_text<F, B>(mut open: F, options: &ExtractOptions, abort: &AbortHandle) -> Result<SceneSummary>
where
	F: FnMut() -> std::io::Result<B>,
	B: BufRead,
{
	let mut codepage = DEFAULT_CODEPAGE;
	let mut restarts = 0_usize;

	loop {
		let encoding = encoding_for(codepage)?;
		let mut pass = TextPass::new(codepage);
		match pass.run(open()?, encoding, abort)? {
			Outcome::Finished => return Ok(pass.summary),
			Outcome::Restart(next) => {
				restarts += 1;
				if let Some(max) = options.max_encoding_restarts {
					if restarts > max {
						return Err(SceneError::RestartLimit { max });
					}
				}
				debug!(from = codepage, to = next, restarts, "codeset changed, restarting text scene");
				codepage = next;
			}
		}
	}
}

/// Resolve a Windows codepage number to a line-decodable encoding.
pub fn encoding_for(codepage: u16) -> Result<&'static Encoding> {
	let encoding = codepage::to_encoding(codepage).ok_or(SceneError::UnknownCodepage {
		codepage: i64::from(codepage),
	})?;
	if !encoding.is_ascii_compatible() {
		return Err(SceneError::UnsupportedEncoding {
			codepage,
			name: encoding.name(),
		});
	}
	Ok(encoding)
}

enum Outcome {
	Finished,
	Restart(u16),
}

enum Flow {
	Continue,
	Stop,
}

/// State of one pass over the file under a single encoding.
struct TextPass {
	codepage: u16,
	byte_order_mark: bool,
	summary: SceneSummary,
}

impl TextPass {
	fn new(codepage: u16) -> Self {
		Self {
			codepage,
			byte_order_mark: false,
			summary: SceneSummary::new(SceneKind::Ascii),
		}
	}

	/// Lines end at `\n`, `\r\n`, or a bare `\r`. A leading UTF-8 byte order mark switches
	/// the pass to UTF-8 and makes `codeset` directives inert.
	fn run<B: BufRead>(&mut self, mut reader: B, mut encoding: &'static Encoding, abort: &AbortHandle) -> Result<Outcome> {
		let mut raw = Vec::new();
		let mut first = true;

		loop {
			if abort.is_aborted() {
				return Ok(Outcome::Finished);
			}

			raw.clear();
			if reader.read_until(b'\n', &mut raw)? == 0 {
				break;
			}

			let mut bytes = strip_line_ending(&raw);
			if first {
				if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
					bytes = rest;
					encoding = UTF_8;
					self.byte_order_mark = true;
				}
			}

			for segment in bytes.split(|byte| *byte == b'\r') {
				if abort.is_aborted() {
					return Ok(Outcome::Finished);
				}

				let (decoded, _) = encoding.decode_without_bom_handling(segment);
				if first {
					if !decoded.starts_with(SIGNATURE) {
						return Err(SceneError::MissingSignature { expected: SIGNATURE });
					}
					first = false;
				}

				let line = decoded.trim();
				if let Some(comment) = line.strip_prefix("//") {
					if let Some(next) = self.comment(comment)? {
						return Ok(Outcome::Restart(next));
					}
					continue;
				}

				if let Flow::Stop = self.statement(line) {
					return Ok(Outcome::Finished);
				}
			}
		}

		if first {
			return Err(SceneError::MissingSignature { expected: SIGNATURE });
		}
		Ok(Outcome::Finished)
	}

	/// Handle a `// key: value` comment; returns a codepage when the pass must restart.
	fn comment(&mut self, comment: &str) -> Result<Option<u16>> {
		let Some((key, value)) = comment.trim_start_matches('/').split_once(':') else {
			return Ok(None);
		};
		let value = value.trim();

		match key.trim().to_lowercase().as_str() {
			"last modified" => self.summary.last_saved = Some(value.to_owned()),
			"codeset" if self.byte_order_mark => {}
			"codeset" => {
				let Ok(declared) = value.parse::<i64>() else {
					return Ok(None);
				};
				if declared == i64::from(self.codepage) {
					return Ok(None);
				}
				let codepage = u16::try_from(declared).map_err(|_| SceneError::UnknownCodepage { codepage: declared })?;
				encoding_for(codepage)?;
				return Ok(Some(codepage));
			}
			_ => {}
		}
		Ok(None)
	}

	fn statement(&mut self, line: &str) -> Flow {
		let tokens = tokenize(line);
		let Some(command) = tokens.first() else {
			return Flow::Continue;
		};

		match *command {
			"file" => {
				if let [_, .., reference] = tokens.as_slice() {
					self.summary.add_reference(*reference);
				}
			}
			"requires" => match tokens.as_slice() {
				[_, "maya", version, ..] => self.summary.version = Some((*version).to_owned()),
				[_, "maya"] => {}
				[_, .., name, version] => self.summary.set_plugin(*name, *version),
				_ => {}
			},
			"currentUnit" => {
				self.summary.distance_unit = flag_value(&tokens, "-l");
				self.summary.angle_unit = flag_value(&tokens, "-a");
				self.summary.time_unit = flag_value(&tokens, "-t");
			}
			"fileInfo" => {
				if let [_, .., key, value] = tokens.as_slice() {
					self.summary.set_file_info(*key, *value);
				}
			}
			"createNode" => return Flow::Stop,
			_ => {}
		}
		Flow::Continue
	}
}

fn flag_value(tokens: &[&str], flag: &str) -> Option<String> {
	let index = tokens.iter().position(|token| *token == flag)?;
	tokens.get(index + 1).map(|value| (*value).to_owned())
}

fn strip_line_ending(raw: &[u8]) -> &[u8] {
	let line = raw.strip_suffix(b"\n").unwrap_or(raw);
	line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests;
