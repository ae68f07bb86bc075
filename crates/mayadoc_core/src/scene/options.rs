/// Tunables shared by both extractors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
	/// Maximum number of times a text scene may restart because a `codeset` directive
	/// changed the encoding. `None` removes the cap.
	pub max_encoding_restarts: Option<usize>,
}

impl ExtractOptions {
	/// Default restart cap.
	pub const DEFAULT_MAX_ENCODING_RESTARTS: usize = 8;
}

impl Default for ExtractOptions {
	fn default() -> Self {
		Self {
			max_encoding_restarts: Some(Self::DEFAULT_MAX_ENCODING_RESTARTS),
		}
	}
}
