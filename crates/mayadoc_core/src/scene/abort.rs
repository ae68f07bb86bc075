use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between a caller and a running extractor.
///
/// Extractors check it once per chunk header or text line. Setting it ends the parse
/// successfully with whatever has been collected so far.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
	flag: Arc<AtomicBool>,
}

impl AbortHandle {
	/// Create an unset handle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Request that traversal stops at the next check.
	pub fn abort(&self) {
		self.flag.store(true, Ordering::Relaxed);
	}

	/// Return `true` once [`abort`](Self::abort) has been called on any clone.
	pub fn is_aborted(&self) -> bool {
		self.flag.load(Ordering::Relaxed)
	}
}
