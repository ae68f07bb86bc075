//! Public library API for reading header metadata from Maya `.ma` and `.mb` scene files.

/// Chunk container walking, scene extractors, and the summary record they produce.
pub mod scene;
