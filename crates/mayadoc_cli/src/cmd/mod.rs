/// Binary chunk tree command.
pub mod chunks;
/// Scene summary command.
pub mod info;
/// Install version command.
pub mod version;

mod util;
