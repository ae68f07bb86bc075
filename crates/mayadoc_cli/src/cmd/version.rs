use std::path::PathBuf;

use mayadoc::scene::{AbortHandle, ExtractOptions, Result, try_summarize};

use crate::cmd::util::or_dash;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
}

/// Print the install version a scene should be opened with.
pub fn run(args: Args) -> Result<()> {
	let Args { path } = args;

	let summary = try_summarize(&path, &ExtractOptions::default(), &AbortHandle::new())?;
	println!("{}", summary.install_version());
	println!("saved_with: {}", or_dash(summary.version.as_deref()));
	Ok(())
}
