use std::path::PathBuf;

use mayadoc::scene::{AbortHandle, ExtractOptions, Result, SceneSummary, try_summarize};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	/// Cap on codeset-triggered restarts of a text scene.
	#[arg(long, default_value_t = ExtractOptions::DEFAULT_MAX_ENCODING_RESTARTS)]
	pub max_restarts: usize,
}

/// Print the extracted scene summary.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json, max_restarts } = args;

	let options = ExtractOptions {
		max_encoding_restarts: Some(max_restarts),
	};
	let summary = try_summarize(&path, &options, &AbortHandle::new())?;

	if json {
		emit_json(&InfoJson::from_summary(&path, &summary));
		return Ok(());
	}

	print!("{summary}");
	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	kind: Option<&'static str>,
	name: Option<String>,
	folder: Option<String>,
	size: Option<u64>,
	size_display: Option<String>,
	version: Option<String>,
	install_version: String,
	product: String,
	is_beta: bool,
	last_saved: Option<String>,
	distance_unit: Option<String>,
	angle_unit: Option<String>,
	time_unit: Option<String>,
	distance_unit_display: Option<String>,
	angle_unit_display: Option<String>,
	time_unit_display: Option<String>,
	file_info: Vec<KeyValueJson>,
	plugins: Vec<KeyValueJson>,
	references: Vec<String>,
}

#[derive(serde::Serialize)]
struct KeyValueJson {
	key: String,
	value: String,
}

impl InfoJson {
	fn from_summary(path: &std::path::Path, summary: &SceneSummary) -> Self {
		let file = summary.file.as_ref();
		Self {
			path: path.display().to_string(),
			kind: summary.kind.map(|kind| kind.as_str()),
			name: file.map(|file| file.name.clone()),
			folder: file.map(|file| file.folder.clone()),
			size: file.map(|file| file.size),
			size_display: file.map(|file| file.display_size()),
			version: summary.version.clone(),
			install_version: summary.install_version(),
			product: summary.product(),
			is_beta: summary.is_beta(),
			last_saved: summary.last_saved.clone(),
			distance_unit: summary.distance_unit.clone(),
			angle_unit: summary.angle_unit.clone(),
			time_unit: summary.time_unit.clone(),
			distance_unit_display: summary.display_distance_unit(),
			angle_unit_display: summary.display_angle_unit(),
			time_unit_display: summary.display_time_unit(),
			file_info: key_values(summary.file_info.iter()),
			plugins: key_values(summary.plugins.iter()),
			references: summary.references.iter().cloned().collect(),
		}
	}
}

fn key_values<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> Vec<KeyValueJson> {
	entries
		.map(|(key, value)| KeyValueJson {
			key: key.clone(),
			value: value.clone(),
		})
		.collect()
}
