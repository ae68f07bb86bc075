use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use mayadoc::scene::{GroupChunk, Node, Result, Walker, read_tree};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Stop after this many chunks, root included.
	#[arg(long, default_value_t = 256)]
	pub max_nodes: usize,
	#[arg(long)]
	pub json: bool,
}

/// Print the chunk hierarchy of a binary scene.
pub fn run(args: Args) -> Result<()> {
	let Args { path, max_nodes, json } = args;

	let mut walker = Walker::new(BufReader::new(File::open(&path)?), ())?;
	let tree = read_tree(&mut walker, None, Some(max_nodes))?;

	if json {
		let payload = ChunksJson {
			path: path.display().to_string(),
			node_count: tree.as_ref().map_or(0, |tree| tree.node_count),
			truncated: tree.as_ref().is_some_and(|tree| tree.truncated),
			root: tree.as_ref().map(|tree| group_json(&tree.root)),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	let Some(tree) = tree else {
		println!("nodes: 0");
		return Ok(());
	};
	println!("nodes: {}", tree.node_count);
	println!("truncated: {}", tree.truncated);
	print_group(&tree.root, 0);
	Ok(())
}

fn print_group(group: &GroupChunk, depth: usize) {
	println!(
		"{:indent$}{} {} @{} len={} align={}",
		"",
		group.tag,
		group.group_type,
		group.data_start,
		group.data_len,
		group.alignment.bytes(),
		indent = depth * 2
	);
	for child in &group.children {
		match child {
			Node::Group(child) => print_group(child, depth + 1),
			Node::Chunk(chunk) => println!("{:indent$}{} @{} len={}", "", chunk.tag, chunk.data_start, chunk.data_len, indent = (depth + 1) * 2),
		}
	}
}

#[derive(serde::Serialize)]
struct ChunksJson {
	path: String,
	node_count: usize,
	truncated: bool,
	root: Option<NodeJson>,
}

#[derive(serde::Serialize)]
struct NodeJson {
	tag: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	group_type: Option<String>,
	data_start: u64,
	data_len: u64,
	alignment: u64,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	children: Vec<NodeJson>,
}

fn group_json(group: &GroupChunk) -> NodeJson {
	NodeJson {
		tag: group.tag.label(),
		group_type: Some(group.group_type.label()),
		data_start: group.data_start,
		data_len: group.data_len,
		alignment: group.alignment.bytes(),
		children: group
			.children
			.iter()
			.map(|child| match child {
				Node::Group(child) => group_json(child),
				Node::Chunk(chunk) => NodeJson {
					tag: chunk.tag.label(),
					group_type: None,
					data_start: chunk.data_start,
					data_len: chunk.data_len,
					alignment: chunk.alignment.bytes(),
					children: Vec::new(),
				},
			})
			.collect(),
	}
}
