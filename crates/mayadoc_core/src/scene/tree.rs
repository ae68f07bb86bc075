use std::io::{Read, Seek};

use crate::scene::{GroupChunk, Node, Result, Tag, Walker};

/// Materialized chunk tree rooted at the stream's first group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkTree {
	/// Root group with its descendants attached.
	pub root: GroupChunk,
	/// Number of nodes in the tree, root included.
	pub node_count: usize,
	/// Whether reading stopped at `max_nodes` before the stream was exhausted.
	pub truncated: bool,
}

/// Read the stream into a tree, stopping after `max_nodes` nodes when given.
///
/// Groups claimed by the walker's handlers are left out. Returns `None` when traversal
/// was aborted before the root was decoded.
pub fn read_tree<R: Read + Seek, C>(walker: &mut Walker<R, C>, expected_root: Option<Tag>, max_nodes: Option<usize>) -> Result<Option<ChunkTree>> {
	let mut stream = match expected_root {
		Some(tag) => walker.stream_expecting(tag),
		None => walker.stream(),
	};

	let mut open: Vec<GroupChunk> = Vec::new();
	let mut node_count = 0_usize;
	let mut truncated = false;

	while let Some(node) = stream.next() {
		let node = node?;
		if max_nodes.is_some_and(|max| node_count >= max) {
			truncated = true;
			break;
		}

		close_groups(&mut open, stream.depth().max(1));
		node_count += 1;
		match node {
			Node::Group(group) => open.push(group),
			Node::Chunk(chunk) => {
				if let Some(parent) = open.last_mut() {
					parent.children.push(Node::Chunk(chunk));
				}
			}
		}
	}

	close_groups(&mut open, 1);
	Ok(open.pop().map(|root| ChunkTree {
		root,
		node_count,
		truncated,
	}))
}

fn close_groups(open: &mut Vec<GroupChunk>, keep: usize) {
	while open.len() > keep {
		let Some(child) = open.pop() else {
			return;
		};
		if let Some(parent) = open.last_mut() {
			parent.children.push(Node::Group(child));
		}
	}
}
