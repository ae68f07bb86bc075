use std::io::{Read, Seek};

use tracing::trace;

use crate::scene::{AbortHandle, Alignment, GroupChunk, HandlerTable, Node, Result, SceneKind, SceneSummary, Tag, Walker};

/// Group type of the root group in every binary scene.
pub const MAYA: Tag = Tag::new(b"Maya");
/// Header group holding version, units, file info, and plugins.
pub const HEAD: Tag = Tag::new(b"HEAD");
/// Plain file-reference group.
pub const FREF: Tag = Tag::new(b"FREF");
/// Depth-tagged file-reference group.
pub const FRDI: Tag = Tag::new(b"FRDI");
/// First node-creation group; everything after it is scene graph payload.
pub const XFRM: Tag = Tag::new(b"XFRM");

const VERS: Tag = Tag::new(b"VERS");
const CHNG: Tag = Tag::new(b"CHNG");
const LUNI: Tag = Tag::new(b"LUNI");
const TUNI: Tag = Tag::new(b"TUNI");
const AUNI: Tag = Tag::new(b"AUNI");
const FINF: Tag = Tag::new(b"FINF");
const PLUG: Tag = Tag::new(b"PLUG");

type SceneWalker<R> = Walker<R, SceneSummary>;

/// Handler set for the binary scene vocabulary.
pub fn scene_handlers<R: Read + Seek>() -> HandlerTable<R, SceneSummary> {
	let mut handlers = HandlerTable::new();
	handlers
		.register_group_handler(HEAD, read_header)
		.register_group_handler(FREF, read_references)
		.register_group_handler(FRDI, read_depth_references)
		.register_group_handler(XFRM, stop_at_nodes);
	handlers
}

/// Extract header metadata from a binary scene stream.
///
/// Traversal stops at the first node-creation group, so the scene graph is never read.
pub fn extract_binary<R: Read + Seek>(inner: R, abort: &AbortHandle) -> Result<SceneSummary> {
	let mut walker = Walker::with_handlers(inner, SceneSummary::default(), scene_handlers())?.with_abort_handle(abort.clone());
	walker.parse(MAYA)?;

	let kind = walker.root().map(|root| match root.alignment {
		Alignment::Eight => SceneKind::Binary64,
		Alignment::Two | Alignment::Four => SceneKind::Binary32,
	});
	let mut summary = walker.into_state();
	summary.kind = kind;
	Ok(summary)
}

fn read_header<R: Read + Seek>(walker: &mut SceneWalker<R>, group: &GroupChunk) -> Result<()> {
	let mut children = walker.stream_group(group);
	while let Some(node) = children.next() {
		let Node::Chunk(chunk) = node? else {
			continue;
		};
		let walker = children.walker();
		match chunk.tag {
			VERS => {
				let version = walker.read_text(&chunk)?;
				walker.state_mut().version = Some(version);
			}
			CHNG => {
				let stamp = walker.read_text(&chunk)?;
				walker.state_mut().last_saved = Some(stamp);
			}
			LUNI => {
				let unit = walker.read_text(&chunk)?;
				walker.state_mut().distance_unit = Some(unit);
			}
			TUNI => {
				let unit = walker.read_text(&chunk)?;
				walker.state_mut().time_unit = Some(unit);
			}
			AUNI => {
				let unit = walker.read_text(&chunk)?;
				walker.state_mut().angle_unit = Some(unit);
			}
			FINF => {
				let key = walker.read_cstring(&chunk)?;
				let value = walker.read_cstring(&chunk)?;
				walker.state_mut().set_file_info(key, value);
			}
			PLUG => {
				let name = walker.read_cstring(&chunk)?;
				let version = walker.read_cstring(&chunk)?;
				walker.state_mut().set_plugin(name, version);
			}
			_ => {}
		}
	}
	Ok(())
}

fn read_references<R: Read + Seek>(walker: &mut SceneWalker<R>, group: &GroupChunk) -> Result<()> {
	let mut children = walker.stream_group(group);
	while let Some(node) = children.next() {
		let Node::Chunk(chunk) = node? else {
			continue;
		};
		let walker = children.walker();
		let reference = walker.read_cstring(&chunk)?;
		walker.state_mut().add_reference(reference);
	}
	Ok(())
}

fn read_depth_references<R: Read + Seek>(walker: &mut SceneWalker<R>, group: &GroupChunk) -> Result<()> {
	let mut children = walker.stream_group(group);
	while let Some(node) = children.next() {
		let Node::Chunk(chunk) = node? else {
			continue;
		};
		let walker = children.walker();
		let depth = walker.reader().read_i32_be()?;
		let reference = walker.read_cstring(&chunk)?;
		trace!(depth, reference = %reference, "depth-tagged reference");
		walker.state_mut().add_reference(reference);
	}
	Ok(())
}

fn stop_at_nodes<R: Read + Seek>(walker: &mut SceneWalker<R>, _group: &GroupChunk) -> Result<()> {
	walker.abort();
	Ok(())
}

#[cfg(test)]
mod tests;
