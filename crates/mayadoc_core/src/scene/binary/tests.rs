use std::io::Cursor;

use mayadoc_testkit::{IffWriter, cstr, sample_binary_scene};

use crate::scene::{AbortHandle, ErrorKind, SceneError, SceneKind, SceneSummary, extract_binary};

fn extract(bytes: Vec<u8>) -> crate::scene::Result<SceneSummary> {
	extract_binary(Cursor::new(bytes), &AbortHandle::new())
}

fn assert_sample_fields(summary: &SceneSummary) {
	assert_eq!(summary.version.as_deref(), Some("2020"));
	assert_eq!(summary.last_saved.as_deref(), Some("Mon Jan 06 10:00:00 2020"));
	assert_eq!(summary.distance_unit.as_deref(), Some("cm"));
	assert_eq!(summary.time_unit.as_deref(), Some("film"));
	assert_eq!(summary.angle_unit.as_deref(), Some("deg"));
	assert_eq!(summary.file_info.get("product").map(String::as_str), Some("Maya 2020"));
	assert_eq!(summary.file_info.get("version").map(String::as_str), Some("2020"));
	assert_eq!(summary.plugins.get("stereoCamera").map(String::as_str), Some("10.0"));

	let refs: Vec<&str> = summary.references.iter().map(String::as_str).collect();
	assert_eq!(refs, vec!["C:/assets/cube.mb", "C:/assets/nested.mb"]);
	assert!(summary.file.is_none());
}

#[test]
fn extracts_header_from_4_byte_scene() {
	let summary = extract(sample_binary_scene(b"FOR4")).expect("scene parses");
	assert_eq!(summary.kind, Some(SceneKind::Binary32));
	assert_sample_fields(&summary);
}

#[test]
fn extracts_header_from_8_byte_scene() {
	let summary = extract(sample_binary_scene(b"FOR8")).expect("scene parses");
	assert_eq!(summary.kind, Some(SceneKind::Binary64));
	assert_sample_fields(&summary);
}

#[test]
fn repeated_extraction_is_identical() {
	let first = extract(sample_binary_scene(b"FOR8")).expect("first parse");
	let second = extract(sample_binary_scene(b"FOR8")).expect("second parse");
	assert_eq!(first, second);
}

#[test]
fn nothing_after_node_marker_is_read() {
	let bytes = IffWriter::new()
		.group(b"FOR4", b"Maya")
		.group(b"FOR4", b"HEAD")
		.chunk(b"VERS", b"2019")
		.end()
		.group(b"FOR4", b"XFRM")
		.end()
		.group(b"FOR4", b"FREF")
		.chunk(b"FREF", &cstr("late.mb"))
		.end()
		.raw(b"garbage that would fail to decode")
		.finish();

	let summary = extract(bytes).expect("abort is a successful short-circuit");
	assert_eq!(summary.version.as_deref(), Some("2019"));
	assert!(summary.references.is_empty());
}

#[test]
fn wrong_root_marker_is_rejected() {
	let bytes = IffWriter::new().group(b"FOR4", b"Mayb").group(b"FOR4", b"HEAD").chunk(b"VERS", b"2020").finish();
	let err = extract(bytes).expect_err("marker mismatch");
	assert!(matches!(err, SceneError::RootTypeMismatch { .. }));
	assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn text_fields_drop_nul_padding_and_mask_non_ascii() {
	let bytes = IffWriter::new()
		.group(b"FOR4", b"Maya")
		.group(b"FOR4", b"HEAD")
		.chunk(b"VERS", b"2020\0\0")
		.chunk(b"CHNG", b"caf\xe9")
		.end()
		.finish();

	let summary = extract(bytes).expect("scene parses");
	assert_eq!(summary.version.as_deref(), Some("2020"));
	assert_eq!(summary.last_saved.as_deref(), Some("caf?"));
}

#[test]
fn unterminated_record_fails_the_parse() {
	let bytes = IffWriter::new()
		.group(b"FOR4", b"Maya")
		.group(b"FOR4", b"HEAD")
		.chunk(b"FINF", b"product\0Maya")
		.end()
		.finish();

	let err = extract(bytes).expect_err("value has no terminator");
	assert!(matches!(err, SceneError::UnterminatedString { .. }), "{err}");
}

#[test]
fn external_abort_before_start_returns_empty_summary() {
	let abort = AbortHandle::new();
	abort.abort();
	let summary = extract_binary(Cursor::new(sample_binary_scene(b"FOR4")), &abort).expect("abort is not an error");
	assert_eq!(summary, SceneSummary::default());
}

#[test]
fn later_plugin_versions_replace_earlier_ones() {
	let bytes = IffWriter::new()
		.group(b"FORM", b"Maya")
		.group(b"FORM", b"HEAD")
		.chunk(b"PLUG", &mayadoc_testkit::cstr_pair("mtoa", "4.0"))
		.chunk(b"PLUG", &mayadoc_testkit::cstr_pair("mtoa", "4.1"))
		.end()
		.finish();

	let summary = extract(bytes).expect("scene parses");
	assert_eq!(summary.kind, Some(SceneKind::Binary32));
	assert_eq!(summary.plugins.len(), 1);
	assert_eq!(summary.plugins["mtoa"], "4.1");
}

#[test]
fn header_field_overrunning_its_group_fails_the_parse() {
	let reference = IffWriter::new().group(b"FOR4", b"FREF").chunk(b"FREF", &cstr("evil.mb")).finish();
	let mut head = b"FOR4".to_vec();
	head.extend_from_slice(&16_u32.to_be_bytes());
	head.extend_from_slice(b"HEAD");
	head.extend_from_slice(b"VERS");
	head.extend_from_slice(&(4 + reference.len() as u32).to_be_bytes());
	head.extend_from_slice(b"2020");
	let bytes = IffWriter::new().group(b"FOR4", b"Maya").raw(&head).raw(&reference).finish();

	let err = extract(bytes).expect_err("VERS must not swallow the reference group");
	assert!(matches!(err, SceneError::ChunkOverrunsParent { .. }), "{err}");
	assert_eq!(err.kind(), ErrorKind::Format);
}
