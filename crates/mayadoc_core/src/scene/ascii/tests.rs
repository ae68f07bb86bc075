use std::cell::Cell;
use std::io::Cursor;

use mayadoc_testkit::sample_ascii_scene;

use crate::scene::{AbortHandle, ErrorKind, ExtractOptions, Result, SceneError, SceneKind, SceneSummary, extract_text};

fn extract_bytes(bytes: &[u8]) -> Result<SceneSummary> {
	extract_text(|| Ok(Cursor::new(bytes)), &ExtractOptions::default(), &AbortHandle::new())
}

fn extract(text: &str) -> Result<SceneSummary> {
	extract_bytes(text.as_bytes())
}

#[test]
fn end_to_end_header_lines() {
	let text = [
		"//Maya 2020 scene",
		"requires maya \"2020\";",
		"currentUnit -l centimeter -a degree -t film;",
		"fileInfo \"product\" \"Maya 2020\";",
		"createNode transform -n \"pCube1\";",
	]
	.join("\n");

	let summary = extract(&text).expect("scene parses");
	assert_eq!(summary.kind, Some(SceneKind::Ascii));
	assert_eq!(summary.version.as_deref(), Some("2020"));
	assert_eq!(summary.distance_unit.as_deref(), Some("centimeter"));
	assert_eq!(summary.angle_unit.as_deref(), Some("degree"));
	assert_eq!(summary.time_unit.as_deref(), Some("film"));
	assert_eq!(summary.file_info.get("product").map(String::as_str), Some("Maya 2020"));
	assert!(summary.references.is_empty());
	assert!(summary.plugins.is_empty());
}

#[test]
fn sample_scene_collects_every_field() {
	let summary = extract(&sample_ascii_scene()).expect("scene parses");
	assert_eq!(summary.version.as_deref(), Some("2020"));
	assert_eq!(summary.last_saved.as_deref(), Some("Mon, Jan 06, 2020 10:00:00 AM"));
	assert_eq!(summary.plugins.get("stereoCamera").map(String::as_str), Some("10.0"));
	assert_eq!(summary.file_info.len(), 3);

	let refs: Vec<&str> = summary.references.iter().map(String::as_str).collect();
	assert_eq!(refs, vec!["C:/assets/nested.mb", "C:/assets/cube.mb"]);
}

#[test]
fn nothing_after_create_node_is_read() {
	let text = "//Maya 2020 scene\ncreateNode transform -n \"a\";\nrequires maya \"9999\";\nfileInfo \"x\" \"y\";\n";
	let summary = extract(text).expect("scene parses");
	assert_eq!(summary.version, None);
	assert!(summary.file_info.is_empty());
}

#[test]
fn missing_signature_is_a_format_error() {
	let err = extract("requires maya \"2020\";\n//Maya 2020 scene\n").expect_err("signature must come first");
	assert!(matches!(err, SceneError::MissingSignature { .. }));
	assert_eq!(err.kind(), ErrorKind::Format);

	let err = extract("").expect_err("empty file has no signature");
	assert!(matches!(err, SceneError::MissingSignature { .. }));

	let err = extract("  //Maya 2020 scene\n").expect_err("signature is checked before trimming");
	assert!(matches!(err, SceneError::MissingSignature { .. }));
}

#[test]
fn leading_bom_and_crlf_are_tolerated() {
	let summary = extract_bytes(b"\xEF\xBB\xBF//Maya 2020 scene\r\nrequires maya \"2020\";\r\n").expect("scene parses");
	assert_eq!(summary.version.as_deref(), Some("2020"));
}

#[test]
fn byte_order_mark_selects_utf8_and_ignores_codeset() {
	let text = "\u{feff}//Maya 2020 scene\n//codeset: 932\n//Last modified: lundi 6 janvier 2020 \u{e0} 10h\nfileInfo \"title\" \"Caf\u{e9}\";\n";
	let opens = Cell::new(0);
	let summary = extract_text(
		|| {
			opens.set(opens.get() + 1);
			Ok(Cursor::new(text.as_bytes()))
		},
		&ExtractOptions::default(),
		&AbortHandle::new(),
	)
	.expect("scene parses");

	assert_eq!(opens.get(), 1);
	assert_eq!(summary.last_saved.as_deref(), Some("lundi 6 janvier 2020 \u{e0} 10h"));
	assert_eq!(summary.file_info.get("title").map(String::as_str), Some("Caf\u{e9}"));
}

#[test]
fn bare_carriage_returns_end_lines() {
	let summary = extract("//Maya 2020 scene\rrequires maya \"2020\";\rcurrentUnit -t film;\r\nfileInfo \"k\" \"v\";\n").expect("scene parses");
	assert_eq!(summary.version.as_deref(), Some("2020"));
	assert_eq!(summary.time_unit.as_deref(), Some("film"));
	assert_eq!(summary.file_info.get("k").map(String::as_str), Some("v"));
}

#[test]
fn codeset_change_restarts_from_first_line() {
	let mut bytes = b"//Maya 2020 scene\n//Last Modified: 2020-01-01\n//codeset: 932\nfileInfo \"title\" \"".to_vec();
	let (title, _, _) = encoding_rs::SHIFT_JIS.encode("\u{30b7}\u{30fc}\u{30f3}");
	bytes.extend_from_slice(&title);
	bytes.extend_from_slice(b"\";\n//Last Modified: 2020-01-02\n");

	let opens = Cell::new(0);
	let summary = extract_text(
		|| {
			opens.set(opens.get() + 1);
			Ok(Cursor::new(bytes.as_slice()))
		},
		&ExtractOptions::default(),
		&AbortHandle::new(),
	)
	.expect("scene parses");

	assert_eq!(opens.get(), 2);
	assert_eq!(summary.file_info.get("title").map(String::as_str), Some("\u{30b7}\u{30fc}\u{30f3}"));
	assert_eq!(summary.last_saved.as_deref(), Some("2020-01-02"));
	assert_eq!(summary.file_info.len(), 1);
}

#[test]
fn codeset_on_second_line_keeps_earlier_comment_fields() {
	let mut bytes = b"//Maya 2020 scene\n//codeset: 932\n//Name: ".to_vec();
	let (name, _, _) = encoding_rs::SHIFT_JIS.encode("\u{540d}\u{524d}.ma");
	bytes.extend_from_slice(&name);
	bytes.extend_from_slice(b"\n//Last Modified: 2020-01-01\nrequires maya \"2020\";\n");

	let summary = extract_bytes(&bytes).expect("scene parses");
	assert_eq!(summary.last_saved.as_deref(), Some("2020-01-01"));
	assert_eq!(summary.version.as_deref(), Some("2020"));
}

#[test]
fn matching_or_non_numeric_codeset_does_not_restart() {
	let text = "//Maya 2020 scene\n//Codeset: 1252\n//codeset: UTF-8\nrequires maya \"2020\";\n";
	let opens = Cell::new(0);
	let summary = extract_text(
		|| {
			opens.set(opens.get() + 1);
			Ok(Cursor::new(text.as_bytes()))
		},
		&ExtractOptions::default(),
		&AbortHandle::new(),
	)
	.expect("scene parses");
	assert_eq!(opens.get(), 1);
	assert_eq!(summary.version.as_deref(), Some("2020"));
}

#[test]
fn unknown_codepage_is_an_encoding_error() {
	let err = extract("//Maya 2020 scene\n//codeset: 77777\n").expect_err("no such codepage");
	assert!(matches!(err, SceneError::UnknownCodepage { codepage: 77777 }));
	assert_eq!(err.kind(), ErrorKind::Encoding);

	let err = extract("//Maya 2020 scene\n//codeset: 1200\n").expect_err("utf-16 cannot be split on newlines");
	assert!(matches!(err, SceneError::UnsupportedEncoding { codepage: 1200, .. }));
}

#[test]
fn alternating_codesets_hit_the_restart_cap() {
	let text = "//Maya 2020 scene\n//codeset: 932\n//codeset: 1251\n";
	let options = ExtractOptions {
		max_encoding_restarts: Some(3),
	};
	let err = extract_text(|| Ok(Cursor::new(text.as_bytes())), &options, &AbortHandle::new()).expect_err("flip-flops forever");
	assert!(matches!(err, SceneError::RestartLimit { max: 3 }));
}

#[test]
fn short_statements_are_skipped() {
	let text = "//Maya 2020 scene\n\nfile;\nrequires maya;\nfileInfo \"lonely\";\nrequires \"mtoa\" \"4.0\";\ncurrentUnit -l;\n";
	let summary = extract(text).expect("scene parses");
	assert!(summary.references.is_empty());
	assert_eq!(summary.version, None);
	assert!(summary.file_info.is_empty());
	assert_eq!(summary.plugins.get("mtoa").map(String::as_str), Some("4.0"));
	assert_eq!(summary.distance_unit, None);
}

#[test]
fn current_unit_missing_flags_stay_unset() {
	let summary = extract("//Maya 2020 scene\ncurrentUnit -t ntsc;\n").expect("scene parses");
	assert_eq!(summary.time_unit.as_deref(), Some("ntsc"));
	assert_eq!(summary.distance_unit, None);
	assert_eq!(summary.angle_unit, None);
}

#[test]
fn external_abort_stops_before_next_line() {
	let abort = AbortHandle::new();
	abort.abort();
	let summary = extract_text(|| Ok(Cursor::new(sample_ascii_scene().into_bytes())), &ExtractOptions::default(), &abort).expect("abort is not an error");
	assert_eq!(summary, SceneSummary::new(SceneKind::Ascii));
}

#[test]
fn open_failure_surfaces_as_io_error() {
	let err = extract_text(
		|| Err::<Cursor<Vec<u8>>, _>(std::io::Error::from(std::io::ErrorKind::PermissionDenied)),
		&ExtractOptions::default(),
		&AbortHandle::new(),
	)
	.expect_err("open fails");
	assert_eq!(err.kind(), ErrorKind::Io);
}
