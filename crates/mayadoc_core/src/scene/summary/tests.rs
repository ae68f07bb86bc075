use std::path::Path;

use crate::scene::{FileStat, SceneKind, SceneSummary, format_kb_size};

#[test]
fn references_dedup_in_first_seen_order() {
	let mut summary = SceneSummary::new(SceneKind::Ascii);
	assert!(summary.add_reference("b.ma"));
	assert!(summary.add_reference("a.ma"));
	assert!(!summary.add_reference("b.ma"));
	assert!(summary.add_reference("B.ma"));

	let refs: Vec<&str> = summary.references.iter().map(String::as_str).collect();
	assert_eq!(refs, vec!["b.ma", "a.ma", "B.ma"]);
}

#[test]
fn file_info_last_write_wins() {
	let mut summary = SceneSummary::default();
	summary.set_file_info("product", "Maya 2019");
	summary.set_file_info("osv", "Windows");
	summary.set_file_info("product", "Maya 2020");

	assert_eq!(summary.file_info.len(), 2);
	assert_eq!(summary.file_info["product"], "Maya 2020");
	assert_eq!(summary.file_info.get_index(0).map(|(key, _)| key.as_str()), Some("product"));
}

#[test]
fn install_version_prefers_preview_product_year() {
	let mut summary = SceneSummary::default();
	summary.version = Some("Preview Release 110".to_owned());
	summary.set_file_info("product", "Maya 2022 Preview");
	summary.set_file_info("version", "Preview Release 110");

	assert!(summary.is_beta());
	assert_eq!(summary.product(), "Maya 2022 Preview (Beta)");
	assert_eq!(summary.install_version(), "2022");
}

#[test]
fn install_version_falls_back_through_sources() {
	let mut summary = SceneSummary::default();
	assert_eq!(summary.install_version(), "Unknown");
	assert_eq!(summary.product(), "Unknown");

	summary.version = Some("2020.2".to_owned());
	assert_eq!(summary.install_version(), "2020");

	summary.set_file_info("version", "2020");
	summary.version = Some("x".to_owned());
	assert_eq!(summary.install_version(), "2020");
	assert!(!summary.is_beta());
}

#[test]
fn display_units_expand_known_names() {
	let summary = SceneSummary {
		distance_unit: Some("cm".to_owned()),
		angle_unit: Some("rad".to_owned()),
		time_unit: Some("ntscf".to_owned()),
		..SceneSummary::default()
	};
	assert_eq!(summary.display_distance_unit().as_deref(), Some("centimeter"));
	assert_eq!(summary.display_angle_unit().as_deref(), Some("radian"));
	assert_eq!(summary.display_time_unit().as_deref(), Some("60fps (ntscf)"));

	let custom = SceneSummary {
		distance_unit: Some("centimeter".to_owned()),
		time_unit: Some("120fps".to_owned()),
		..SceneSummary::default()
	};
	assert_eq!(custom.display_distance_unit().as_deref(), Some("centimeter"));
	assert_eq!(custom.display_time_unit().as_deref(), Some("120fps"));
	assert_eq!(custom.display_angle_unit(), None);
}

#[test]
fn kb_size_rounds_up_with_separators() {
	assert_eq!(format_kb_size(0), "0 KB");
	assert_eq!(format_kb_size(1), "1 KB");
	assert_eq!(format_kb_size(1024), "1 KB");
	assert_eq!(format_kb_size(1025), "2 KB");
	assert_eq!(format_kb_size(1_263_616), "1,234 KB");
	assert_eq!(format_kb_size(1024 * 1_234_567), "1,234,567 KB");
}

#[test]
fn file_stat_splits_name_and_folder() {
	let stat = FileStat::new(Path::new("/scenes/shot/cube.mb"), 2048);
	assert_eq!(stat.name, "cube.mb");
	assert_eq!(stat.folder, "/scenes/shot");
	assert_eq!(stat.display_size(), "2 KB");
}

#[test]
fn display_lists_non_empty_sections() {
	let mut summary = SceneSummary::new(SceneKind::Binary64);
	summary.version = Some("2020".to_owned());
	summary.last_saved = Some(String::new());
	summary.set_plugin("stereoCamera", "10.0");
	summary.add_reference("C:/a.mb");

	let text = summary.to_string();
	assert_eq!(
		text,
		"Type: Maya Binary File (64 bit)\nVersion: 2020\nRequired Plugins:\n\tstereoCamera: 10.0\nRequired References:\n\tC:/a.mb\n"
	);
}
