use serde::Serialize;

/// Print `value` as pretty JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(value: &T) {
	match serde_json::to_string_pretty(value) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encode failed: {err}"),
	}
}

/// Render an optional value, or `-` when absent.
pub(crate) fn or_dash(value: Option<&str>) -> &str {
	value.unwrap_or("-")
}
