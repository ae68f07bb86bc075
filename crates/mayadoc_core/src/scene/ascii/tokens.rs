/// Split one statement line into tokens.
///
/// A token is either a double-quoted string (quotes stripped, runs of closing quotes
/// swallowed) or a run of word characters with an optional leading `-`. Everything
/// else, including `;` and an unmatched `"`, separates tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
	let mut tokens = Vec::new();
	let mut pos = 0;

	while let Some(ch) = line[pos..].chars().next() {
		if ch == '"' {
			if let Some(close) = line[pos + 1..].find('"') {
				let content_end = pos + 1 + close;
				tokens.push(&line[pos + 1..content_end]);
				pos = content_end + 1;
				while line[pos..].starts_with('"') {
					pos += 1;
				}
				continue;
			}
		}

		let word_start = if ch == '-' { pos + 1 } else { pos };
		let word_len = word_len(&line[word_start..]);
		if word_len > 0 {
			tokens.push(&line[pos..word_start + word_len]);
			pos = word_start + word_len;
			continue;
		}

		pos += ch.len_utf8();
	}

	tokens
}

fn is_word(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

fn word_len(text: &str) -> usize {
	text.char_indices().find(|(_, ch)| !is_word(*ch)).map_or(text.len(), |(index, _)| index)
}
