//! Case-insensitive query highlighting for match labels.

use std::ops::Range;

use regex::RegexBuilder;

/// Byte ranges of `text` matching `query`, case-insensitively.
///
/// Regex metacharacters in `query` match literally. An empty query matches
/// nothing.
pub fn highlight_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
	if query.is_empty() {
		return Vec::new();
	}
	let Ok(re) = RegexBuilder::new(&regex::escape(query))
		.case_insensitive(true)
		.build()
	else {
		return Vec::new();
	};
	re.find_iter(text).map(|m| m.range()).collect()
}

/// `text` with each occurrence of `query` wrapped in `<strong>…</strong>`.
pub fn highlight(text: &str, query: &str) -> String {
	let ranges = highlight_ranges(text, query);
	if ranges.is_empty() {
		return text.to_string();
	}

	let mut out = String::with_capacity(text.len() + ranges.len() * 17);
	let mut last = 0;
	for range in ranges {
		out.push_str(&text[last..range.start]);
		out.push_str("<strong>");
		out.push_str(&text[range.clone()]);
		out.push_str("</strong>");
		last = range.end;
	}
	out.push_str(&text[last..]);
	out
}
