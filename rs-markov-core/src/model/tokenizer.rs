use once_cell::sync::Lazy;
use regex::Regex;

/// Unicode "Other" category: control, format, private use and unassigned code points.
static NON_PRINTABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{C}+").expect("valid regex"));

/// Splits a raw text into word tokens.
///
/// - Removes non-printable characters from the whole text
/// - Splits on runs of the remaining whitespace
/// - Drops pieces left empty
///
/// Newlines, tabs and carriage returns are control characters: they are
/// removed before splitting, so `"sat.\nThe"` becomes the single token `sat.The`.
///
/// Case and punctuation are kept as-is: a trailing `.` stays attached to its
/// word so that sentence boundaries survive training.
/// Markup is not interpreted, `<p>Hello` is a single token.
pub fn tokenize(source: &str) -> Vec<String> {
	NON_PRINTABLE
		.replace_all(source, "")
		.split_whitespace()
		.map(|piece| piece.trim())
		.filter(|piece| !piece.is_empty())
		.map(str::to_owned)
		.collect()
}

/// Tokenizes every source independently and concatenates the results in input order.
///
/// Document boundaries are not marked: the last token of a source is directly
/// followed by the first token of the next one.
pub fn tokenize_all<S: AsRef<str>>(sources: &[S]) -> Vec<String> {
	sources.iter().flat_map(|source| tokenize(source.as_ref())).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_on_whitespace_runs() {
		assert_eq!(tokenize("The  cat \u{A0}sat. The cat ran."), vec!["The", "cat", "sat.", "The", "cat", "ran."]);
	}

	#[test]
	fn control_whitespace_is_removed_before_splitting() {
		assert_eq!(tokenize("The cat sat.\nThe dog ran."), vec!["The", "cat", "sat.The", "dog", "ran."]);
		assert_eq!(tokenize("one\ttwo\r\nthree four"), vec!["onetwothree", "four"]);
	}

	#[test]
	fn keeps_case_and_punctuation() {
		assert_eq!(tokenize("Hello, World! why?"), vec!["Hello,", "World!", "why?"]);
	}

	#[test]
	fn strips_non_printable_characters() {
		// zero-width space, soft hyphen and a bell character
		assert_eq!(tokenize("co\u{200B}de ex\u{AD}ample \u{7}"), vec!["code", "example"]);
	}

	#[test]
	fn blank_input_yields_nothing() {
		assert!(tokenize("").is_empty());
		assert!(tokenize(" \n\t \u{A0} ").is_empty());
	}

	#[test]
	fn markup_is_opaque() {
		assert_eq!(tokenize("<p>Hello <b>there</b></p>"), vec!["<p>Hello", "<b>there</b></p>"]);
	}

	#[test]
	fn concatenates_sources_in_order() {
		let tokens = tokenize_all(&["one two.", "", "Three four"]);
		assert_eq!(tokens, vec!["one", "two.", "Three", "four"]);
	}
}
