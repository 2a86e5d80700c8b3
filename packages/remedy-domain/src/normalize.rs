use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^\w\s]").expect("Failed to compile non-word regex."));
static WHITESPACE_RUN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex."));

/// Canonicalizes free text into a schema identifier.
///
/// `"  Runny   Nose! "` becomes `"runny_nose"`. Word characters (letters, digits, marks and
/// underscores) survive; all other non-whitespace characters are dropped. The result never
/// contains whitespace, so applying it twice yields the same identifier.
pub fn normalize(text: &str) -> String {
	let lowered = text.to_lowercase();
	let stripped = NON_WORD.replace_all(&lowered, "");

	WHITESPACE_RUN.replace_all(stripped.trim(), "_").into_owned()
}
