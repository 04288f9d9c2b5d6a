use once_cell::sync::Lazy;
use regex::Regex;

// Literal patterns.
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("html tag pattern"));
static NON_ALPHA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z]").expect("non-alphabetic pattern"));

/// Turns a raw review into lower-case words.
///
/// Tags are removed first (non-greedy, so text between two tags is kept),
/// then every character outside `a-zA-Z` becomes a separator.
pub fn clean_review(text: &str) -> Vec<String> {
    let without_tags = HTML_TAG.replace_all(text, "");
    let letters_only = NON_ALPHA.replace_all(&without_tags, " ");
    letters_only
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn clean_reviews<S: AsRef<str>>(texts: &[S]) -> Vec<Vec<String>> {
    texts.iter().map(|t| clean_review(t.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_without_swallowing_text_between_them() {
        let words = clean_review("One <br /><br />Two <i>three</i> four");
        assert_eq!(words, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn tags_are_removed_without_a_separator() {
        let words = clean_review("One<br /><br />Two <i>three</i>four");
        assert_eq!(words, vec!["onetwo", "threefour"]);
    }

    #[test]
    fn non_letters_become_separators() {
        let words = clean_review("It's 10/10... A MUST-see!");
        assert_eq!(words, vec!["it", "s", "a", "must", "see"]);
    }

    #[test]
    fn empty_and_symbol_only_text_yield_no_words() {
        assert!(clean_review("").is_empty());
        assert!(clean_review("<p>123 !!</p>").is_empty());
    }

    #[test]
    fn unicode_letters_are_dropped() {
        assert_eq!(clean_review("café noël"), vec!["caf", "no", "l"]);
    }
}
