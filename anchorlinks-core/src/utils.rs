//! String patterns shared by slug, aria-label and title generation.
//!
//! Each stripping rule lives in its own function so it can be tested on its
//! own. These are best-effort pattern matches over already-parsed inline
//! content, not parsers.
use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

/// Compile a pattern, logging and falling back to a never-matching regex if
/// compilation fails.
fn compile(name: &str, pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!(
      "Failed to compile {name} regex: {e}\n Falling back to never matching \
       regex."
    );
    never_matching_regex()
  })
}

static TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| compile("TAG_RE", r"</?[^>]*>"));
static ALIAS_RE: LazyLock<Regex> =
  LazyLock::new(|| compile("ALIAS_RE", r"\(\(#.*?\)\)"));
/// An alias token with the whitespace before it; group 1 holds the names,
/// e.g. `#foo, #bar`.
pub(crate) static ALIAS_TOKEN_RE: LazyLock<Regex> =
  LazyLock::new(|| compile("ALIAS_TOKEN_RE", r"\s*\(\((#.*?)\)\)"));
static WHITESPACE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile("WHITESPACE_RE", r"\s+"));
static NON_WORD_RE: LazyLock<Regex> =
  LazyLock::new(|| compile("NON_WORD_RE", r"\W+"));
static HYPHENS_RE: LazyLock<Regex> =
  LazyLock::new(|| compile("HYPHENS_RE", r"-+"));

/// Remove tag-shaped markup such as `<a href="x">` and `</a>`.
///
/// A `<` without a closing `>` is left alone.
#[must_use]
pub fn strip_tags(text: &str) -> Cow<'_, str> {
  TAG_RE.replace_all(text, "")
}

/// Remove every `((#alias, ...))` token.
#[must_use]
pub fn strip_aliases(text: &str) -> Cow<'_, str> {
  ALIAS_RE.replace_all(text, "")
}

/// Strip tags, then alias tokens. Slugs, aria labels and titles all start
/// from this.
#[must_use]
pub fn strip_markup(text: &str) -> String {
  strip_aliases(&strip_tags(text)).into_owned()
}

/// Replace every whitespace run with a single space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> Cow<'_, str> {
  WHITESPACE_RE.replace_all(text, " ")
}

/// Replace every run of non-word characters with `sep`.
///
/// Word characters are Unicode letters, marks, digits and connector
/// punctuation such as `_`.
#[must_use]
pub fn replace_non_word<'t>(text: &'t str, sep: &str) -> Cow<'t, str> {
  NON_WORD_RE.replace_all(text, sep)
}

/// Replace every run of `-` with a single `-`.
#[must_use]
pub fn collapse_hyphens(text: &str) -> Cow<'_, str> {
  HYPHENS_RE.replace_all(text, "-")
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn strips_balanced_and_self_closing_tags() {
    assert_eq!(strip_tags("foo <a href=\"x\">bar</a>"), "foo bar");
    assert_eq!(strip_tags("a<br/>b"), "ab");
    assert_eq!(strip_tags("<Tabs>"), "");
  }

  #[test]
  fn leaves_unterminated_brackets() {
    assert_eq!(strip_tags("foo bar <wow&:[]'"), "foo bar <wow&:[]'");
    assert_eq!(strip_tags("a > b"), "a > b");
  }

  #[test]
  fn strips_alias_tokens_non_greedily() {
    assert_eq!(strip_aliases("foo ((#bar)) baz ((#qux))"), "foo  baz ");
    assert_eq!(strip_aliases("foo ((#a, #b))"), "foo ");
    assert_eq!(strip_aliases("foo ((bar))"), "foo ((bar))");
    assert_eq!(strip_aliases("foo ((#open"), "foo ((#open");
  }

  #[test]
  fn strip_markup_removes_tags_before_aliases() {
    assert_eq!(strip_markup("x <b>((#y))</b>"), "x ");
  }

  #[test]
  fn collapses_runs() {
    assert_eq!(collapse_whitespace("a \t\n b"), "a b");
    assert_eq!(collapse_hyphens("a---b-c"), "a-b-c");
  }

  #[test]
  fn non_word_runs_keep_unicode_letters() {
    assert_eq!(replace_non_word("foo, bar!", "-"), "foo-bar-");
    assert_eq!(replace_non_word("snake_case", "-"), "snake_case");
    assert_eq!(replace_non_word("привет мир", " "), "привет мир");
    assert_eq!(replace_non_word("你好 (世界)", "-"), "你好-世界-");
  }

  #[test]
  fn alias_token_captures_names_and_leading_space() {
    let caps = ALIAS_TOKEN_RE
      .captures("Install  ((#setup, #get-started)) now")
      .unwrap();
    assert_eq!(&caps[0], "  ((#setup, #get-started))");
    assert_eq!(&caps[1], "#setup, #get-started");
    assert!(!ALIAS_TOKEN_RE.is_match("((setup))"));
  }

  #[test]
  fn never_matching_regex_never_matches() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything at all"));
  }
}
