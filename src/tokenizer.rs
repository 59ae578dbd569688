//! Rule and URL tokenizer.
//!
//! Splits a rule pattern or URL into a flat sequence of tokens: recognized
//! separators become single tokens of their own, and the maximal runs
//! between them become opaque literal tokens. Separators get their own trie
//! steps so that `^` can match any one of them and `.` can act as a label
//! boundary during hostname matching.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens recognized as separators: the `https`/`http` scheme prefixes at
/// the start of the input, the `://` scheme delimiter, and the single
/// characters `. - _ / ? = & : ^`. Leftmost alternative wins, so `://` is
/// preferred over a bare `:`.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^https|^http|\.|-|_|://|/|\?|=|&|:|\^)")
        .expect("TOKEN_PATTERN: hardcoded regex is invalid")
});

/// Separator character class used by the `^` operator.
/// According to <https://adguard.com/kb/general/ad-filtering/create-own-filters/#basic-rules-special-characters>
/// "Separator character is any character, but a letter, a digit, or one of
/// the following: `_ - . %`. The end of the address is also accepted as
/// separator."
static SEPARATOR_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-zA-Z0-9]|[_\-.%]").expect("SEPARATOR_CLASS: hardcoded regex is invalid")
});

/// Split `s` into its token sequence.
///
/// The tokens borrow from `s`, preserve source order, and concatenate back
/// to `s` exactly. No token is empty.
pub fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut next_start = 0;

    for separator in TOKEN_PATTERN.find_iter(s) {
        if separator.start() > next_start {
            tokens.push(&s[next_start..separator.start()]);
        }
        tokens.push(separator.as_str());
        next_start = separator.end();
    }

    if next_start < s.len() {
        tokens.push(&s[next_start..]);
    }

    tokens
}

/// True if `token` contains any separator-class character.
pub(crate) fn is_separator_token(token: &str) -> bool {
    SEPARATOR_CLASS.is_match(token)
}
