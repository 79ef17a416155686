//! Extraction of the VM's reported result.
//!
//! The VM reports its final stack-top value with a line of the form
//! `Top of stack: <int>`. The grammar accepted here is:
//!
//! ```text
//! report := "Top of stack: " "-"? [0-9]+
//! ```
//!
//! The label may appear anywhere in the captured text. When it appears more
//! than once, the first occurrence is used.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// The literal label preceding the reported value.
pub const TOP_OF_STACK_LABEL: &str = "Top of stack: ";

// `[0-9]` rather than `\d`: the regex crate's `\d` matches any Unicode digit.
static TOP_OF_STACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Top of stack: (-?[0-9]+)").expect("top-of-stack pattern is valid")
});

/// Why the captured output did not yield a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no `Top of stack: <int>` line in output")]
    MissingLabel,
    #[error("reported value `{0}` does not fit in a 64-bit integer")]
    OutOfRange(String),
}

/// Returns the value of the first `Top of stack: <int>` occurrence in `text`.
pub fn parse_top_of_stack(text: &str) -> Result<i64, ParseError> {
    let captures = TOP_OF_STACK
        .captures(text)
        .ok_or(ParseError::MissingLabel)?;
    let digits = &captures[1];
    digits
        .parse::<i64>()
        .map_err(|_| ParseError::OutOfRange(digits.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_value() {
        assert_eq!(parse_top_of_stack("Top of stack: 10\n"), Ok(10));
    }

    #[test]
    fn parses_negative_value() {
        assert_eq!(parse_top_of_stack("Top of stack: -5"), Ok(-5));
    }

    #[test]
    fn label_may_follow_other_output() {
        let text = "loading program\nhalted at pc=12\nTop of stack: 30\n";
        assert_eq!(parse_top_of_stack(text), Ok(30));
    }

    #[test]
    fn first_match_wins() {
        let text = "Top of stack: 1\nTop of stack: 2\n";
        assert_eq!(parse_top_of_stack(text), Ok(1));
    }

    #[test]
    fn missing_label_is_an_error() {
        assert_eq!(
            parse_top_of_stack("segmentation fault"),
            Err(ParseError::MissingLabel)
        );
        assert_eq!(parse_top_of_stack(""), Err(ParseError::MissingLabel));
    }

    #[test]
    fn label_without_digits_is_an_error() {
        assert_eq!(
            parse_top_of_stack("Top of stack: -\nTop of stack: x"),
            Err(ParseError::MissingLabel)
        );
    }

    #[test]
    fn label_is_case_sensitive() {
        assert_eq!(
            parse_top_of_stack("top of stack: 3"),
            Err(ParseError::MissingLabel)
        );
    }

    #[test]
    fn non_ascii_digits_are_not_accepted() {
        // U+0663 ARABIC-INDIC DIGIT THREE
        assert_eq!(
            parse_top_of_stack("Top of stack: \u{0663}"),
            Err(ParseError::MissingLabel)
        );
    }

    #[test]
    fn overflowing_value_is_reported() {
        let text = "Top of stack: 99999999999999999999";
        assert_eq!(
            parse_top_of_stack(text),
            Err(ParseError::OutOfRange("99999999999999999999".to_string()))
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "noise Top of stack: 42 more noise";
        let first = parse_top_of_stack(text);
        let second = parse_top_of_stack(text);
        assert_eq!(first, second);
        assert_eq!(first, Ok(42));
    }
}
