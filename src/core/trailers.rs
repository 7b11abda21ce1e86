//! Commit message trailer codec.
//!
//! heady keeps its metadata inside commit messages as `key: value` lines:
//!
//! ```text
//! Add the parser
//!
//! upstream: origin/parser
//! heady_label: heady-4
//! ```
//!
//! Other tools and humans read these lines, so the format is fixed. All
//! parsing and appending goes through this module.

pub const UPSTREAM_KEY: &str = "upstream";
pub const LABEL_KEY: &str = "heady_label";

/// All values of `key` found in the message body (the summary line is skipped).
pub fn parse_trailers(message: &str, key: &str) -> Vec<String> {
    message
        .lines()
        .skip(1)
        .filter_map(|line| parse_line(line, key))
        .collect()
}

pub fn upstreams(message: &str) -> Vec<String> {
    parse_trailers(message, UPSTREAM_KEY)
}

pub fn labels(message: &str) -> Vec<String> {
    parse_trailers(message, LABEL_KEY)
}

fn parse_line(line: &str, key: &str) -> Option<String> {
    let (line_key, value) = line.split_once(':')?;
    if line_key != key {
        return None;
    }
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn is_trailer_line(line: &str) -> bool {
    [UPSTREAM_KEY, LABEL_KEY]
        .iter()
        .any(|key| parse_line(line, key).is_some())
}

/// Append `key: value` to the message.
///
/// The new line joins an existing trailer block at the end of the message,
/// otherwise a blank line separates it from the body.
pub fn append_trailer(message: &str, key: &str, value: &str) -> String {
    let body = message.trim_end();
    let last_line = body.lines().last().unwrap_or("");
    let ends_with_trailers = body.lines().count() > 1 && is_trailer_line(last_line);

    let separator = if ends_with_trailers { "\n" } else { "\n\n" };
    format!("{body}{separator}{key}: {value}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upstreams_from_body() {
        let message = "Add parser\n\nSome body text.\n\nupstream: origin/parser\nupstream: fork/parser\n";
        assert_eq!(upstreams(message), vec!["origin/parser", "fork/parser"]);
    }

    #[test]
    fn test_parse_trims_value_and_ignores_other_keys() {
        let message = "Fix\n\nupstream:   origin/fix  \nheady_label: heady-3\nReviewed-by: someone\n";
        assert_eq!(upstreams(message), vec!["origin/fix"]);
        assert_eq!(labels(message), vec!["heady-3"]);
    }

    #[test]
    fn test_summary_line_is_not_a_trailer() {
        assert!(upstreams("upstream: origin/x").is_empty());
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let message = "Summary\n\nupstream: origin/feat:x\n";
        assert_eq!(upstreams(message), vec!["origin/feat:x"]);
    }

    #[test]
    fn test_empty_value_is_ignored() {
        assert!(upstreams("Summary\n\nupstream:\n").is_empty());
    }

    #[test]
    fn test_append_to_plain_message_adds_blank_line() {
        let appended = append_trailer("Add parser\n", UPSTREAM_KEY, "origin/parser");
        assert_eq!(appended, "Add parser\n\nupstream: origin/parser\n");
    }

    #[test]
    fn test_append_joins_existing_trailer_block() {
        let message = "Add parser\n\nupstream: origin/parser\n";
        let appended = append_trailer(message, LABEL_KEY, "heady-1");
        assert_eq!(
            appended,
            "Add parser\n\nupstream: origin/parser\nheady_label: heady-1\n"
        );
        assert_eq!(upstreams(&appended), vec!["origin/parser"]);
        assert_eq!(labels(&appended), vec!["heady-1"]);
    }
}
