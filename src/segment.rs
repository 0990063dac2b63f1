//! Line segmenter
//!
//! Splits an annotated source listing into alternating (label, code)
//! segments given a comment marker. A label is a maximal run of
//! marker-prefixed lines, joined with single spaces; its code body is the
//! maximal run of following non-marker lines with trailing blank lines
//! trimmed. Lines before the first marker form a label-less segment. The
//! segmenter is pure and independent of the markup pipeline; callers
//! typically feed each label through the markdown engine afterwards.
//!
//! An empty comment marker makes every line a comment line (every string
//! starts with the empty string), so the whole input collapses into one
//! all-label segment.

use serde::Serialize;

/// One (label, code-body) segment of an annotated listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Joined comment text, empty for code-only segments
    pub label: String,
    /// Code lines, kept verbatim
    pub body: Vec<String>,
}

/// Split `lines` into ordered segments.
///
/// Input consisting only of blank lines yields an empty list; every loop
/// is bounds-checked, there is no failure mode.
pub fn segment<S: AsRef<str>>(lines: &[S], comment_marker: &str) -> Vec<Segment> {
    let is_blank = |i: usize| lines[i].as_ref().trim().is_empty();
    let is_comment = |i: usize| {
        lines[i]
            .as_ref()
            .trim_start()
            .starts_with(comment_marker)
    };

    let mut segments = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        while i < lines.len() && is_blank(i) {
            i += 1;
        }
        if i >= lines.len() {
            break;
        }

        let mut label_lines: Vec<String> = Vec::new();
        if is_comment(i) {
            while i < lines.len() && is_comment(i) {
                let trimmed = lines[i].as_ref().trim();
                label_lines.push(trimmed[comment_marker.len()..].trim_start().to_string());
                i += 1;
            }
        }

        let mut body: Vec<String> = Vec::new();
        while i < lines.len() && !is_comment(i) {
            body.push(lines[i].as_ref().to_string());
            i += 1;
        }
        while body.last().is_some_and(|line| line.trim().is_empty()) {
            body.pop();
        }

        segments.push(Segment {
            label: label_lines.join(" "),
            body,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(label: &str, body: &[&str]) -> Segment {
        Segment {
            label: label.to_string(),
            body: body.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_label_then_code_then_trailing_label() {
        let lines = ["# hello", "# world", "code1", "", "code2", "# bye"];
        assert_eq!(
            segment(&lines, "#"),
            vec![
                seg("hello world", &["code1", "", "code2"]),
                seg("bye", &[]),
            ]
        );
    }

    #[test]
    fn test_no_marker_lines_is_one_code_segment() {
        let lines = ["fn main() {", "    body();", "}"];
        assert_eq!(
            segment(&lines, "//"),
            vec![seg("", &["fn main() {", "    body();", "}"])]
        );
    }

    #[test]
    fn test_blank_only_input_yields_nothing() {
        let lines = ["", "   ", "\t"];
        assert!(segment(&lines, "#").is_empty());
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let lines: [&str; 0] = [];
        assert!(segment(&lines, "#").is_empty());
    }

    #[test]
    fn test_leading_blanks_are_skipped() {
        let lines = ["", "", "# label", "code"];
        assert_eq!(segment(&lines, "#"), vec![seg("label", &["code"])]);
    }

    #[test]
    fn test_marker_and_one_space_stripped() {
        let lines = ["//   spaced out", "code"];
        assert_eq!(segment(&lines, "//"), vec![seg("spaced out", &["code"])]);
    }

    #[test]
    fn test_indented_comment_lines_count() {
        let lines = ["    # indented label", "code"];
        assert_eq!(
            segment(&lines, "#"),
            vec![seg("indented label", &["code"])]
        );
    }

    #[test]
    fn test_code_first_then_label() {
        let lines = ["setup()", "", "# explain", "run()"];
        assert_eq!(
            segment(&lines, "#"),
            vec![seg("", &["setup()"]), seg("explain", &["run()"])]
        );
    }

    #[test]
    fn test_empty_marker_treats_every_line_as_comment() {
        let lines = ["alpha", "beta"];
        assert_eq!(segment(&lines, ""), vec![seg("alpha beta", &[])]);
    }

    #[test]
    fn test_bare_marker_line_contributes_empty_label_part() {
        let lines = ["# a", "#", "# b", "x"];
        assert_eq!(segment(&lines, "#"), vec![seg("a  b", &["x"])]);
    }
}
