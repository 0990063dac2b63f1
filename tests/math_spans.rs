//! Integration tests for the math extension
//!
//! Exercises the delimiter rules: block math wins over inline math for
//! doubled markers, the no-adjacent-marker rule, single-line inline
//! spans, and literal fallthrough for unmatched delimiters.

use exmark::markdown::{extensions, Markdown};

fn engine() -> Markdown {
    let mut md = Markdown::html();
    md.install(extensions::math).unwrap();
    md
}

#[test]
fn test_inline_math_round_trip() {
    let md = engine();
    let html = md.convert("area of $x^2$ squares\n").unwrap();
    // rendered form carries the expression but none of the markers
    assert!(html.contains("x^2"));
    assert!(!html.contains('$'));
    assert_eq!(
        html,
        "<p>area of <span class=\"math math-inline\">x^2</span> squares</p>\n"
    );
}

#[test]
fn test_double_markers_are_block_math_not_two_inline() {
    let md = engine();
    let tokens = md.parse("$$a+b$$\n");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind(), "block_math");
    assert_eq!(tokens[0].raw(), Some("a+b"));
}

#[test]
fn test_adjacent_marker_rule_yields_single_match() {
    let md = engine();
    let tokens = md.parse("$a$$b$\n");
    let children = tokens[0].children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].kind(), "inline_math");
    assert_eq!(children[0].raw(), Some("a"));
    assert_eq!(children[1].kind(), "text");
    assert_eq!(children[1].raw(), Some("$b$"));
}

#[test]
fn test_multiline_block_math() {
    let md = engine();
    let html = md.convert("$$\n\\frac{a}{b}\n$$\n").unwrap();
    assert_eq!(
        html,
        "<div class=\"math math-display\">\n\\frac{a}{b}\n</div>\n"
    );
}

#[test]
fn test_block_math_registered_before_list() {
    // the order hint matters: a `$$` line must not be swallowed by the
    // paragraph-or-list fallthrough
    let md = engine();
    let names = md.block.rule_names();
    let math_pos = names.iter().position(|n| n == "block_math").unwrap();
    let list_pos = names.iter().position(|n| n == "list").unwrap();
    assert!(math_pos < list_pos);
}

#[test]
fn test_inline_math_registered_before_link() {
    let md = engine();
    let names = md.inline.rule_names();
    let math_pos = names.iter().position(|n| n == "inline_math").unwrap();
    let link_pos = names.iter().position(|n| n == "link").unwrap();
    assert!(math_pos < link_pos);
}

#[test]
fn test_unterminated_block_math_falls_through_to_text() {
    let md = engine();
    let html = md.convert("$$a+b\n").unwrap();
    // no closing delimiter: the markers stay literal
    assert_eq!(html, "<p>$$a+b</p>\n");
}

#[test]
fn test_math_between_paragraphs() {
    let md = engine();
    let html = md.convert("before\n\n$$x$$\n\nafter\n").unwrap();
    assert_eq!(
        html,
        "<p>before</p>\n<div class=\"math math-display\">x</div>\n<p>after</p>\n"
    );
}

#[test]
fn test_math_content_is_escaped() {
    let md = engine();
    let html = md.convert("$a < b$\n").unwrap();
    assert!(html.contains("a &lt; b"));
}

#[test]
fn test_math_inside_aside() {
    let mut md = Markdown::html();
    md.install(extensions::math).unwrap();
    md.install(extensions::aside).unwrap();
    let html = md.convert(">! uses $x_i$ inside\n").unwrap();
    assert_eq!(
        html,
        "<aside>\n<p>uses <span class=\"math math-inline\">x_i</span> inside</p>\n</aside>\n"
    );
}
