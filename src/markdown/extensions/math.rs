//! Math spans
//!
//! Block math is `$$ ... $$` on its own enclosing pair (content may span
//! lines, matched lazily) and registers before the generic `list` rule.
//! Inline math is `$ ... $` within a single line and registers before the
//! generic `link` rule. An opening `$` immediately preceded by another
//! `$` never starts an inline span, so inline math cannot fire inside a
//! block-math delimiter; an unterminated delimiter simply fails to match
//! and stays literal text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markdown::block::{BlockParser, BlockState};
use crate::markdown::engine::Markdown;
use crate::markdown::inline::{InlineParser, InlineState};
use crate::markdown::registry::{ConfigurationError, OrderHint, Pattern, RuleMatch};
use crate::markdown::token::Token;

static BLOCK_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").unwrap());
static INLINE_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([^$\r\n]+?)\$").unwrap());

/// Install the math extension
pub fn math(md: &mut Markdown) -> Result<(), ConfigurationError> {
    md.block.rules.register(
        "block_math",
        Some(Pattern::from_regex(BLOCK_MATH.clone())),
        parse_block_math,
        Some(OrderHint::before("list")),
    )?;
    md.inline.rules.register(
        "inline_math",
        Some(Pattern::from_regex(INLINE_MATH.clone()).with_guard(opener_not_doubled)),
        parse_inline_math,
        Some(OrderHint::before("link")),
    )?;
    if let Some(renderer) = md.renderer.as_mut() {
        if renderer.name() == "html" {
            renderer.register("block_math", render_block_math);
            renderer.register("inline_math", render_inline_math);
        }
    }
    Ok(())
}

/// The delimiter-collision rule: a single-marker opener must not be
/// immediately preceded by a second marker character.
fn opener_not_doubled(src: &str, start: usize, _end: usize) -> bool {
    start == 0 || src.as_bytes()[start - 1] != b'$'
}

fn parse_block_math(_: &BlockParser, m: &RuleMatch, state: &mut BlockState) -> usize {
    let text = m.inner.clone().unwrap_or_default();
    state.append_token(Token::leaf("block_math", text));
    // consume the line break after the closing delimiter, if any
    if state.src()[m.end..].starts_with('\n') {
        m.end + 1
    } else {
        m.end
    }
}

fn parse_inline_math(_: &InlineParser, m: &RuleMatch, state: &mut InlineState) -> usize {
    let text = m.inner.clone().unwrap_or_default();
    state.append_token(Token::leaf("inline_math", text));
    m.end
}

fn render_block_math(text: &str) -> String {
    format!(
        "<div class=\"math math-display\">{}</div>\n",
        html_escape::encode_text(text)
    )
}

fn render_inline_math(text: &str) -> String {
    format!(
        "<span class=\"math math-inline\">{}</span>",
        html_escape::encode_text(text)
    )
}
