//! Asides
//!
//! Syntax inspired by stackexchange spoilers: a block quote whose every
//! line uses `>!` instead of `>`:
//!
//! ```text
//! >! this is an aside
//! >!
//! >! it will be placed in a sidebar
//! ```
//!
//! The extension replaces the built-in `block_quote` rule (same pattern,
//! same registry slot) with a classifying handler: a matched quote run is
//! extracted with the generic quote primitive, and if the whole stripped
//! run carries the stricter `!` lead at nesting depth zero it becomes an
//! `aside` container, otherwise a plain `block_quote`. Classification
//! happens once per container; a nested run is never reclassified.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markdown::block::{BlockParser, BlockState};
use crate::markdown::engine::Markdown;
use crate::markdown::registry::{ConfigurationError, RuleMatch};
use crate::markdown::token::Token;

static ASIDE_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ {0,3}! ?").unwrap());
static ASIDE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?: {0,3}![^\n]*\n)+$").unwrap());

/// Install the aside extension
pub fn aside(md: &mut Markdown) -> Result<(), ConfigurationError> {
    md.block.rules.register("block_quote", None, parse_aside, None)?;
    if let Some(renderer) = md.renderer.as_mut() {
        if renderer.name() == "html" {
            renderer.register("aside", render_aside);
        }
    }
    Ok(())
}

pub fn parse_aside(block: &BlockParser, m: &RuleMatch, state: &mut BlockState) -> usize {
    let (mut text, end_pos) = block.extract_block_quote(m, state);
    if !text.ends_with('\n') {
        // the run matcher requires every line to be newline-terminated
        text.push('\n');
    }

    let kind = if state.depth() == 0 && ASIDE_RUN.is_match(&text) {
        text = ASIDE_LEAD.replace_all(&text, "").into_owned();
        "aside"
    } else {
        "block_quote"
    };

    let mut child = state.child_state(text);
    let mut rules = block.rule_names();
    if state.depth() >= block.max_nested_level - 1 {
        rules.retain(|name| name != "block_quote");
    }
    block.parse(&mut child, &rules);

    let token = Token::container(kind, child.into_tokens());
    match end_pos {
        Some(end) => {
            state.prepend_token(token);
            end
        }
        None => {
            state.append_token(token);
            state.cursor()
        }
    }
}

fn render_aside(text: &str) -> String {
    format!("<aside>\n{text}</aside>\n")
}
