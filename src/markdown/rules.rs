//! Built-in grammar rules
//!
//! The default rule inventory the extensions order themselves against:
//! block stage `blank_line`, `block_quote`, `list`, `paragraph` (the
//! catch-all, always last) and inline stage `link`, `emphasis`. Handlers
//! follow the stage handler contracts in `block` / `inline`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::block::{BlockHandler, BlockParser, BlockState};
use super::inline::{InlineHandler, InlineParser, InlineState};
use super::registry::{Pattern, RuleMatch, RuleSet};
use super::token::Token;

static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:[ \t]*\n|[ \t]+$)+").unwrap());
static BLOCK_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?: {0,3}>[^\n]*(?:\n|$))+").unwrap());
static LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?: {0,3}[-*+][ \t][^\n]*(?:\n|$))+").unwrap());
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\n]+(?:\n|$)").unwrap());

/// Lines that can begin another block construct and therefore interrupt a
/// paragraph: blanks, quote leads, list bullets, block-math fences.
static PARAGRAPH_INTERRUPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[ \t]*$| {0,3}(?:>|[-*+][ \t])|\$\$)").unwrap());

static LIST_ITEM_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}[-*+][ \t]+").unwrap());

static AUTOLINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<((?:https?|ftp)://[^<>\s]+)>").unwrap());
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\n]+?)\*").unwrap());

/// Register the default block rules in evaluation order
pub fn register_default_block_rules(rules: &mut RuleSet<BlockHandler>) {
    rules
        .register(
            "blank_line",
            Some(Pattern::from_regex(BLANK_LINE.clone())),
            parse_blank_line,
            None,
        )
        .expect("built-in block rules are well-formed");
    rules
        .register(
            "block_quote",
            Some(Pattern::from_regex(BLOCK_QUOTE.clone())),
            parse_block_quote,
            None,
        )
        .expect("built-in block rules are well-formed");
    rules
        .register(
            "list",
            Some(Pattern::from_regex(LIST.clone())),
            parse_list,
            None,
        )
        .expect("built-in block rules are well-formed");
    rules
        .register(
            "paragraph",
            Some(Pattern::from_regex(PARAGRAPH.clone())),
            parse_paragraph,
            None,
        )
        .expect("built-in block rules are well-formed");
}

/// Register the default inline rules in evaluation order
pub fn register_default_inline_rules(rules: &mut RuleSet<InlineHandler>) {
    rules
        .register(
            "link",
            Some(Pattern::from_regex(AUTOLINK.clone())),
            parse_autolink,
            None,
        )
        .expect("built-in inline rules are well-formed");
    rules
        .register(
            "emphasis",
            Some(Pattern::from_regex(EMPHASIS.clone())),
            parse_emphasis,
            None,
        )
        .expect("built-in inline rules are well-formed");
}

fn parse_blank_line(_: &BlockParser, m: &RuleMatch, _: &mut BlockState) -> usize {
    m.end
}

/// Generic quote-run handler: extract, strip leads, recurse. The aside
/// extension replaces this handler (same pattern, same registry slot)
/// with a classifying variant.
pub fn parse_block_quote(block: &BlockParser, m: &RuleMatch, state: &mut BlockState) -> usize {
    let (text, end_pos) = block.extract_block_quote(m, state);

    let mut child = state.child_state(text);
    let mut rules = block.rule_names();
    if state.depth() >= block.max_nested_level - 1 {
        rules.retain(|name| name != "block_quote");
    }
    block.parse(&mut child, &rules);

    let token = Token::container("block_quote", child.into_tokens());
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

fn parse_list(_: &BlockParser, m: &RuleMatch, state: &mut BlockState) -> usize {
    let items = m
        .text
        .lines()
        .map(|line| Token::leaf("list_item", LIST_ITEM_LEAD.replace(line, "").into_owned()))
        .collect();
    state.append_token(Token::container("list", items));
    m.end
}

fn parse_paragraph(_: &BlockParser, m: &RuleMatch, state: &mut BlockState) -> usize {
    let mut lines = vec![m.text.trim_end_matches('\n').to_string()];
    let mut end = m.end;

    // lazy continuation: pull in following lines until one can begin
    // another block construct
    loop {
        let rest = &state.src()[end..];
        if rest.is_empty() {
            break;
        }
        let (line, consumed) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        if PARAGRAPH_INTERRUPT.is_match(line) {
            break;
        }
        lines.push(line.to_string());
        end += consumed;
    }

    state.append_token(Token::leaf("paragraph", lines.join("\n")));
    end
}

fn parse_autolink(_: &InlineParser, m: &RuleMatch, state: &mut InlineState) -> usize {
    let url = m.inner.clone().unwrap_or_default();
    state.append_token(Token::leaf("link", url));
    m.end
}

fn parse_emphasis(_: &InlineParser, m: &RuleMatch, state: &mut InlineState) -> usize {
    let text = m.inner.clone().unwrap_or_default();
    state.append_token(Token::leaf("emphasis", text));
    m.end
}
