//! Block-stage recursive-descent parser
//!
//! Converts a text buffer into an ordered sequence of block tokens by
//! trying the block rules in registry order at each cursor position.
//! Container rules (block quote, aside) recurse into their stripped inner
//! text through a child state at `depth + 1`; recursion is bounded by
//! `max_nested_level`, past which the container rule is withheld from the
//! child's rule subset.

use once_cell::sync::Lazy;
use regex::Regex;

use super::registry::{RuleMatch, RuleSet, Stage};
use super::rules;
use super::token::Token;

/// Block-stage handler: receives the match and the live parse state,
/// mutates the state's token sequence, and returns the new cursor.
pub type BlockHandler = fn(&BlockParser, &RuleMatch, &mut BlockState) -> usize;

/// Quote lead: up to three spaces of indent, the lead character, and at
/// most one following space.
static QUOTE_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^ {0,3}> ?").unwrap());

/// Mutable state of one in-flight block parse.
///
/// A state is owned by exactly one parse call. Container handlers create
/// a child state for the container's inner text, parse into it, and
/// attach the child's finished token list to the container token; nothing
/// else flows back to the parent.
pub struct BlockState {
    src: String,
    cursor: usize,
    depth: usize,
    tokens: Vec<Token>,
}

impl BlockState {
    /// Fresh top-level state at depth zero
    pub fn new(src: impl Into<String>) -> Self {
        BlockState {
            src: src.into(),
            cursor: 0,
            depth: 0,
            tokens: Vec::new(),
        }
    }

    /// Child state over a container's inner text, one level deeper
    pub fn child_state(&self, src: impl Into<String>) -> Self {
        BlockState {
            src: src.into(),
            cursor: 0,
            depth: self.depth + 1,
            tokens: Vec::new(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos;
    }

    /// Container nesting depth of this state (0 at top level)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Append a token at the current level
    pub fn append_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Insert a token before everything accumulated at the current level.
    /// Used when a matched span logically preceded already-consumed
    /// content (a quote extraction that reports an explicit earlier end).
    pub fn prepend_token(&mut self, token: Token) {
        self.tokens.insert(0, token);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

/// Rule-driven block parser.
pub struct BlockParser {
    pub rules: RuleSet<BlockHandler>,
    /// Maximum container nesting level; at `depth >= max_nested_level - 1`
    /// the container rule is excluded from child rule subsets.
    pub max_nested_level: usize,
}

impl BlockParser {
    /// Empty parser with no rules
    pub fn new() -> Self {
        BlockParser {
            rules: RuleSet::new(Stage::Block),
            max_nested_level: 4,
        }
    }

    /// Parser with the built-in block rules registered
    pub fn with_defaults() -> Self {
        let mut parser = Self::new();
        rules::register_default_block_rules(&mut parser.rules);
        parser
    }

    /// All rule names in evaluation order
    pub fn rule_names(&self) -> Vec<String> {
        self.rules.rule_names()
    }

    /// Parse a source buffer with the full rule set
    pub fn parse_source(&self, src: &str) -> Vec<Token> {
        let mut state = BlockState::new(src);
        let names = self.rule_names();
        self.parse(&mut state, &names);
        state.into_tokens()
    }

    /// Drive the given rule subset over the state until the input is
    /// exhausted. At each cursor position the first rule whose pattern
    /// matches right at the cursor wins; its handler consumes the span
    /// and returns the new cursor.
    pub fn parse(&self, state: &mut BlockState, rule_subset: &[String]) {
        while state.cursor() < state.src.len() {
            let before = state.cursor();
            let mut claimed = false;

            for name in rule_subset {
                let rule = match self.rules.get(name) {
                    Some(rule) => rule,
                    None => continue,
                };
                let m = match rule.pattern.match_at(&state.src, before) {
                    Some(m) => m,
                    None => continue,
                };
                let end = (rule.handler)(self, &m, state);
                state.set_cursor(end);
                claimed = true;
                break;
            }

            if !claimed {
                self.consume_fallback_line(state);
            }

            // progress guard: a handler that reports no consumed span must
            // not stall the parse
            if state.cursor() <= before {
                state.set_cursor(next_char_boundary(&state.src, before));
            }
        }
    }

    /// No rule claimed the position: consume the rest of the line as a
    /// paragraph so degenerate rule subsets still terminate with the text
    /// preserved.
    fn consume_fallback_line(&self, state: &mut BlockState) {
        let rest = &state.src[state.cursor()..];
        let (line, consumed) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        if !line.trim().is_empty() {
            let token = Token::leaf("paragraph", line);
            state.append_token(token);
        }
        let pos = state.cursor() + consumed;
        state.set_cursor(pos);
    }

    /// Extract the inner text of a matched quote run: strips the quote
    /// lead from every line and advances the cursor past the run.
    ///
    /// The second component is an explicit earlier end position. `None`
    /// means "no explicit end, continue from the current cursor" and the
    /// caller should append its token; `Some(p)` means the span logically
    /// ended at `p` and the caller should prepend its token and return
    /// `p`. The built-in quote pattern always consumes a full line run, so
    /// it reports `None`.
    pub fn extract_block_quote(
        &self,
        m: &RuleMatch,
        state: &mut BlockState,
    ) -> (String, Option<usize>) {
        let text = QUOTE_LEAD.replace_all(&m.text, "").into_owned();
        state.set_cursor(m.end);
        (text, None)
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn next_char_boundary(src: &str, pos: usize) -> usize {
    match src[pos..].chars().next() {
        Some(c) => pos + c.len_utf8(),
        None => src.len(),
    }
}
