//! Inline-stage scanner
//!
//! Scans a run of text left to right against the inline rules and emits a
//! mixed sequence of plain-text tokens and inline leaf tokens. At each
//! step the earliest match across all rules wins (ties go to registry
//! order); the unmatched region before it is accumulated as plain text.

use super::registry::{RuleMatch, RuleSet, Stage};
use super::rules;
use super::token::Token;

/// Inline-stage handler: mutates the token sequence and returns the new
/// cursor (past the full matched span, delimiters included).
pub type InlineHandler = fn(&InlineParser, &RuleMatch, &mut InlineState) -> usize;

/// Mutable state of one inline scan.
pub struct InlineState {
    src: String,
    cursor: usize,
    tokens: Vec<Token>,
}

impl InlineState {
    pub fn new(src: impl Into<String>) -> Self {
        InlineState {
            src: src.into(),
            cursor: 0,
            tokens: Vec::new(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn append_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

/// Rule-driven inline parser.
pub struct InlineParser {
    pub rules: RuleSet<InlineHandler>,
}

impl InlineParser {
    /// Empty parser with no rules
    pub fn new() -> Self {
        InlineParser {
            rules: RuleSet::new(Stage::Inline),
        }
    }

    /// Parser with the built-in inline rules registered
    pub fn with_defaults() -> Self {
        let mut parser = Self::new();
        rules::register_default_inline_rules(&mut parser.rules);
        parser
    }

    /// All rule names in evaluation order
    pub fn rule_names(&self) -> Vec<String> {
        self.rules.rule_names()
    }

    /// Scan a text run into inline tokens
    pub fn parse(&self, text: &str) -> Vec<Token> {
        let mut state = InlineState::new(text);
        self.scan(&mut state);
        state.into_tokens()
    }

    fn scan(&self, state: &mut InlineState) {
        while state.cursor < state.src.len() {
            let before = state.cursor;

            // earliest match wins; registry order breaks ties
            let mut best: Option<(RuleMatch, InlineHandler)> = None;
            for rule in self.rules.iter() {
                if let Some(m) = rule.pattern.find_from(&state.src, before) {
                    let better = match &best {
                        Some((b, _)) => m.start < b.start,
                        None => true,
                    };
                    if better {
                        best = Some((m, rule.handler));
                    }
                }
            }

            let (m, handler) = match best {
                Some(found) => found,
                None => {
                    let text = state.src[before..].to_string();
                    state.append_token(Token::leaf("text", text));
                    state.cursor = state.src.len();
                    return;
                }
            };

            if m.start > before {
                let text = state.src[before..m.start].to_string();
                state.append_token(Token::leaf("text", text));
            }

            let end = handler(self, &m, state);
            state.cursor = if end > before {
                end
            } else {
                // progress guard against a handler reporting no span
                next_char_boundary(&state.src, m.end.max(before))
            };
        }
    }
}

impl Default for InlineParser {
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
