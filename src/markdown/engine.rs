//! Markdown engine
//!
//! Ties the block parser, inline parser and renderer together and is the
//! shared configuration object grammar extensions register against. A
//! parse runs in two passes: the block pass builds the token tree, then
//! the inline pass rewrites the raw text of inline-bearing block leaves
//! (paragraphs, list items) into inline token children.

use std::collections::HashSet;

use super::block::BlockParser;
use super::inline::InlineParser;
use super::registry::ConfigurationError;
use super::render::{RenderError, Renderer};
use super::token::Token;

/// Extension entry point: performs its `register` calls against the
/// shared engine and, when the output mode warrants it, its render-side
/// wiring.
pub type Extension = fn(&mut Markdown) -> Result<(), ConfigurationError>;

pub struct Markdown {
    pub block: BlockParser,
    pub inline: InlineParser,
    /// `None` means token-tree output only; extensions skip their
    /// render-side wiring in that mode
    pub renderer: Option<Renderer>,
    inline_block_kinds: HashSet<String>,
}

impl Markdown {
    /// Engine with default rules and the given renderer (or none)
    pub fn new(renderer: Option<Renderer>) -> Self {
        let inline_block_kinds = ["paragraph", "list_item"]
            .into_iter()
            .map(String::from)
            .collect();
        Markdown {
            block: BlockParser::with_defaults(),
            inline: InlineParser::with_defaults(),
            renderer,
            inline_block_kinds,
        }
    }

    /// Engine rendering to HTML
    pub fn html() -> Self {
        Self::new(Some(Renderer::html()))
    }

    /// Engine rendering back to plain text
    pub fn plain() -> Self {
        Self::new(Some(Renderer::plain()))
    }

    /// Engine producing token trees only
    pub fn tokens_only() -> Self {
        Self::new(None)
    }

    /// Install a grammar extension
    pub fn install(&mut self, extension: Extension) -> Result<&mut Self, ConfigurationError> {
        extension(self)?;
        Ok(self)
    }

    /// Declare a block leaf kind whose raw text receives inline parsing
    pub fn mark_inline_block(&mut self, kind: impl Into<String>) {
        self.inline_block_kinds.insert(kind.into());
    }

    /// Parse source text into a token tree
    pub fn parse(&self, src: &str) -> Vec<Token> {
        let tokens = self.block.parse_source(src);
        self.inline_pass(tokens)
    }

    /// Parse and render source text
    pub fn convert(&self, src: &str) -> Result<String, RenderError> {
        let tokens = self.parse(src);
        let renderer = self
            .renderer
            .as_ref()
            .ok_or(RenderError::RendererNotConfigured)?;
        renderer.render_tokens(&tokens)
    }

    fn inline_pass(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|token| match token {
                Token::Container { kind, children } => {
                    Token::container(kind, self.inline_pass(children))
                }
                Token::Leaf { kind, raw } if self.inline_block_kinds.contains(&kind) => {
                    Token::container(kind, self.inline.parse(&raw))
                }
                leaf => leaf,
            })
            .collect()
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::registry::OrderHint;

    #[test]
    fn test_convert_paragraph_to_html() {
        let md = Markdown::html();
        assert_eq!(md.convert("hello\n").unwrap(), "<p>hello</p>\n");
    }

    #[test]
    fn test_convert_without_renderer_is_an_error() {
        let md = Markdown::tokens_only();
        assert_eq!(
            md.convert("hello\n"),
            Err(RenderError::RendererNotConfigured)
        );
    }

    #[test]
    fn test_inline_pass_reaches_nested_containers() {
        let md = Markdown::html();
        let html = md.convert("> quoted *emphasis*\n").unwrap();
        assert_eq!(
            html,
            "<blockquote>\n<p>quoted <em>emphasis</em></p>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_list_items_get_inline_parsing() {
        let md = Markdown::html();
        let html = md.convert("- plain\n- *shiny*\n").unwrap();
        assert_eq!(
            html,
            "<ul>\n<li>plain</li>\n<li><em>shiny</em></li>\n</ul>\n"
        );
    }

    #[test]
    fn test_install_surfaces_configuration_errors() {
        fn broken(md: &mut Markdown) -> Result<(), ConfigurationError> {
            md.block.rules.register(
                "custom",
                Some(crate::markdown::registry::Pattern::new("x").unwrap()),
                |_, m, _| m.end,
                Some(OrderHint::before("no_such_rule")),
            )
        }
        let mut md = Markdown::html();
        assert!(md.install(broken).is_err());
    }
}
