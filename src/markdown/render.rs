//! Renderer dispatch
//!
//! Maps token type tags to render functions and walks a finished token
//! tree depth-first to produce output text. Containers render their
//! children first (left to right) and then apply their own render
//! function to the concatenated children output; leaves apply theirs to
//! the raw payload. A tag with no registered render function is an error,
//! never a silent skip: extensions load in varying combinations and a
//! missing renderer is a configuration mistake.

use std::collections::HashMap;
use std::fmt;

use super::token::Token;

/// Render function: pure text-to-text, no access to shared state.
pub type RenderFn = fn(&str) -> String;

/// Errors that can occur while rendering a token tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A token's type tag has no registered render function
    UnknownNodeType(String),
    /// Rendering was requested but no renderer is configured
    RendererNotConfigured,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownNodeType(kind) => {
                write!(f, "No render function registered for node type '{kind}'")
            }
            RenderError::RendererNotConfigured => {
                write!(f, "No renderer configured for this conversion")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Named render table for one output mode.
pub struct Renderer {
    name: &'static str,
    table: HashMap<String, RenderFn>,
}

impl Renderer {
    /// Empty renderer for a custom output mode
    pub fn empty(name: &'static str) -> Self {
        Renderer {
            name,
            table: HashMap::new(),
        }
    }

    /// HTML renderer with the built-in node types registered
    pub fn html() -> Self {
        let mut renderer = Renderer::empty("html");
        renderer.register("text", html_text);
        renderer.register("paragraph", html_paragraph);
        renderer.register("block_quote", html_block_quote);
        renderer.register("list", html_list);
        renderer.register("list_item", html_list_item);
        renderer.register("emphasis", html_emphasis);
        renderer.register("link", html_link);
        renderer
    }

    /// Plain-text renderer: reproduces source-shaped text, used when the
    /// host wants markup-free output back out
    pub fn plain() -> Self {
        let mut renderer = Renderer::empty("plain");
        renderer.register("text", plain_text);
        renderer.register("paragraph", plain_paragraph);
        renderer.register("block_quote", plain_block_quote);
        renderer.register("list", plain_list);
        renderer.register("list_item", plain_list_item);
        renderer.register("emphasis", plain_emphasis);
        renderer.register("link", plain_link);
        renderer
    }

    /// Output mode name ("html", "plain", ...)
    pub fn name(&self) -> &str {
        self.name
    }

    /// Register or replace the render function for a node type
    pub fn register(&mut self, kind: impl Into<String>, f: RenderFn) {
        self.table.insert(kind.into(), f);
    }

    /// Whether a node type has a render function
    pub fn has(&self, kind: &str) -> bool {
        self.table.contains_key(kind)
    }

    /// Render a token sequence to output text
    pub fn render_tokens(&self, tokens: &[Token]) -> Result<String, RenderError> {
        let mut out = String::new();
        for token in tokens {
            out.push_str(&self.render_token(token)?);
        }
        Ok(out)
    }

    fn render_token(&self, token: &Token) -> Result<String, RenderError> {
        let f = self
            .table
            .get(token.kind())
            .ok_or_else(|| RenderError::UnknownNodeType(token.kind().to_string()))?;
        match token {
            Token::Leaf { raw, .. } => Ok(f(raw)),
            Token::Container { children, .. } => {
                let inner = self.render_tokens(children)?;
                Ok(f(&inner))
            }
        }
    }
}

fn html_text(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

fn html_paragraph(s: &str) -> String {
    format!("<p>{s}</p>\n")
}

fn html_block_quote(s: &str) -> String {
    format!("<blockquote>\n{s}</blockquote>\n")
}

fn html_list(s: &str) -> String {
    format!("<ul>\n{s}</ul>\n")
}

fn html_list_item(s: &str) -> String {
    format!("<li>{s}</li>\n")
}

fn html_emphasis(s: &str) -> String {
    format!("<em>{}</em>", html_escape::encode_text(s))
}

fn html_link(s: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        html_escape::encode_double_quoted_attribute(s),
        html_escape::encode_text(s)
    )
}

fn plain_text(s: &str) -> String {
    s.to_string()
}

fn plain_paragraph(s: &str) -> String {
    format!("{s}\n")
}

fn plain_block_quote(s: &str) -> String {
    s.lines().map(|line| format!("> {line}\n")).collect()
}

fn plain_list(s: &str) -> String {
    s.to_string()
}

fn plain_list_item(s: &str) -> String {
    format!("- {s}\n")
}

fn plain_emphasis(s: &str) -> String {
    format!("*{s}*")
}

fn plain_link(s: &str) -> String {
    format!("<{s}>")
}
