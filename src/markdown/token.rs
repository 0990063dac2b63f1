//! Token tree produced by the block and inline parsers
//!
//! Tokens are tagged by a string kind so that grammar extensions can
//! introduce new node types without touching this module. A token is
//! either a leaf carrying raw text (e.g. a math expression) or a
//! container carrying an ordered child list (e.g. a block quote).

use serde::Serialize;

/// A node in the parsed document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Token {
    /// Leaf token: raw text payload, no children
    Leaf {
        #[serde(rename = "type")]
        kind: String,
        raw: String,
    },
    /// Container token: ordered sequence of child tokens
    Container {
        #[serde(rename = "type")]
        kind: String,
        children: Vec<Token>,
    },
}

impl Token {
    /// Create a leaf token
    pub fn leaf(kind: impl Into<String>, raw: impl Into<String>) -> Self {
        Token::Leaf {
            kind: kind.into(),
            raw: raw.into(),
        }
    }

    /// Create a container token
    pub fn container(kind: impl Into<String>, children: Vec<Token>) -> Self {
        Token::Container {
            kind: kind.into(),
            children,
        }
    }

    /// The type tag of this token
    pub fn kind(&self) -> &str {
        match self {
            Token::Leaf { kind, .. } | Token::Container { kind, .. } => kind,
        }
    }

    /// Child tokens, or an empty slice for leaves
    pub fn children(&self) -> &[Token] {
        match self {
            Token::Leaf { .. } => &[],
            Token::Container { children, .. } => children,
        }
    }

    /// Raw payload, or `None` for containers
    pub fn raw(&self) -> Option<&str> {
        match self {
            Token::Leaf { raw, .. } => Some(raw),
            Token::Container { .. } => None,
        }
    }
}
