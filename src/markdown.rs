//! Extensible markdown parsing core
//!
//! A shared recursive-descent document parser that independent grammar
//! extensions plug into. The pieces:
//!
//! - **Rule registry** (`registry`): ordered, named (pattern, handler)
//!   rules per stage, with "before X"/"after X" insertion and
//!   replace-by-name.
//! - **Block parser** (`block`): rule-driven loop over the source with a
//!   nesting-depth counter and depth-bounded container recursion.
//! - **Inline parser** (`inline`): earliest-match scan over a text run,
//!   plain text accumulated between matches.
//! - **Renderer dispatch** (`render`): type-tag to render-function table,
//!   depth-first tree rendering; a missing renderer is an error.
//! - **Engine** (`engine`): ties the stages together and is the object
//!   extensions register against.
//!
//! Built-in rules live in `rules`; the `math` and `aside` extensions in
//! `extensions`.

pub mod block;
pub mod engine;
pub mod extensions;
pub mod inline;
pub mod registry;
pub mod render;
pub mod rules;
pub mod token;

pub use block::{BlockHandler, BlockParser, BlockState};
pub use engine::{Extension, Markdown};
pub use inline::{InlineHandler, InlineParser, InlineState};
pub use registry::{ConfigurationError, OrderHint, Pattern, Rule, RuleMatch, RuleSet, Stage};
pub use render::{RenderError, RenderFn, Renderer};
pub use token::Token;
