//! # exmark
//!
//! An extensible markup parsing core for example-driven documentation.
//!
//! Two independent pieces:
//!
//! - [`markdown`]: a small rule-driven markdown-subset parser that grammar
//!   extensions (math spans, asides) plug into, with pluggable HTML or
//!   plain-text rendering.
//! - [`segment`]: a line segmenter that splits an annotated source listing
//!   into (comment label, code body) segments for example-documentation
//!   generation.

pub mod markdown;
pub mod segment;

pub use markdown::{ConfigurationError, Markdown, RenderError, Token};
pub use segment::{segment, Segment};
