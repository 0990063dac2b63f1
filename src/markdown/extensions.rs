//! Grammar extensions
//!
//! Each extension is an entry-point function over the shared engine: it
//! registers its block/inline rules and, when the configured output mode
//! is HTML, its render functions. Extensions compose; install order only
//! matters where their order hints say so.

pub mod aside;
pub mod math;

pub use aside::aside;
pub use math::math;
