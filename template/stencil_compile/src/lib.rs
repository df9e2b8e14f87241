//! The Stencil template compiler and renderer.
//!
//! A pattern string like `[artist] - [F<00>track number]` is compiled,
//! once, into a [`CompiledTemplate`]: an ordered list of segments, each
//! either literal text or a placeholder with its parameter accessors
//! already bound. Rendering walks the segments in source order and
//! concatenates their output; it never consults the resolver and has no
//! error path.
//!
//! The compiler is a character-driven finite-state machine — linear in
//! pattern length, no backtracking — and reports malformed input with the
//! character position of the offence. See [`compile`].

mod compiler;
mod format;
mod segment;
mod template;

pub use compiler::compile;
pub use segment::{Placeholder, Segment};
pub use template::CompiledTemplate;

// The error types callers match on.
pub use stencil_diagnostic::{CompileError, CompileErrorKind};
