//! Diagnostics for the Stencil template compiler.
//!
//! Every compile-time failure carries:
//! - WHAT went wrong (`CompileErrorKind`)
//! - WHERE it went wrong (a character position into the unmutated pattern)
//! - the pattern itself, so messages can be rendered without extra context
//!
//! Compilation is all-or-nothing: a `CompileError` always means no template
//! was produced. There is no render-time error path — an absent value is a
//! representable state, not an error.

mod error;

pub use error::{CompileError, CompileErrorKind};
