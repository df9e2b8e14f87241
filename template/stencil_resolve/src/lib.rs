//! Parameter resolution for the Stencil template engine.
//!
//! This crate maps placeholder parameter names to [`Accessor`]s — reusable
//! functions that pull an optional [`Value`] out of a data-source instance.
//! Resolution consults a data-source type's declared fact tables:
//!
//! - explicit [`Binding`]s (a bound name, an owning member, and optionally
//!   a submember probed on the member's value), then
//! - implicit matching against the type's readable [`Member`]s by exact
//!   name, properties before fields before methods.
//!
//! Accessors are bound once, at template compile time. Rendering never
//! resolves again, and an accessor never fails at render time: absent data
//! (including an absent data source) yields `None`, which stringifies as
//! the empty string.

mod resolver;
mod source;
mod value;

pub use resolver::{Accessor, ResolveError, Resolver};
pub use source::{Binding, DataSource, Member, MemberKind};
pub use value::{Fields, Value};
