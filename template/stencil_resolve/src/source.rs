//! Data-source description tables.
//!
//! A data-source type supplies two explicit fact tables once: its readable
//! members and its declared parameter bindings. The resolver treats them as
//! pure data; after resolution nothing dispatches dynamically except the
//! `fn(&T) -> Option<Value>` getters these tables carry.

use crate::value::Value;

/// What kind of member a getter reads.
///
/// The distinction matters only for implicit-match precedence: properties
/// are scanned before fields, fields before methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    /// A computed getter (`pub fn title(&self) -> ...` acting as a
    /// property accessor).
    Property,
    /// A plain data field.
    Field,
    /// A zero-argument, value-returning method that is not a property
    /// shim.
    Method,
}

/// One readable member of a data-source type.
///
/// Only zero-argument, value-returning accessors belong in a member table:
/// readable, parameterless, never side-effecting.
pub struct Member<T> {
    /// The member's own name, used for implicit matching (case-sensitive).
    pub name: &'static str,
    pub kind: MemberKind,
    /// Extracts the member's value. `None` models an absent value, never
    /// an error.
    pub get: fn(&T) -> Option<Value>,
}

/// An explicit parameter-binding declaration.
///
/// A member may answer to a parameter name other than its own, optionally
/// through one level of submember indirection. One member may carry several
/// bindings.
pub struct Binding<T> {
    /// The bound parameter name. `None` means the owning member's own name
    /// is the bound name.
    pub name: Option<&'static str>,
    /// The owning member's name.
    pub member: &'static str,
    /// The owning member's getter.
    pub get: fn(&T) -> Option<Value>,
    /// When present, the member's value is probed for this field and the
    /// probe result is the parameter's value. One level only.
    pub submember: Option<&'static str>,
}

impl<T> Binding<T> {
    /// The parameter name this binding answers to.
    pub fn bound_name(&self) -> &'static str {
        self.name.unwrap_or(self.member)
    }
}

/// A type whose instances can feed template placeholders.
///
/// Implementations register their readable members and binding
/// declarations as static tables. Table order among members of the same
/// kind is the implicit-match scan order; across kinds the resolver always
/// prefers properties, then fields, then methods.
pub trait DataSource: Sized + 'static {
    /// The readable-member table.
    fn members() -> &'static [Member<Self>];

    /// The explicit-binding table. Empty by default.
    fn bindings() -> &'static [Binding<Self>] {
        &[]
    }

    /// Name used in diagnostics when a parameter cannot be bound.
    fn source_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
