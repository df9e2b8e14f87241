//! Stencil — compile placeholder-template strings into reusable renderers.
//!
//! A pattern such as `[artist] - [F<00>track number]` compiles once into a
//! [`CompiledTemplate`]; each render fills the placeholders with values
//! pulled from a data-source instance. Typical use is building file paths
//! and names from song metadata:
//!
//! ```text
//! let template = stencil::compile::<Song>("[F<00>Track Number] - [Artist]")?;
//! let name = template.render(Some(&song));   // "03 - Rockers"
//! ```
//!
//! Placeholder syntax, selected by the header text before `<` or `|`:
//!
//! - `[name]` — simple parameter, stringified directly.
//! - `[F<format>name]` — formatted parameter.
//! - `[F?<format>name]` — as above, but empty when the value is absent.
//! - `[C<format>a,b,...]` — composite format over several parameters.
//! - `[C?<format>a,b,...]` — as above, but empty when the first value is
//!   absent.
//!
//! Data-source types implement [`DataSource`] to declare their readable
//! members and explicit parameter bindings; see `stencil_resolve`.

use stencil_diagnostic::CompileError;

pub use stencil_compile::{CompiledTemplate, Placeholder, Segment};
pub use stencil_diagnostic::CompileErrorKind;
pub use stencil_resolve::{
    Accessor, Binding, DataSource, Fields, Member, MemberKind, ResolveError, Resolver, Value,
};

/// A named template-engine implementation.
///
/// The engine selects the compilation strategy; today only the V1
/// finite-state engine exists, but callers address engines by name so the
/// grammar can evolve without breaking compiled-pattern consumers.
pub trait Engine<T: DataSource> {
    /// The name this engine registers under.
    fn name(&self) -> &'static str;

    /// Human-readable description of the pattern syntax this engine
    /// accepts.
    fn usage(&self) -> String;

    /// Compile a pattern with a fresh resolver for `T`.
    fn compile(&self, pattern: &str) -> Result<CompiledTemplate<T>, CompileError>;
}

/// The V1 finite-state template engine.
pub struct V1Engine;

/// Name the V1 engine registers under.
pub const V1_ENGINE_NAME: &str = "TemplateV1";

impl<T: DataSource> Engine<T> for V1Engine {
    fn name(&self) -> &'static str {
        V1_ENGINE_NAME
    }

    fn usage(&self) -> String {
        format!(
            "Template engine: `{}`\n\
             \n\
             The pattern may include placeholders with the following syntax:\n\
             \n\
             -   [parameter name]: simple parameter, interpolated directly.\n\
             -   [F<format>parameter name]: formatted parameter.\n\
             -   [F?<format>parameter name]: as above, but empty when the parameter is absent.\n\
             -   [C<format>P1,P2,...]: composite format over several parameters.\n\
             -   [C?<format>P1,P2,...]: as above, but empty when the first parameter is absent.\n",
            V1_ENGINE_NAME
        )
    }

    fn compile(&self, pattern: &str) -> Result<CompiledTemplate<T>, CompileError> {
        let resolver = Resolver::new();
        stencil_compile::compile(pattern, &resolver)
    }
}

/// Failure of the named-engine entry point.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("could not compile the template: template engine '{0}' is unknown")]
    UnknownEngine(String),
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// The fixed engine lookup table.
fn engine_by_name<T: DataSource>(name: &str) -> Option<Box<dyn Engine<T>>> {
    match name {
        V1_ENGINE_NAME => Some(Box::new(V1Engine)),
        _ => None,
    }
}

/// Compile a pattern with the default engine and a fresh resolver.
pub fn compile<T: DataSource>(pattern: &str) -> Result<CompiledTemplate<T>, CompileError> {
    <V1Engine as Engine<T>>::compile(&V1Engine, pattern)
}

/// Compile a pattern with a caller-supplied resolver, so the resolver's
/// memoized accessors can be shared across compilations of the same
/// data-source type.
pub fn compile_with_resolver<T: DataSource>(
    pattern: &str,
    resolver: &Resolver<T>,
) -> Result<CompiledTemplate<T>, CompileError> {
    stencil_compile::compile(pattern, resolver)
}

/// Compile a pattern with the engine registered under `engine_name`.
pub fn compile_with<T: DataSource>(
    pattern: &str,
    engine_name: &str,
) -> Result<CompiledTemplate<T>, EngineError> {
    let engine = engine_by_name::<T>(engine_name)
        .ok_or_else(|| EngineError::UnknownEngine(engine_name.to_owned()))?;
    Ok(engine.compile(pattern)?)
}
