//! Compiled template segments.
//!
//! A compiled template is a linear sequence of segments. Literal segments
//! are emitted verbatim; placeholder segments evaluate their pre-bound
//! accessors against the data source and emit the (possibly formatted)
//! result. Concatenating the segments in source order is the whole of
//! rendering.

use smallvec::SmallVec;
use stencil_diagnostic::{CompileError, CompileErrorKind};
use stencil_resolve::{Accessor, DataSource, Resolver, Value};

use crate::format::CompiledFormat;

/// One compiled unit of a template.
pub enum Segment<T: DataSource> {
    /// Verbatim text. Never empty — the compiler drops empty literal runs
    /// instead of materializing them.
    Literal(String),
    Placeholder(Placeholder<T>),
}

impl<T: DataSource> Segment<T> {
    pub(crate) fn render_into(&self, out: &mut String, data: Option<&T>) {
        match self {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(placeholder) => placeholder.render_into(out, data),
        }
    }
}

/// How a placeholder turns its parameter values into text.
enum Kind {
    /// `[name]` — plain stringification of a single value.
    Simple,
    /// `[F<fmt>name]` / `[F?<fmt>name]` — a single value pushed through a
    /// normalized one-argument format.
    Formatted {
        conditional: bool,
        compiled: CompiledFormat,
    },
    /// `[C<fmt>a,b,...]` / `[C?<fmt>a,b,...]` — all values applied to the
    /// format positionally.
    Composite {
        conditional: bool,
        compiled: CompiledFormat,
    },
}

/// A compiled placeholder: header-selected kind, raw format text, and the
/// index-aligned parameter names and accessors.
///
/// Every accessor resolved successfully before this value existed; an
/// unresolvable parameter is a compile-time failure, never a render-time
/// one.
pub struct Placeholder<T: DataSource> {
    header: String,
    format: String,
    parameters: Vec<String>,
    accessors: Vec<Accessor<T>>,
    kind: Kind,
    start: u32,
}

impl<T: DataSource> Placeholder<T> {
    /// Construct and validate a placeholder; the header text selects the
    /// kind via a fixed lookup. `start` is the character position of the
    /// opening `[`, used for every diagnostic raised here.
    pub(crate) fn build(
        pattern: &str,
        start: u32,
        resolver: &Resolver<T>,
        header: String,
        format: String,
        parameters: Vec<String>,
    ) -> Result<Self, CompileError> {
        if parameters.is_empty() {
            return Err(CompileError::at(
                CompileErrorKind::MissingParameter,
                pattern,
                start,
            ));
        }

        let mut accessors = Vec::with_capacity(parameters.len());
        for name in &parameters {
            match resolver.resolve(name) {
                Ok(accessor) => accessors.push(accessor),
                Err(stencil_resolve::ResolveError::UnknownParameter {
                    parameter,
                    data_source,
                }) => {
                    return Err(CompileError::at(
                        CompileErrorKind::UnknownParameter {
                            parameter,
                            source: data_source,
                        },
                        pattern,
                        start,
                    ));
                }
            }
        }

        let conditional = header.ends_with('?');
        let kind = match header.as_str() {
            "" => {
                require_single_parameter(pattern, start, &parameters)?;
                Kind::Simple
            }
            "F" | "F?" => {
                require_single_parameter(pattern, start, &parameters)?;
                let normalized = normalize_single_format(&format);
                let compiled = CompiledFormat::parse(&normalized, 1)
                    .map_err(|e| invalid_format(pattern, start, &e))?;
                Kind::Formatted {
                    conditional,
                    compiled,
                }
            }
            "C" | "C?" => {
                let compiled = CompiledFormat::parse(&format, parameters.len())
                    .map_err(|e| invalid_format(pattern, start, &e))?;
                Kind::Composite {
                    conditional,
                    compiled,
                }
            }
            _ => {
                return Err(CompileError::at(
                    CompileErrorKind::UnknownPlaceholder { header },
                    pattern,
                    start,
                ));
            }
        };

        Ok(Placeholder {
            header,
            format,
            parameters,
            accessors,
            kind,
            start,
        })
    }

    /// The header tag exactly as written (empty for simple placeholders).
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The raw format text, before any normalization.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parameter names in source order.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Character position of the opening `[` in the pattern.
    pub fn start(&self) -> u32 {
        self.start
    }

    fn render_into(&self, out: &mut String, data: Option<&T>) {
        match &self.kind {
            Kind::Simple => {
                if let Some(value) = self.accessors[0].value(data) {
                    out.push_str(&value.to_string());
                }
            }
            Kind::Formatted {
                conditional,
                compiled,
            } => {
                let value = self.accessors[0].value(data);
                if *conditional && value.is_none() {
                    return;
                }
                out.push_str(&compiled.apply(&[value]));
            }
            Kind::Composite {
                conditional,
                compiled,
            } => {
                let first = self.accessors[0].value(data);
                if *conditional && first.is_none() {
                    return;
                }
                // Fresh buffer every call: renders may run concurrently
                // and must not observe each other's intermediate values.
                let mut args: SmallVec<[Option<Value>; 3]> =
                    SmallVec::with_capacity(self.accessors.len());
                args.push(first);
                for accessor in &self.accessors[1..] {
                    args.push(accessor.value(data));
                }
                out.push_str(&compiled.apply(&args));
            }
        }
    }
}

impl<T: DataSource> std::fmt::Debug for Segment<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Segment::Placeholder(placeholder) => {
                f.debug_tuple("Placeholder").field(placeholder).finish()
            }
        }
    }
}

impl<T: DataSource> std::fmt::Debug for Placeholder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placeholder")
            .field("header", &self.header)
            .field("format", &self.format)
            .field("parameters", &self.parameters)
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

fn require_single_parameter(
    pattern: &str,
    start: u32,
    parameters: &[String],
) -> Result<(), CompileError> {
    if parameters.len() == 1 {
        Ok(())
    } else {
        Err(CompileError::at(
            CompileErrorKind::WrongParameterCount {
                found: parameters.len(),
            },
            pattern,
            start,
        ))
    }
}

fn invalid_format(pattern: &str, start: u32, error: &crate::format::FormatError) -> CompileError {
    CompileError::at(
        CompileErrorKind::InvalidFormat {
            detail: error.to_string(),
        },
        pattern,
        start,
    )
}

/// Normalize a single-value format section into a one-argument composite
/// pattern. The raw text is either a value spec or an alignment spec,
/// distinguished solely by the presence of `:`: `00` becomes `{0:00}`,
/// `5:00` becomes `{0,5:00}`.
fn normalize_single_format(format: &str) -> String {
    if format.contains(':') {
        format!("{{0,{format}}}")
    } else {
        format!("{{0:{format}}}")
    }
}
