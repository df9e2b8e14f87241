//! The compiled template.

use stencil_resolve::DataSource;

use crate::segment::Segment;

/// A pattern compiled into an ordered segment list.
///
/// Immutable after compilation: the segments and their accessors carry no
/// per-render state, so one template may be rendered concurrently from
/// many threads against many data-source instances. The only mutable
/// state a render call touches is the output buffer the caller owns.
pub struct CompiledTemplate<T: DataSource> {
    source: String,
    segments: Vec<Segment<T>>,
}

impl<T: DataSource> CompiledTemplate<T> {
    pub(crate) fn new(source: String, segments: Vec<Segment<T>>) -> Self {
        CompiledTemplate { source, segments }
    }

    /// The pattern string this template was compiled from, verbatim.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled segments, in source order.
    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    /// Render against a data-source instance. An absent data source is
    /// legal: every placeholder then contributes the empty string.
    pub fn render(&self, data: Option<&T>) -> String {
        let mut out = String::with_capacity(self.source.len());
        self.render_into(&mut out, data);
        out
    }

    /// Append-to-buffer variant of [`render`](Self::render), for callers
    /// rendering many instances without reallocating per call.
    pub fn render_into(&self, out: &mut String, data: Option<&T>) {
        for segment in &self.segments {
            segment.render_into(out, data);
        }
    }
}

impl<T: DataSource> std::fmt::Debug for CompiledTemplate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("source", &self.source)
            .field("segments", &self.segments)
            .finish()
    }
}
