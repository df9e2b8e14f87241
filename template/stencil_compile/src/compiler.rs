//! The character-driven template compiler.
//!
//! One character consumed per transition, no backtracking, linear in
//! pattern length. The grammar:
//!
//! ```text
//! placeholder := '[' header? ('|' param (',' param)*)? ']'
//!              | '[' header? ('<' format '>')? param (',' param)* ']'
//! ```
//!
//! Escapes are context-sensitive: `\\`, `\[` and `\]` outside
//! placeholders; `\\`, `\<` and `\|` in headers; `\\` and `\>` in formats;
//! `\\`, `\,` and `\]` in parameter lists. Escaping any other character is
//! a syntax error at the escaped character's position.

use tracing::{debug, trace};

use stencil_diagnostic::{CompileError, CompileErrorKind};
use stencil_resolve::{DataSource, Resolver};

use crate::segment::{Placeholder, Segment};
use crate::template::CompiledTemplate;

const ESCAPE: char = '\\';
const PLACEHOLDER_START: char = '[';
const PLACEHOLDER_END: char = ']';
const FORMAT_START: char = '<';
const FORMAT_END: char = '>';
const HEADER_DELIMITER: char = '|';
const PARAMETER_DELIMITER: char = ',';

/// Compile a pattern into a reusable template.
///
/// The resolver is consulted once per distinct parameter name, during this
/// call; rendering never resolves again. Any failure aborts the whole
/// compilation — no partial template is ever returned.
pub fn compile<T: DataSource>(
    pattern: &str,
    resolver: &Resolver<T>,
) -> Result<CompiledTemplate<T>, CompileError> {
    let segments = Compiler::new(pattern, resolver).run()?;
    debug!(pattern, segments = segments.len(), "compiled template");
    Ok(CompiledTemplate::new(pattern.to_owned(), segments))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Literal,
    LiteralEscape,
    Header,
    HeaderEscape,
    Format,
    FormatEscape,
    Parameter,
    ParameterEscape,
}

struct Compiler<'a, T: DataSource> {
    pattern: &'a str,
    resolver: &'a Resolver<T>,
    segments: Vec<Segment<T>>,
    /// Text accumulator for whichever section the state is in.
    buffer: String,
    header: String,
    format: String,
    parameters: Vec<String>,
    /// Character position of the current character.
    position: u32,
    /// Character position where the open placeholder's `[` sits.
    placeholder_start: u32,
}

impl<'a, T: DataSource> Compiler<'a, T> {
    fn new(pattern: &'a str, resolver: &'a Resolver<T>) -> Self {
        Compiler {
            pattern,
            resolver,
            segments: Vec::new(),
            buffer: String::new(),
            header: String::new(),
            format: String::new(),
            parameters: Vec::new(),
            position: 0,
            placeholder_start: 0,
        }
    }

    fn run(mut self) -> Result<Vec<Segment<T>>, CompileError> {
        let mut state = State::Literal;
        let mut count: u32 = 0;
        for (index, c) in self.pattern.chars().enumerate() {
            self.position = u32::try_from(index).unwrap_or(u32::MAX);
            count = self.position.saturating_add(1);
            state = match state {
                State::Literal => self.literal(c)?,
                State::LiteralEscape => self.literal_escape(c)?,
                State::Header => self.header(c)?,
                State::HeaderEscape => self.header_escape(c)?,
                State::Format => self.format(c)?,
                State::FormatEscape => self.format_escape(c)?,
                State::Parameter => self.parameter(c)?,
                State::ParameterEscape => self.parameter_escape(c)?,
            };
        }

        // End of input is only legal mid-literal.
        match state {
            State::Literal => {
                self.flush_literal();
                Ok(self.segments)
            }
            State::LiteralEscape
            | State::HeaderEscape
            | State::FormatEscape
            | State::ParameterEscape => Err(CompileError::at(
                CompileErrorKind::DanglingEscape,
                self.pattern,
                count,
            )),
            State::Header | State::Format | State::Parameter => Err(CompileError::at(
                CompileErrorKind::UnterminatedPlaceholder,
                self.pattern,
                self.placeholder_start,
            )),
        }
    }

    // === Transitions ===

    fn literal(&mut self, c: char) -> Result<State, CompileError> {
        match c {
            ESCAPE => Ok(State::LiteralEscape),
            PLACEHOLDER_START => {
                self.flush_literal();
                self.placeholder_start = self.position;
                Ok(State::Header)
            }
            _ => {
                self.buffer.push(c);
                Ok(State::Literal)
            }
        }
    }

    fn literal_escape(&mut self, c: char) -> Result<State, CompileError> {
        match c {
            ESCAPE | PLACEHOLDER_START | PLACEHOLDER_END => {
                self.buffer.push(c);
                Ok(State::Literal)
            }
            _ => Err(self.illegal_escape()),
        }
    }

    fn header(&mut self, c: char) -> Result<State, CompileError> {
        match c {
            ESCAPE => Ok(State::HeaderEscape),
            HEADER_DELIMITER => {
                self.header = std::mem::take(&mut self.buffer);
                Ok(State::Parameter)
            }
            FORMAT_START => {
                self.header = std::mem::take(&mut self.buffer);
                Ok(State::Format)
            }
            PLACEHOLDER_END => {
                // No `|` or `<` seen: the buffered text is the single
                // parameter name and the header tag stays empty.
                self.take_parameter();
                self.emit_placeholder()?;
                Ok(State::Literal)
            }
            _ => {
                self.buffer.push(c);
                Ok(State::Header)
            }
        }
    }

    fn header_escape(&mut self, c: char) -> Result<State, CompileError> {
        match c {
            ESCAPE | FORMAT_START | HEADER_DELIMITER => {
                self.buffer.push(c);
                Ok(State::Header)
            }
            _ => Err(self.illegal_escape()),
        }
    }

    fn format(&mut self, c: char) -> Result<State, CompileError> {
        match c {
            ESCAPE => Ok(State::FormatEscape),
            FORMAT_END => {
                self.format = std::mem::take(&mut self.buffer);
                Ok(State::Parameter)
            }
            PLACEHOLDER_END => Err(CompileError::at(
                CompileErrorKind::IncompleteFormat,
                self.pattern,
                self.position,
            )),
            _ => {
                self.buffer.push(c);
                Ok(State::Format)
            }
        }
    }

    fn format_escape(&mut self, c: char) -> Result<State, CompileError> {
        match c {
            ESCAPE | FORMAT_END => {
                self.buffer.push(c);
                Ok(State::Format)
            }
            _ => Err(self.illegal_escape()),
        }
    }

    fn parameter(&mut self, c: char) -> Result<State, CompileError> {
        match c {
            ESCAPE => Ok(State::ParameterEscape),
            PARAMETER_DELIMITER => {
                self.take_parameter();
                Ok(State::Parameter)
            }
            PLACEHOLDER_END => {
                self.take_parameter();
                self.emit_placeholder()?;
                Ok(State::Literal)
            }
            _ => {
                self.buffer.push(c);
                Ok(State::Parameter)
            }
        }
    }

    fn parameter_escape(&mut self, c: char) -> Result<State, CompileError> {
        match c {
            ESCAPE | PLACEHOLDER_END | PARAMETER_DELIMITER => {
                self.buffer.push(c);
                Ok(State::Parameter)
            }
            _ => Err(self.illegal_escape()),
        }
    }

    // === Segment emission ===

    /// Emit the buffered literal run, dropping empty runs.
    fn flush_literal(&mut self) {
        if !self.buffer.is_empty() {
            trace!(len = self.buffer.len(), "literal segment");
            self.segments
                .push(Segment::Literal(std::mem::take(&mut self.buffer)));
        }
    }

    fn take_parameter(&mut self) {
        self.parameters.push(std::mem::take(&mut self.buffer));
    }

    fn emit_placeholder(&mut self) -> Result<(), CompileError> {
        let placeholder = Placeholder::build(
            self.pattern,
            self.placeholder_start,
            self.resolver,
            std::mem::take(&mut self.header),
            std::mem::take(&mut self.format),
            std::mem::take(&mut self.parameters),
        )?;
        trace!(
            header = placeholder.header(),
            parameters = placeholder.parameters().len(),
            "placeholder segment"
        );
        self.segments.push(Segment::Placeholder(placeholder));
        Ok(())
    }

    fn illegal_escape(&self) -> CompileError {
        CompileError::at(CompileErrorKind::IllegalEscape, self.pattern, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stencil_resolve::{Member, MemberKind, Value};

    struct Song {
        artist: Option<String>,
        title: Option<String>,
        track: Option<i64>,
    }

    impl DataSource for Song {
        fn members() -> &'static [Member<Self>] {
            const MEMBERS: &[Member<Song>] = &[
                Member {
                    name: "artist",
                    kind: MemberKind::Field,
                    get: |s| s.artist.clone().map(Value::Str),
                },
                Member {
                    name: "title",
                    kind: MemberKind::Field,
                    get: |s| s.title.clone().map(Value::Str),
                },
                Member {
                    name: "track",
                    kind: MemberKind::Field,
                    get: |s| s.track.map(Value::Int),
                },
                Member {
                    name: "p1",
                    kind: MemberKind::Field,
                    get: |s| s.artist.clone().map(Value::Str),
                },
                Member {
                    name: "p2",
                    kind: MemberKind::Field,
                    get: |s| s.title.clone().map(Value::Str),
                },
            ];
            MEMBERS
        }

        fn source_name() -> &'static str {
            "Song"
        }
    }

    fn song() -> Song {
        Song {
            artist: Some("Rockers".to_owned()),
            title: Some("Go".to_owned()),
            track: Some(3),
        }
    }

    fn render(pattern: &str, data: Option<&Song>) -> String {
        let resolver = Resolver::new();
        compile(pattern, &resolver)
            .expect("pattern compiles")
            .render(data)
    }

    fn compile_err(pattern: &str) -> CompileError {
        let resolver = Resolver::<Song>::new();
        compile(pattern, &resolver).err().expect("must not compile")
    }

    // === Literals and escapes ===

    #[test]
    fn pure_literal_round_trips() {
        assert_eq!(render("just some text", Some(&song())), "just some text");
        assert_eq!(render("just some text", None), "just some text");
        assert_eq!(render("", None), "");
    }

    #[test]
    fn literal_escapes_unescape() {
        assert_eq!(render(r"\[literal\]", None), "[literal]");
        assert_eq!(render(r"a\\b", None), r"a\b");
    }

    #[test]
    fn escaped_backslash_before_placeholder() {
        assert_eq!(render(r"\\[artist]", Some(&song())), r"\Rockers");
    }

    #[test]
    fn escaped_close_bracket_is_literal_in_literal_state() {
        // `]` is an ordinary character outside placeholders, escaped or
        // not.
        assert_eq!(render("a]b", None), "a]b");
        assert_eq!(render(r"a\]b", None), "a]b");
    }

    #[test]
    fn illegal_literal_escape_is_positioned() {
        let err = compile_err(r"ab\qcd");
        assert_eq!(*err.kind(), CompileErrorKind::IllegalEscape);
        assert_eq!(err.position(), Some(3));
    }

    // === Placeholders ===

    #[test]
    fn simple_placeholder() {
        assert_eq!(render("[artist]", Some(&song())), "Rockers");
    }

    #[test]
    fn adjacent_placeholders_produce_no_empty_literals() {
        let resolver = Resolver::new();
        let template = compile("[artist][title]", &resolver).expect("compiles");
        assert_eq!(template.segments().len(), 2);
        assert_eq!(template.render(Some(&song())), "RockersGo");
    }

    #[test]
    fn literal_and_placeholder_ordering() {
        let resolver = Resolver::new();
        let template = compile("A[p1]B[p2]C", &resolver).expect("compiles");
        assert_eq!(template.segments().len(), 5);
        assert_eq!(template.render(Some(&song())), "ARockersBGoC");
    }

    #[test]
    fn formatted_placeholder() {
        assert_eq!(render("[F<00>track]", Some(&song())), "03");
    }

    #[test]
    fn header_pipe_separates_parameters() {
        // `[|param]` — explicit empty header via the pipe form.
        assert_eq!(render("[|artist]", Some(&song())), "Rockers");
    }

    #[test]
    fn composite_placeholder_with_pipe_header() {
        assert_eq!(
            render("[C<{0} - {1}>artist,title]", Some(&song())),
            "Rockers - Go"
        );
    }

    #[test]
    fn header_escapes() {
        // `\<` and `\|` stay in the header text; `F` needs no escaping.
        let err = compile_err(r"[Q\<R<x>artist]");
        assert_eq!(
            *err.kind(),
            CompileErrorKind::UnknownPlaceholder {
                header: "Q<R".to_owned()
            }
        );
    }

    #[test]
    fn format_escapes() {
        assert_eq!(render(r"[C<\>{0}\>>artist]", Some(&song())), ">Rockers>");
    }

    #[test]
    fn parameter_escapes() {
        // The pipe form puts the lexer in parameter context, where an
        // escaped comma is part of the name, not a separator.
        let err = compile_err(r"[|a\,b]");
        assert_eq!(
            *err.kind(),
            CompileErrorKind::UnknownParameter {
                parameter: "a,b".to_owned(),
                source: "Song".to_owned(),
            }
        );
        // Without the pipe the same text is still header context, where
        // `\,` is not a legal escape.
        let err = compile_err(r"[a\,b]");
        assert_eq!(*err.kind(), CompileErrorKind::IllegalEscape);
        assert_eq!(err.position(), Some(3));
    }

    // === Syntax errors ===

    #[test]
    fn close_bracket_inside_format_is_incomplete() {
        let err = compile_err("ab[F<00]");
        assert_eq!(*err.kind(), CompileErrorKind::IncompleteFormat);
        assert_eq!(err.position(), Some(7));
    }

    #[test]
    fn unknown_header_is_positioned_at_the_open_bracket() {
        let err = compile_err("xy[Z<x>artist]");
        assert_eq!(
            *err.kind(),
            CompileErrorKind::UnknownPlaceholder {
                header: "Z".to_owned()
            }
        );
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn unknown_parameter_aborts_compilation() {
        let err = compile_err("[NoSuchField]");
        assert_eq!(
            *err.kind(),
            CompileErrorKind::UnknownParameter {
                parameter: "NoSuchField".to_owned(),
                source: "Song".to_owned(),
            }
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = compile_err("abc[artist");
        assert_eq!(*err.kind(), CompileErrorKind::UnterminatedPlaceholder);
        assert_eq!(err.position(), Some(3));

        let err = compile_err("[C<{0}>a,b");
        assert_eq!(*err.kind(), CompileErrorKind::UnterminatedPlaceholder);
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn dangling_escape_is_an_error() {
        let err = compile_err(r"abc\");
        assert_eq!(*err.kind(), CompileErrorKind::DanglingEscape);
        assert_eq!(err.position(), Some(4));
    }

    #[test]
    fn empty_parameter_name_fails_resolution_not_parsing() {
        let err = compile_err("[]");
        assert_eq!(
            *err.kind(),
            CompileErrorKind::UnknownParameter {
                parameter: String::new(),
                source: "Song".to_owned(),
            }
        );
    }

    // === Properties ===

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Round-trip literal invariance: no `[` and no `\` means the
            // pattern renders as itself, for any data source including
            // an absent one.
            #[test]
            fn plain_patterns_render_verbatim(
                pattern in "[^\\[\\\\]{0,64}",
            ) {
                let resolver = Resolver::<Song>::new();
                let template = compile(&pattern, &resolver).expect("compiles");
                prop_assert_eq!(template.render(None), pattern.clone());
                prop_assert_eq!(template.render(Some(&song())), pattern);
            }
        }
    }
}
