//! End-to-end scenarios: a song-metadata data source, patterns compiled
//! through the public façade, rendered to final strings.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use stencil::{
    Binding, CompileErrorKind, DataSource, Fields, Member, MemberKind, Value,
};

struct Album {
    title: String,
    year: Option<i64>,
}

impl Fields for Album {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "Title" => Some(Value::str(self.title.clone())),
            "Year" => self.year.map(Value::Int),
            _ => None,
        }
    }

    fn as_text(&self) -> String {
        self.title.clone()
    }
}

struct Artist {
    name: String,
}

impl Fields for Artist {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "Name" => Some(Value::str(self.name.clone())),
            _ => None,
        }
    }

    fn as_text(&self) -> String {
        self.name.clone()
    }
}

struct Song {
    title: Option<String>,
    track_number: Option<i64>,
    artist: Option<Arc<Artist>>,
    album: Option<Arc<Album>>,
}

impl Song {
    fn rockers() -> Self {
        Song {
            title: Some("Go Fast".to_owned()),
            track_number: Some(3),
            artist: Some(Arc::new(Artist {
                name: "Rockers".to_owned(),
            })),
            album: Some(Arc::new(Album {
                title: "Loud".to_owned(),
                year: Some(1985),
            })),
        }
    }

    fn untagged() -> Self {
        Song {
            title: None,
            track_number: None,
            artist: Some(Arc::new(Artist {
                name: "Rockers".to_owned(),
            })),
            album: None,
        }
    }
}

impl DataSource for Song {
    fn members() -> &'static [Member<Self>] {
        const MEMBERS: &[Member<Song>] = &[
            Member {
                name: "Title",
                kind: MemberKind::Field,
                get: |s| s.title.clone().map(Value::Str),
            },
            Member {
                name: "GetUppercasedTitle",
                kind: MemberKind::Method,
                get: |s| s.title.as_deref().map(|t| Value::str(t.to_uppercase())),
            },
        ];
        MEMBERS
    }

    fn bindings() -> &'static [Binding<Self>] {
        const BINDINGS: &[Binding<Song>] = &[
            Binding {
                name: Some("title"),
                member: "Title",
                get: |s| s.title.clone().map(Value::Str),
                submember: None,
            },
            Binding {
                name: Some("Track Number"),
                member: "TrackNumber",
                get: |s| s.track_number.map(Value::Int),
                submember: None,
            },
            Binding {
                name: Some("Artist"),
                member: "Artist",
                get: |s| s.artist.clone().map(|a| Value::Object(a)),
                submember: Some("Name"),
            },
            Binding {
                name: Some("Album Year"),
                member: "Album",
                get: |s| s.album.clone().map(|a| Value::Object(a)),
                submember: Some("Year"),
            },
            Binding {
                name: Some("Album"),
                member: "Album",
                get: |s| s.album.clone().map(|a| Value::Object(a)),
                submember: Some("Title"),
            },
        ];
        BINDINGS
    }

    fn source_name() -> &'static str {
        "Song"
    }
}

#[test]
fn track_number_and_artist() {
    let template = stencil::compile::<Song>("[F?<00>Track Number] - [Artist]").expect("compiles");
    assert_eq!(template.render(Some(&Song::rockers())), "03 - Rockers");
}

#[test]
fn absent_track_number_contributes_nothing() {
    let template = stencil::compile::<Song>("[F?<00>Track Number] - [Artist]").expect("compiles");
    // The leading literal space survives; the placeholder is empty.
    assert_eq!(template.render(Some(&Song::untagged())), " - Rockers");
}

#[test]
fn file_path_shaped_pattern() {
    let template = stencil::compile::<Song>(
        "/music/[Artist]/[Album] ([F<0000>Album Year])/[F<00>Track Number] - [title]",
    )
    .expect("compiles");
    assert_eq!(
        template.render(Some(&Song::rockers())),
        "/music/Rockers/Loud (1985)/03 - Go Fast"
    );
}

#[test]
fn composite_placeholder_joins_parameters() {
    let template =
        stencil::compile::<Song>("[C<{0:00} - {1}>Track Number,Artist]").expect("compiles");
    assert_eq!(template.render(Some(&Song::rockers())), "03 - Rockers");
}

#[test]
fn conditional_composite_keys_on_first_parameter() {
    let template =
        stencil::compile::<Song>("[C?<{0:00} - >Track Number][Artist]").expect("compiles");
    assert_eq!(template.render(Some(&Song::rockers())), "03 - Rockers");
    assert_eq!(template.render(Some(&Song::untagged())), "Rockers");
}

#[test]
fn explicit_binding_beats_the_member_of_the_same_name() {
    // `title` is bound explicitly; `Title` is also an implicit member.
    // The binding maps the lowercase spelling, the member the capitalized
    // one, and both resolve independently.
    let template = stencil::compile::<Song>("[title]|[Title]").expect("compiles");
    assert_eq!(template.render(Some(&Song::rockers())), "Go Fast|Go Fast");
}

#[test]
fn method_member_resolves_implicitly() {
    let template = stencil::compile::<Song>("[GetUppercasedTitle]").expect("compiles");
    assert_eq!(template.render(Some(&Song::rockers())), "GO FAST");
}

#[test]
fn submember_chain_is_null_safe_end_to_end() {
    let template = stencil::compile::<Song>("[Album Year]").expect("compiles");
    // album is None: the chain yields absent, the placeholder renders
    // empty — never an error.
    assert_eq!(template.render(Some(&Song::untagged())), "");
    assert_eq!(template.render(None), "");
}

#[test]
fn escapes_render_verbatim() {
    let template = stencil::compile::<Song>(r"\[Artist\] is [Artist]").expect("compiles");
    assert_eq!(
        template.render(Some(&Song::rockers())),
        "[Artist] is Rockers"
    );
}

#[test]
fn literal_only_pattern_ignores_the_data_source_entirely() {
    let template = stencil::compile::<Song>("no placeholders here").expect("compiles");
    assert_eq!(template.render(None), "no placeholders here");
}

#[test]
fn unknown_parameter_fails_compilation() {
    let err = stencil::compile::<Song>("[NoSuchField]").expect_err("must fail");
    assert_eq!(
        *err.kind(),
        CompileErrorKind::UnknownParameter {
            parameter: "NoSuchField".to_owned(),
            source: "Song".to_owned(),
        }
    );
}

#[test]
fn unknown_header_fails_compilation_at_the_open_bracket() {
    let err = stencil::compile::<Song>("[Z<x>Artist]").expect_err("must fail");
    assert_eq!(
        *err.kind(),
        CompileErrorKind::UnknownPlaceholder {
            header: "Z".to_owned()
        }
    );
    assert_eq!(err.position(), Some(0));
    assert_eq!(err.snippet(), "[Z<x>Artist]\n^");
}
