//! Engine-internal token model.
//!
//! Tokens are owned values queued by the state machine during a run and
//! drained by the handle, which turns each one into sink callbacks.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagKind {
    Start,
    End,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Attribute {
    pub(crate) name: String,
    pub(crate) value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Tag {
    pub(crate) kind: TagKind,
    /// ASCII-lowercased.
    pub(crate) name: String,
    pub(crate) self_closing: bool,
    pub(crate) attrs: Vec<Attribute>,
}

impl Tag {
    pub(crate) fn new(kind: TagKind) -> Self {
        Self {
            kind,
            name: String::new(),
            self_closing: false,
            attrs: Vec::new(),
        }
    }
}

/// `None` identifiers are "missing", which differs from present-but-empty
/// (`PUBLIC ""`) only inside the engine; both reach sinks as empty views.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Doctype {
    pub(crate) name: Option<String>,
    pub(crate) public_id: Option<String>,
    pub(crate) system_id: Option<String>,
    pub(crate) force_quirks: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Doctype(Doctype),
    Tag(Tag),
    Comment(String),
    /// Never empty and never contains U+0000.
    Characters(String),
    NullCharacter,
    Eof,
    /// Rendered diagnostic text.
    ParseError(String),
}
