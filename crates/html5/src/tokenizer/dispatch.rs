//! Token to sink-callback translation for both buffer surfaces.
//!
//! This is the only place callbacks are issued, so the ordering contract is
//! enforced here: a start tag's attribute count is taken from the attribute
//! list that is then walked in full, and end tags never carry attributes.

use super::token::{Doctype, Tag, TagKind, Token};
use crate::atom::Atom;
use crate::buf::{BorrowedBuf, ByteSpan, SharedBuf};
use crate::sink::{SharedTokenSink, TokenSink};

fn view(field: &Option<String>) -> BorrowedBuf<'_> {
    field
        .as_deref()
        .map_or_else(BorrowedBuf::empty, BorrowedBuf::from)
}

pub(crate) fn dispatch_borrowed<S: TokenSink + ?Sized>(sink: &mut S, token: Token) {
    match token {
        Token::Doctype(doctype) => sink.doctype(
            view(&doctype.name),
            view(&doctype.public_id),
            view(&doctype.system_id),
            doctype.force_quirks,
        ),
        Token::Tag(Tag {
            kind: TagKind::Start,
            name,
            self_closing,
            attrs,
        }) => {
            sink.start_tag(name.as_str().into(), self_closing, attrs.len());
            for attr in &attrs {
                sink.tag_attr(attr.name.as_str().into(), attr.value.as_str().into());
            }
        }
        Token::Tag(Tag {
            kind: TagKind::End,
            name,
            ..
        }) => sink.end_tag(name.as_str().into()),
        Token::Comment(text) => sink.comment(text.as_str().into()),
        Token::Characters(text) => sink.chars(text.as_str().into()),
        Token::NullCharacter => sink.null_char(),
        Token::Eof => sink.eof(),
        Token::ParseError(message) => sink.error(message.as_str().into()),
    }
}

/// Every payload a shared dispatch hands over as a buffer, in callback order.
fn for_each_payload(token: &Token, mut f: impl FnMut(&str)) {
    match token {
        Token::Doctype(doctype) => {
            for field in [&doctype.name, &doctype.public_id, &doctype.system_id] {
                f(field.as_deref().unwrap_or_default());
            }
        }
        Token::Tag(Tag {
            kind: TagKind::Start,
            attrs,
            ..
        }) => attrs.iter().for_each(|attr| f(&attr.value)),
        Token::Comment(text) | Token::Characters(text) | Token::ParseError(text) => f(text),
        Token::Tag(_) | Token::NullCharacter | Token::Eof => {}
    }
}

/// One batch's payloads packed into a single allocation, handed out as
/// windows in the order they were packed.
struct Packed {
    buf: SharedBuf,
    pos: usize,
}

impl Packed {
    fn new(tokens: &[Token]) -> Self {
        let mut len = 0;
        for token in tokens {
            for_each_payload(token, |text| len += text.len());
        }
        let mut bytes = Vec::with_capacity(len);
        for token in tokens {
            for_each_payload(token, |text| bytes.extend_from_slice(text.as_bytes()));
        }
        Self {
            buf: SharedBuf::from(bytes),
            pos: 0,
        }
    }

    fn next(&mut self, text: &str) -> SharedBuf {
        let start = self.pos;
        self.pos += text.len();
        let window = self.buf.subbuf(start..self.pos);
        debug_assert_eq!(window.as_bytes(), text.as_bytes());
        window
    }

    fn next_field(&mut self, field: Option<&str>) -> SharedBuf {
        self.next(field.unwrap_or_default())
    }
}

/// Names are interned. Every other buffer of the batch is a window into one
/// shared allocation the sink may keep; a retained window keeps that whole
/// allocation alive.
pub(crate) fn dispatch_shared<S: SharedTokenSink + ?Sized>(sink: &mut S, tokens: Vec<Token>) {
    let mut packed = Packed::new(&tokens);
    for token in tokens {
        match token {
            Token::Doctype(Doctype {
                name,
                public_id,
                system_id,
                force_quirks,
            }) => {
                let name = packed.next_field(name.as_deref());
                let public_id = packed.next_field(public_id.as_deref());
                let system_id = packed.next_field(system_id.as_deref());
                sink.doctype(name, public_id, system_id, force_quirks);
            }
            Token::Tag(Tag {
                kind: TagKind::Start,
                name,
                self_closing,
                attrs,
            }) => {
                sink.start_tag(Atom::intern(name.as_bytes()), self_closing, attrs.len());
                for attr in attrs {
                    sink.tag_attr(Atom::intern(attr.name.as_bytes()), packed.next(&attr.value));
                }
            }
            Token::Tag(Tag {
                kind: TagKind::End,
                name,
                ..
            }) => sink.end_tag(Atom::intern(name.as_bytes())),
            Token::Comment(text) => sink.comment(packed.next(&text)),
            Token::Characters(text) => sink.chars(packed.next(&text)),
            Token::NullCharacter => sink.null_char(),
            Token::Eof => sink.eof(),
            Token::ParseError(message) => sink.error(packed.next(&message)),
        }
    }
}
