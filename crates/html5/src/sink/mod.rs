//! Consumer-side callback interfaces.
//!
//! A sink is the dispatch table plus consumer context: the implementing value
//! is the context, and each trait method is one event kind. Every method is
//! required, so a sink that compiles handles every event the tokenizer emits.
//!
//! Ordering contract the tokenizer upholds and a sink may rely on:
//! - `start_tag(.., num_attrs = N)` is followed by exactly N `tag_attr` calls
//!   before any other callback.
//! - `doctype`, `end_tag`, `comment`, `chars`, `null_char`, `error` are single
//!   calls with no follow-ups.
//! - `eof` is called exactly once, from `end()`, and nothing follows it.
//! - Callbacks arrive in document order, synchronously, during `feed`/`end`.
//!
//! Callbacks cannot fail. A sink that cannot continue should record a sticky
//! failure in its own state and ignore later calls; the tokenizer does not
//! observe it.

mod checked;

pub use checked::ContractCheck;

use crate::atom::Atom;
use crate::buf::{BorrowedBuf, SharedBuf};

/// Borrowed-buffer surface: names are raw bytes and every buffer is only valid
/// for the duration of the callback.
pub trait TokenSink {
    /// Missing name or identifiers arrive as empty views.
    fn doctype(
        &mut self,
        name: BorrowedBuf<'_>,
        public_id: BorrowedBuf<'_>,
        system_id: BorrowedBuf<'_>,
        force_quirks: bool,
    );
    fn start_tag(&mut self, name: BorrowedBuf<'_>, self_closing: bool, num_attrs: usize);
    fn tag_attr(&mut self, name: BorrowedBuf<'_>, value: BorrowedBuf<'_>);
    fn end_tag(&mut self, name: BorrowedBuf<'_>);
    fn comment(&mut self, text: BorrowedBuf<'_>);
    fn chars(&mut self, text: BorrowedBuf<'_>);
    fn null_char(&mut self);
    fn eof(&mut self);
    fn error(&mut self, message: BorrowedBuf<'_>);
}

/// Shared-buffer surface: tag and attribute names are interned atoms, and
/// every buffer may be retained past the callback.
pub trait SharedTokenSink {
    fn doctype(
        &mut self,
        name: SharedBuf,
        public_id: SharedBuf,
        system_id: SharedBuf,
        force_quirks: bool,
    );
    fn start_tag(&mut self, name: Atom, self_closing: bool, num_attrs: usize);
    fn tag_attr(&mut self, name: Atom, value: SharedBuf);
    fn end_tag(&mut self, name: Atom);
    fn comment(&mut self, text: SharedBuf);
    fn chars(&mut self, text: SharedBuf);
    fn null_char(&mut self);
    fn eof(&mut self);
    fn error(&mut self, message: SharedBuf);
}

impl<S: TokenSink + ?Sized> TokenSink for &mut S {
    fn doctype(
        &mut self,
        name: BorrowedBuf<'_>,
        public_id: BorrowedBuf<'_>,
        system_id: BorrowedBuf<'_>,
        force_quirks: bool,
    ) {
        (**self).doctype(name, public_id, system_id, force_quirks)
    }
    fn start_tag(&mut self, name: BorrowedBuf<'_>, self_closing: bool, num_attrs: usize) {
        (**self).start_tag(name, self_closing, num_attrs)
    }
    fn tag_attr(&mut self, name: BorrowedBuf<'_>, value: BorrowedBuf<'_>) {
        (**self).tag_attr(name, value)
    }
    fn end_tag(&mut self, name: BorrowedBuf<'_>) {
        (**self).end_tag(name)
    }
    fn comment(&mut self, text: BorrowedBuf<'_>) {
        (**self).comment(text)
    }
    fn chars(&mut self, text: BorrowedBuf<'_>) {
        (**self).chars(text)
    }
    fn null_char(&mut self) {
        (**self).null_char()
    }
    fn eof(&mut self) {
        (**self).eof()
    }
    fn error(&mut self, message: BorrowedBuf<'_>) {
        (**self).error(message)
    }
}

impl<S: TokenSink + ?Sized> TokenSink for Box<S> {
    fn doctype(
        &mut self,
        name: BorrowedBuf<'_>,
        public_id: BorrowedBuf<'_>,
        system_id: BorrowedBuf<'_>,
        force_quirks: bool,
    ) {
        (**self).doctype(name, public_id, system_id, force_quirks)
    }
    fn start_tag(&mut self, name: BorrowedBuf<'_>, self_closing: bool, num_attrs: usize) {
        (**self).start_tag(name, self_closing, num_attrs)
    }
    fn tag_attr(&mut self, name: BorrowedBuf<'_>, value: BorrowedBuf<'_>) {
        (**self).tag_attr(name, value)
    }
    fn end_tag(&mut self, name: BorrowedBuf<'_>) {
        (**self).end_tag(name)
    }
    fn comment(&mut self, text: BorrowedBuf<'_>) {
        (**self).comment(text)
    }
    fn chars(&mut self, text: BorrowedBuf<'_>) {
        (**self).chars(text)
    }
    fn null_char(&mut self) {
        (**self).null_char()
    }
    fn eof(&mut self) {
        (**self).eof()
    }
    fn error(&mut self, message: BorrowedBuf<'_>) {
        (**self).error(message)
    }
}

impl<S: SharedTokenSink + ?Sized> SharedTokenSink for &mut S {
    fn doctype(
        &mut self,
        name: SharedBuf,
        public_id: SharedBuf,
        system_id: SharedBuf,
        force_quirks: bool,
    ) {
        (**self).doctype(name, public_id, system_id, force_quirks)
    }
    fn start_tag(&mut self, name: Atom, self_closing: bool, num_attrs: usize) {
        (**self).start_tag(name, self_closing, num_attrs)
    }
    fn tag_attr(&mut self, name: Atom, value: SharedBuf) {
        (**self).tag_attr(name, value)
    }
    fn end_tag(&mut self, name: Atom) {
        (**self).end_tag(name)
    }
    fn comment(&mut self, text: SharedBuf) {
        (**self).comment(text)
    }
    fn chars(&mut self, text: SharedBuf) {
        (**self).chars(text)
    }
    fn null_char(&mut self) {
        (**self).null_char()
    }
    fn eof(&mut self) {
        (**self).eof()
    }
    fn error(&mut self, message: SharedBuf) {
        (**self).error(message)
    }
}

impl<S: SharedTokenSink + ?Sized> SharedTokenSink for Box<S> {
    fn doctype(
        &mut self,
        name: SharedBuf,
        public_id: SharedBuf,
        system_id: SharedBuf,
        force_quirks: bool,
    ) {
        (**self).doctype(name, public_id, system_id, force_quirks)
    }
    fn start_tag(&mut self, name: Atom, self_closing: bool, num_attrs: usize) {
        (**self).start_tag(name, self_closing, num_attrs)
    }
    fn tag_attr(&mut self, name: Atom, value: SharedBuf) {
        (**self).tag_attr(name, value)
    }
    fn end_tag(&mut self, name: Atom) {
        (**self).end_tag(name)
    }
    fn comment(&mut self, text: SharedBuf) {
        (**self).comment(text)
    }
    fn chars(&mut self, text: SharedBuf) {
        (**self).chars(text)
    }
    fn null_char(&mut self) {
        (**self).null_char()
    }
    fn eof(&mut self) {
        (**self).eof()
    }
    fn error(&mut self, message: SharedBuf) {
        (**self).error(message)
    }
}
