//! Runtime enforcement of the sink ordering contract.

use super::{SharedTokenSink, TokenSink};
use crate::atom::Atom;
use crate::buf::{BorrowedBuf, SharedBuf};

/// Sink adapter that panics as soon as the callback stream breaks the ordering
/// contract, then forwards to the wrapped sink.
///
/// Checked rules:
/// - a start tag declaring N attributes is followed by exactly N attributes;
/// - an attribute only appears inside such a run;
/// - `eof` happens at most once and nothing follows it.
#[derive(Debug, Default)]
pub struct ContractCheck<S> {
    inner: S,
    pending_attrs: usize,
    saw_eof: bool,
    callbacks: u64,
}

impl<S> ContractCheck<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending_attrs: 0,
            saw_eof: false,
            callbacks: 0,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn saw_eof(&self) -> bool {
        self.saw_eof
    }

    /// Total callbacks observed, attributes included.
    pub fn callbacks(&self) -> u64 {
        self.callbacks
    }

    fn before_event(&mut self, event: &str) {
        assert!(
            !self.saw_eof,
            "sink contract violated: {event} callback after eof"
        );
        assert_eq!(
            self.pending_attrs, 0,
            "sink contract violated: {event} callback while {} declared attribute(s) are outstanding",
            self.pending_attrs
        );
        self.callbacks += 1;
    }

    fn before_attr(&mut self) {
        assert!(
            !self.saw_eof,
            "sink contract violated: tag_attr callback after eof"
        );
        assert!(
            self.pending_attrs > 0,
            "sink contract violated: tag_attr callback beyond the declared attribute count"
        );
        self.pending_attrs -= 1;
        self.callbacks += 1;
    }

    fn start_tag_declared(&mut self, num_attrs: usize) {
        self.before_event("start_tag");
        self.pending_attrs = num_attrs;
    }

    fn eof_seen(&mut self) {
        self.before_event("eof");
        self.saw_eof = true;
    }
}

impl<S: TokenSink> TokenSink for ContractCheck<S> {
    fn doctype(
        &mut self,
        name: BorrowedBuf<'_>,
        public_id: BorrowedBuf<'_>,
        system_id: BorrowedBuf<'_>,
        force_quirks: bool,
    ) {
        self.before_event("doctype");
        self.inner.doctype(name, public_id, system_id, force_quirks);
    }

    fn start_tag(&mut self, name: BorrowedBuf<'_>, self_closing: bool, num_attrs: usize) {
        self.start_tag_declared(num_attrs);
        self.inner.start_tag(name, self_closing, num_attrs);
    }

    fn tag_attr(&mut self, name: BorrowedBuf<'_>, value: BorrowedBuf<'_>) {
        self.before_attr();
        self.inner.tag_attr(name, value);
    }

    fn end_tag(&mut self, name: BorrowedBuf<'_>) {
        self.before_event("end_tag");
        self.inner.end_tag(name);
    }

    fn comment(&mut self, text: BorrowedBuf<'_>) {
        self.before_event("comment");
        self.inner.comment(text);
    }

    fn chars(&mut self, text: BorrowedBuf<'_>) {
        self.before_event("chars");
        self.inner.chars(text);
    }

    fn null_char(&mut self) {
        self.before_event("null_char");
        self.inner.null_char();
    }

    fn eof(&mut self) {
        self.eof_seen();
        self.inner.eof();
    }

    fn error(&mut self, message: BorrowedBuf<'_>) {
        self.before_event("error");
        self.inner.error(message);
    }
}

impl<S: SharedTokenSink> SharedTokenSink for ContractCheck<S> {
    fn doctype(
        &mut self,
        name: SharedBuf,
        public_id: SharedBuf,
        system_id: SharedBuf,
        force_quirks: bool,
    ) {
        self.before_event("doctype");
        self.inner.doctype(name, public_id, system_id, force_quirks);
    }

    fn start_tag(&mut self, name: Atom, self_closing: bool, num_attrs: usize) {
        self.start_tag_declared(num_attrs);
        self.inner.start_tag(name, self_closing, num_attrs);
    }

    fn tag_attr(&mut self, name: Atom, value: SharedBuf) {
        self.before_attr();
        self.inner.tag_attr(name, value);
    }

    fn end_tag(&mut self, name: Atom) {
        self.before_event("end_tag");
        self.inner.end_tag(name);
    }

    fn comment(&mut self, text: SharedBuf) {
        self.before_event("comment");
        self.inner.comment(text);
    }

    fn chars(&mut self, text: SharedBuf) {
        self.before_event("chars");
        self.inner.chars(text);
    }

    fn null_char(&mut self) {
        self.before_event("null_char");
        self.inner.null_char();
    }

    fn eof(&mut self) {
        self.eof_seen();
        self.inner.eof();
    }

    fn error(&mut self, message: SharedBuf) {
        self.before_event("error");
        self.inner.error(message);
    }
}
