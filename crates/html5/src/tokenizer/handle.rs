//! Tokenizer handles: the create / feed / end / free lifecycle.
//!
//! A handle owns its engine and is bound to one sink for its whole life; there
//! is no way to swap the sink. Lifecycle misuse is a caller bug and panics:
//! - `feed` after `end` panics with "feed called after end()";
//! - a second `end` panics with "end called twice".
//!
//! `free` consumes the handle and returns the sink, so using a freed handle
//! does not compile:
//!
//! ```compile_fail
//! use html5::{ContractCheck, Tokenizer};
//! # use html5::{BorrowedBuf, TokenSink};
//! # struct Nop;
//! # impl TokenSink for Nop {
//! #     fn doctype(&mut self, _: BorrowedBuf<'_>, _: BorrowedBuf<'_>, _: BorrowedBuf<'_>, _: bool) {}
//! #     fn start_tag(&mut self, _: BorrowedBuf<'_>, _: bool, _: usize) {}
//! #     fn tag_attr(&mut self, _: BorrowedBuf<'_>, _: BorrowedBuf<'_>) {}
//! #     fn end_tag(&mut self, _: BorrowedBuf<'_>) {}
//! #     fn comment(&mut self, _: BorrowedBuf<'_>) {}
//! #     fn chars(&mut self, _: BorrowedBuf<'_>) {}
//! #     fn null_char(&mut self) {}
//! #     fn eof(&mut self) {}
//! #     fn error(&mut self, _: BorrowedBuf<'_>) {}
//! # }
//! let mut tok = Tokenizer::new(ContractCheck::new(Nop));
//! tok.end();
//! let _sink = tok.free();
//! tok.feed("late");
//! ```

use super::dispatch::{dispatch_borrowed, dispatch_shared};
use super::{Engine, TokenizerConfig, TokenizerStats};
use crate::buf::{BorrowedBuf, ByteSpan, SharedBuf};
use crate::sink::{SharedTokenSink, TokenSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Created,
    Feeding,
    Ended,
}

/// Lifecycle bookkeeping shared by both handle kinds.
struct Lifecycle {
    engine: Engine,
    phase: Phase,
}

impl Lifecycle {
    fn new(config: TokenizerConfig) -> Self {
        log::debug!(
            target: "html5.tokenizer",
            "tokenizer created: initial_state={:?} exact_errors={}",
            config.initial_state,
            config.exact_errors
        );
        Self {
            engine: Engine::new(config),
            phase: Phase::Created,
        }
    }

    /// Returns false for an empty chunk, which is a no-op.
    fn feed(&mut self, bytes: &[u8]) -> bool {
        assert!(self.phase != Phase::Ended, "feed called after end()");
        if bytes.is_empty() {
            return false;
        }
        self.phase = Phase::Feeding;
        self.engine.push_bytes(bytes);
        true
    }

    fn end(&mut self) {
        assert!(self.phase != Phase::Ended, "end called twice");
        self.engine.finish();
        self.phase = Phase::Ended;
        log::debug!(target: "html5.tokenizer", "tokenizer ended: {:?}", self.engine.stats());
    }
}

/// Tokenizer handle for the borrowed-buffer surface.
///
/// Input chunks are borrowed for the duration of `feed` only; the engine
/// copies what it still needs. Sink callbacks receive views into the
/// engine's token storage.
pub struct Tokenizer<S: TokenSink> {
    core: Lifecycle,
    sink: S,
}

impl<S: TokenSink> Tokenizer<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, TokenizerConfig::default())
    }

    pub fn with_config(sink: S, config: TokenizerConfig) -> Self {
        Self {
            core: Lifecycle::new(config),
            sink,
        }
    }

    /// Tokenize the next chunk, invoking sink callbacks before returning.
    ///
    /// # Panics
    /// Panics if called after [`end`](Self::end).
    pub fn feed<'a>(&mut self, input: impl Into<BorrowedBuf<'a>>) {
        let input = input.into();
        if self.core.feed(input.bytes()) {
            self.dispatch();
        }
    }

    /// Signal end of input: flush partial tokens, then call `eof` exactly
    /// once.
    ///
    /// # Panics
    /// Panics if called twice.
    pub fn end(&mut self) {
        self.core.end();
        self.dispatch();
    }

    /// Release the handle and return the sink.
    pub fn free(self) -> S {
        self.sink
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn stats(&self) -> TokenizerStats {
        self.core.engine.stats()
    }

    pub fn is_ended(&self) -> bool {
        self.core.phase == Phase::Ended
    }

    fn dispatch(&mut self) {
        for token in self.core.engine.drain_tokens() {
            dispatch_borrowed(&mut self.sink, token);
        }
    }
}

/// Tokenizer handle for the shared-buffer surface: tag and attribute names
/// arrive as [`Atom`](crate::Atom)s and every buffer may be retained.
pub struct SharedTokenizer<S: SharedTokenSink> {
    core: Lifecycle,
    sink: S,
}

impl<S: SharedTokenSink> SharedTokenizer<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, TokenizerConfig::default())
    }

    pub fn with_config(sink: S, config: TokenizerConfig) -> Self {
        Self {
            core: Lifecycle::new(config),
            sink,
        }
    }

    /// Tokenize the next chunk. Ownership of the chunk passes to the
    /// tokenizer.
    ///
    /// # Panics
    /// Panics if called after [`end`](Self::end).
    pub fn feed(&mut self, input: impl Into<SharedBuf>) {
        let input = input.into();
        if self.core.feed(input.as_bytes()) {
            self.dispatch();
        }
    }

    /// # Panics
    /// Panics if called twice.
    pub fn end(&mut self) {
        self.core.end();
        self.dispatch();
    }

    pub fn free(self) -> S {
        self.sink
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn stats(&self) -> TokenizerStats {
        self.core.engine.stats()
    }

    pub fn is_ended(&self) -> bool {
        self.core.phase == Phase::Ended
    }

    fn dispatch(&mut self) {
        let tokens = self.core.engine.take_tokens();
        if !tokens.is_empty() {
            dispatch_shared(&mut self.sink, tokens);
        }
    }
}
