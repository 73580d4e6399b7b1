//! Push-based HTML tokenizer with a callback sink boundary.
//!
//! A [`Tokenizer`] (borrowed surface) or [`SharedTokenizer`] (shared surface)
//! is created around a sink, fed byte chunks, ended once, and freed. During
//! `feed`/`end` it drives the sink synchronously with one callback per token.

pub mod atom;
pub mod buf;
pub mod sink;
pub mod tokenizer;

mod entities;

pub use crate::atom::{Atom, AtomError, AtomId, AtomTable};
pub use crate::buf::{BorrowedBuf, ByteSpan, SharedBuf};
pub use crate::sink::{ContractCheck, SharedTokenSink, TokenSink};
pub use crate::tokenizer::{
    InitialState, ParseError, ParseErrorCode, SharedTokenizer, Tokenizer, TokenizerConfig,
    TokenizerStats,
};
