//! Tokenizer input: incremental UTF-8 decoding and newline normalization.
//!
//! Bytes arrive in arbitrary chunks. A UTF-8 sequence split across chunks is
//! carried until it completes; invalid sequences decode to U+FFFD. CR and CRLF
//! become LF, with a trailing CR remembered so that an LF opening the next
//! chunk is dropped. The decoded text is what the state machine walks.

use memchr::{memchr, memchr3};

use super::Engine;

/// Outcome of a lookahead match against buffered input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MatchResult {
    Matched,
    /// Buffered input is a proper prefix of the pattern and more may arrive.
    NeedMoreInput,
    NoMatch,
}

#[derive(Debug)]
pub(crate) struct DecodedInput {
    text: String,
    cursor: usize,
    carry: Vec<u8>,
    after_cr: bool,
    seen_first_char: bool,
    discard_bom: bool,
    finished: bool,
    consumed: u64,
}

impl DecodedInput {
    pub(crate) fn new(discard_bom: bool) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            carry: Vec::new(),
            after_cr: false,
            seen_first_char: false,
            discard_bom,
            finished: false,
            consumed: 0,
        }
    }

    pub(crate) fn push_bytes(&mut self, mut bytes: &[u8]) {
        debug_assert!(!self.finished, "push_bytes after finish");
        // A carried suffix is at most 3 bytes; resolve it one byte at a time so
        // decoding matches what a single contiguous buffer would produce.
        while !self.carry.is_empty() && !bytes.is_empty() {
            let mut pending = std::mem::take(&mut self.carry);
            pending.push(bytes[0]);
            bytes = &bytes[1..];
            self.decode(&pending);
        }
        if !bytes.is_empty() {
            self.decode(bytes);
        }
    }

    /// Flush an incomplete trailing sequence (as U+FFFD) and mark end of input.
    pub(crate) fn finish(&mut self) {
        if !self.carry.is_empty() {
            let carry = std::mem::take(&mut self.carry);
            let lossy = String::from_utf8_lossy(&carry).into_owned();
            self.push_text(&lossy);
        }
        self.finished = true;
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.text[self.cursor..].chars().next()
    }

    pub(crate) fn advance(&mut self, c: char) {
        debug_assert_eq!(self.peek(), Some(c));
        self.cursor += c.len_utf8();
        self.consumed += 1;
    }

    /// Characters consumed so far.
    pub(crate) fn position(&self) -> u64 {
        self.consumed
    }

    /// Match an ASCII `pattern` at the cursor without consuming it.
    pub(crate) fn match_ascii(&self, pattern: &str, ignore_case: bool) -> MatchResult {
        let available = &self.text.as_bytes()[self.cursor..];
        let pattern = pattern.as_bytes();
        let n = available.len().min(pattern.len());
        let prefix_matches = if ignore_case {
            available[..n].eq_ignore_ascii_case(&pattern[..n])
        } else {
            available[..n] == pattern[..n]
        };
        if !prefix_matches {
            MatchResult::NoMatch
        } else if n == pattern.len() {
            MatchResult::Matched
        } else if self.finished {
            MatchResult::NoMatch
        } else {
            MatchResult::NeedMoreInput
        }
    }

    /// Consume `len` ASCII characters previously confirmed by `match_ascii`.
    pub(crate) fn skip_ascii(&mut self, len: usize) -> &str {
        let start = self.cursor;
        self.cursor += len;
        self.consumed += len as u64;
        &self.text[start..self.cursor]
    }

    /// Consume the run of characters before the first of three ASCII stop
    /// bytes (or the end of the buffer) and return it.
    pub(crate) fn take_text_until(&mut self, a: u8, b: u8, c: u8) -> &str {
        let rest = &self.text[self.cursor..];
        let len = memchr3(a, b, c, rest.as_bytes()).unwrap_or(rest.len());
        let start = self.cursor;
        self.cursor += len;
        let run = &self.text[start..self.cursor];
        self.consumed += run.chars().count() as u64;
        run
    }

    /// Drop consumed text so the buffer only holds what the machine has not
    /// looked at yet.
    pub(crate) fn compact(&mut self) {
        if self.cursor == 0 {
            return;
        }
        if self.cursor == self.text.len() {
            self.text.clear();
        } else {
            self.text.drain(..self.cursor);
        }
        self.cursor = 0;
    }

    #[cfg(test)]
    pub(crate) fn buffered_len(&self) -> usize {
        self.text.len() - self.cursor
    }

    fn decode(&mut self, mut bytes: &[u8]) {
        loop {
            match std::str::from_utf8(bytes) {
                Ok(text) => {
                    self.push_text(text);
                    return;
                }
                Err(err) => {
                    let (valid, rest) = bytes.split_at(err.valid_up_to());
                    if let Ok(text) = std::str::from_utf8(valid) {
                        self.push_text(text);
                    }
                    match err.error_len() {
                        Some(len) => {
                            self.push_text("\u{FFFD}");
                            bytes = &rest[len..];
                        }
                        None => {
                            self.carry.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn push_text(&mut self, mut text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.seen_first_char {
            self.seen_first_char = true;
            if self.discard_bom
                && let Some(rest) = text.strip_prefix('\u{FEFF}')
            {
                text = rest;
            }
        }
        if self.after_cr && !text.is_empty() {
            self.after_cr = false;
            if let Some(rest) = text.strip_prefix('\n') {
                text = rest;
            }
        }
        while let Some(idx) = memchr(b'\r', text.as_bytes()) {
            self.text.push_str(&text[..idx]);
            self.text.push('\n');
            text = &text[idx + 1..];
            if let Some(rest) = text.strip_prefix('\n') {
                text = rest;
            } else if text.is_empty() {
                self.after_cr = true;
            }
        }
        self.text.push_str(text);
    }
}

impl Engine {
    pub(super) fn peek(&self) -> Option<char> {
        self.input.peek()
    }

    pub(super) fn consume(&mut self, c: char) {
        self.input.advance(c);
    }

    pub(super) fn next_char(&mut self) -> Option<char> {
        let c = self.input.peek()?;
        self.consume(c);
        Some(c)
    }

    pub(super) fn skip_ascii(&mut self, len: usize) -> &str {
        self.input.skip_ascii(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_chunks(chunks: &[&[u8]]) -> String {
        let mut input = DecodedInput::new(true);
        for chunk in chunks {
            input.push_bytes(chunk);
        }
        input.finish();
        let mut out = String::new();
        while let Some(c) = input.peek() {
            input.advance(c);
            out.push(c);
        }
        out
    }

    #[test]
    fn multibyte_sequence_split_across_chunks() {
        let bytes = "é€😀".as_bytes();
        let whole = decode_chunks(&[bytes]);
        assert_eq!(whole, "é€😀");
        for split in 1..bytes.len() {
            let (a, b) = bytes.split_at(split);
            assert_eq!(decode_chunks(&[a, b]), whole, "split at {split}");
        }
        let singles: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(decode_chunks(&singles), whole);
    }

    #[test]
    fn invalid_bytes_become_replacement_characters() {
        assert_eq!(decode_chunks(&[b"a\xFFb"]), "a\u{FFFD}b");
        assert_eq!(decode_chunks(&[b"a\xE2", b"\x82"]), "a\u{FFFD}");
        assert_eq!(decode_chunks(&[b"\xE0", b"A"]), "\u{FFFD}A");
    }

    #[test]
    fn truncated_sequence_at_end_is_flushed() {
        assert_eq!(decode_chunks(&[b"ok\xF0\x9F"]), "ok\u{FFFD}");
    }

    #[test]
    fn newlines_are_normalized_across_chunks() {
        assert_eq!(decode_chunks(&[b"a\r\nb\rc\n"]), "a\nb\nc\n");
        assert_eq!(decode_chunks(&[b"a\r", b"\nb"]), "a\nb");
        assert_eq!(decode_chunks(&[b"a\r", b"", b"\nb"]), "a\nb");
        assert_eq!(decode_chunks(&[b"a\r", b"\r", b"\n"]), "a\n\n");
    }

    #[test]
    fn leading_bom_is_discarded_once() {
        assert_eq!(decode_chunks(&[b"\xEF\xBB\xBFhi"]), "hi");
        assert_eq!(decode_chunks(&[b"\xEF", b"\xBB", b"\xBFhi"]), "hi");
        assert_eq!(decode_chunks(&[b"hi\xEF\xBB\xBF"]), "hi\u{FEFF}");

        let mut kept = DecodedInput::new(false);
        kept.push_bytes(b"\xEF\xBB\xBFx");
        assert_eq!(kept.peek(), Some('\u{FEFF}'));
    }

    #[test]
    fn ascii_lookahead_waits_for_more_input() {
        let mut input = DecodedInput::new(true);
        input.push_bytes(b"DOC");
        assert_eq!(input.match_ascii("doctype", true), MatchResult::NeedMoreInput);
        assert_eq!(input.match_ascii("doctype", false), MatchResult::NoMatch);
        input.push_bytes(b"TYPE html");
        assert_eq!(input.match_ascii("doctype", true), MatchResult::Matched);
        assert_eq!(input.skip_ascii(7), "DOCTYPE");
        assert_eq!(input.position(), 7);

        let mut short = DecodedInput::new(true);
        short.push_bytes(b"-");
        short.finish();
        assert_eq!(short.match_ascii("--", false), MatchResult::NoMatch);
    }

    #[test]
    fn compact_drops_consumed_text() {
        let mut input = DecodedInput::new(true);
        input.push_bytes(b"abc");
        input.advance('a');
        input.compact();
        assert_eq!(input.buffered_len(), 2);
        assert_eq!(input.peek(), Some('b'));
    }
}
