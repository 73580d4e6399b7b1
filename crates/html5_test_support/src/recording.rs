use html5::{
    Atom, BorrowedBuf, ByteSpan, ContractCheck, SharedBuf, SharedTokenSink, SharedTokenizer,
    TokenSink, Tokenizer, TokenizerConfig,
};

use crate::chunks::ChunkPlan;
use crate::escape_text;

struct OpenTag {
    name: String,
    self_closing: bool,
    remaining: usize,
    attrs: Vec<String>,
}

/// Sink that renders every event as one snapshot line.
///
/// A start tag becomes a single line once all of its declared attributes have
/// arrived, so both surfaces produce identical output for the same input.
#[derive(Default)]
pub struct RecordingSink {
    lines: Vec<String>,
    open_tag: Option<OpenTag>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        assert!(
            self.open_tag.is_none(),
            "recording ended inside a start tag's attribute run"
        );
        self.lines
    }

    fn quoted(bytes: &[u8]) -> String {
        format!("\"{}\"", escape_text(&String::from_utf8_lossy(bytes)))
    }

    fn record_doctype(&mut self, name: &[u8], public_id: &[u8], system_id: &[u8], quirks: bool) {
        self.lines.push(format!(
            "DOCTYPE name={} public_id={} system_id={} force_quirks={quirks}",
            Self::quoted(name),
            Self::quoted(public_id),
            Self::quoted(system_id)
        ));
    }

    fn record_start_tag(&mut self, name: String, self_closing: bool, num_attrs: usize) {
        let tag = OpenTag {
            name,
            self_closing,
            remaining: num_attrs,
            attrs: Vec::with_capacity(num_attrs),
        };
        if num_attrs == 0 {
            self.close_tag(tag);
        } else {
            self.open_tag = Some(tag);
        }
    }

    fn record_attr(&mut self, name: String, value: &[u8]) {
        let mut tag = self
            .open_tag
            .take()
            .unwrap_or_else(|| panic!("attribute {name:?} outside a start tag"));
        tag.attrs.push(format!("{name}={}", Self::quoted(value)));
        tag.remaining -= 1;
        if tag.remaining == 0 {
            self.close_tag(tag);
        } else {
            self.open_tag = Some(tag);
        }
    }

    fn close_tag(&mut self, tag: OpenTag) {
        self.lines.push(format!(
            "START name={} attrs=[{}] self_closing={}",
            tag.name,
            tag.attrs.join(" "),
            tag.self_closing
        ));
    }

    fn record(&mut self, kind: &str, bytes: &[u8]) {
        self.lines.push(format!("{kind} text={}", Self::quoted(bytes)));
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl TokenSink for RecordingSink {
    fn doctype(
        &mut self,
        name: BorrowedBuf<'_>,
        public_id: BorrowedBuf<'_>,
        system_id: BorrowedBuf<'_>,
        force_quirks: bool,
    ) {
        self.record_doctype(name.bytes(), public_id.bytes(), system_id.bytes(), force_quirks);
    }

    fn start_tag(&mut self, name: BorrowedBuf<'_>, self_closing: bool, num_attrs: usize) {
        self.record_start_tag(lossy(name.bytes()), self_closing, num_attrs);
    }

    fn tag_attr(&mut self, name: BorrowedBuf<'_>, value: BorrowedBuf<'_>) {
        self.record_attr(lossy(name.bytes()), value.bytes());
    }

    fn end_tag(&mut self, name: BorrowedBuf<'_>) {
        self.lines.push(format!("END name={}", lossy(name.bytes())));
    }

    fn comment(&mut self, text: BorrowedBuf<'_>) {
        self.record("COMMENT", text.bytes());
    }

    fn chars(&mut self, text: BorrowedBuf<'_>) {
        self.record("CHAR", text.bytes());
    }

    fn null_char(&mut self) {
        self.lines.push("NULL".to_string());
    }

    fn eof(&mut self) {
        self.lines.push("EOF".to_string());
    }

    fn error(&mut self, message: BorrowedBuf<'_>) {
        self.lines
            .push(format!("ERROR {}", message.to_str_lossy()));
    }
}

impl SharedTokenSink for RecordingSink {
    fn doctype(
        &mut self,
        name: SharedBuf,
        public_id: SharedBuf,
        system_id: SharedBuf,
        force_quirks: bool,
    ) {
        self.record_doctype(
            name.as_bytes(),
            public_id.as_bytes(),
            system_id.as_bytes(),
            force_quirks,
        );
    }

    fn start_tag(&mut self, name: Atom, self_closing: bool, num_attrs: usize) {
        self.record_start_tag(name.to_string_lossy(), self_closing, num_attrs);
    }

    fn tag_attr(&mut self, name: Atom, value: SharedBuf) {
        self.record_attr(name.to_string_lossy(), value.as_bytes());
    }

    fn end_tag(&mut self, name: Atom) {
        self.lines.push(format!("END name={name}"));
    }

    fn comment(&mut self, text: SharedBuf) {
        self.record("COMMENT", text.as_bytes());
    }

    fn chars(&mut self, text: SharedBuf) {
        self.record("CHAR", text.as_bytes());
    }

    fn null_char(&mut self) {
        self.lines.push("NULL".to_string());
    }

    fn eof(&mut self) {
        self.lines.push("EOF".to_string());
    }

    fn error(&mut self, message: SharedBuf) {
        self.lines
            .push(format!("ERROR {}", message.to_str_lossy()));
    }
}

/// Tokenize `input` in one `feed` on the borrowed surface.
pub fn run_borrowed(config: &TokenizerConfig, input: &[u8]) -> Vec<String> {
    run_chunks(config, &[input])
}

/// Tokenize `input` on the borrowed surface, split according to `plan`.
pub fn run_chunked(config: &TokenizerConfig, input: &[u8], plan: &ChunkPlan) -> Vec<String> {
    run_chunks(config, &plan.split(input))
}

fn run_chunks(config: &TokenizerConfig, chunks: &[&[u8]]) -> Vec<String> {
    let sink = ContractCheck::new(RecordingSink::new());
    let mut tokenizer = Tokenizer::with_config(sink, config.clone());
    for chunk in chunks {
        tokenizer.feed(*chunk);
    }
    tokenizer.end();
    tokenizer.free().into_inner().into_lines()
}

/// Tokenize `input` in one `feed` on the shared surface.
pub fn run_shared(config: &TokenizerConfig, input: &[u8]) -> Vec<String> {
    run_shared_chunks(config, &[input])
}

pub fn run_shared_chunked(
    config: &TokenizerConfig,
    input: &[u8],
    plan: &ChunkPlan,
) -> Vec<String> {
    run_shared_chunks(config, &plan.split(input))
}

fn run_shared_chunks(config: &TokenizerConfig, chunks: &[&[u8]]) -> Vec<String> {
    let sink = ContractCheck::new(RecordingSink::new());
    let mut tokenizer = SharedTokenizer::with_config(sink, config.clone());
    for chunk in chunks {
        tokenizer.feed(*chunk);
    }
    tokenizer.end();
    tokenizer.free().into_inner().into_lines()
}
