//! HTML5 tokenizer: the opaque handles and the engine behind them.
//!
//! The engine is a push-driven state machine. Each `feed` decodes the new
//! bytes, runs the machine until it needs more input, and then the handle
//! drains the queued tokens into the sink. All partial-token state (a tag
//! name, an attribute value, a character reference, a split UTF-8 sequence, a
//! trailing CR) lives in the engine between calls.
//!
//! Invariants:
//! - Chunk-equivalence: any split of the same bytes into `feed` calls yields
//!   the same callback sequence. Character runs are held until the next
//!   non-character event (or `end`) for this reason.
//! - EOF once: `Token::Eof` is produced exactly once, from `finish`, and
//!   nothing is produced after it.

use std::mem;

use char_ref::CharRef;
use input::DecodedInput;
use states::{AttrValueKind, RawKind, ScriptEscapeKind, TokenizerState};
use token::{Attribute, Doctype, Tag, TagKind, Token};

mod char_ref;
mod declarations;
mod dispatch;
mod emit;
mod error;
mod handle;
mod input;
mod script;
mod states;
mod token;

pub use error::{ParseError, ParseErrorCode};
pub use handle::{SharedTokenizer, Tokenizer};

/// State the machine starts in. Anything other than `Data` tokenizes the
/// input as the content of a raw text element, as a fragment parser would.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitialState {
    #[default]
    Data,
    Rcdata,
    Rawtext,
    ScriptData,
    Plaintext,
}

/// Configuration for the tokenizer.
#[derive(Clone, Debug)]
pub struct TokenizerConfig {
    /// Report errors with the machine state and character position instead
    /// of the bare error code.
    pub exact_errors: bool,
    /// Drop a U+FEFF at the very start of the input.
    pub discard_bom: bool,
    pub initial_state: InitialState,
    /// Tag name treated as the last start tag, so that a matching end tag
    /// closes the raw text content selected by `initial_state`.
    pub last_start_tag_name: Option<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            exact_errors: false,
            discard_bom: true,
            initial_state: InitialState::Data,
            last_start_tag_name: None,
        }
    }
}

/// Tokenizer instrumentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub feeds: u64,
    pub bytes_fed: u64,
    /// Characters consumed after decoding and newline normalization.
    pub chars_consumed: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
    pub parse_errors: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Progress,
    NeedMoreInput,
}

pub(crate) struct Engine {
    config: TokenizerConfig,
    state: TokenizerState,
    input: DecodedInput,
    tokens: Vec<Token>,
    pending_text: String,
    char_ref: Option<CharRef>,
    current_tag: Tag,
    current_attr: Option<Attribute>,
    current_comment: String,
    current_doctype: Doctype,
    temp_buf: String,
    last_start_tag_name: Option<String>,
    eof_emitted: bool,
    stats: TokenizerStats,
}

impl Engine {
    pub(crate) fn new(config: TokenizerConfig) -> Self {
        let state = match config.initial_state {
            InitialState::Data => TokenizerState::Data,
            InitialState::Rcdata => TokenizerState::RawData(RawKind::Rcdata),
            InitialState::Rawtext => TokenizerState::RawData(RawKind::Rawtext),
            InitialState::ScriptData => TokenizerState::RawData(RawKind::ScriptData),
            InitialState::Plaintext => TokenizerState::Plaintext,
        };
        let last_start_tag_name = config
            .last_start_tag_name
            .as_deref()
            .map(str::to_ascii_lowercase);
        Self {
            input: DecodedInput::new(config.discard_bom),
            config,
            state,
            tokens: Vec::new(),
            pending_text: String::new(),
            char_ref: None,
            current_tag: Tag::new(TagKind::Start),
            current_attr: None,
            current_comment: String::new(),
            current_doctype: Doctype::default(),
            temp_buf: String::new(),
            last_start_tag_name,
            eof_emitted: false,
            stats: TokenizerStats::default(),
        }
    }

    /// Decode `bytes` and run the machine as far as the input allows.
    pub(crate) fn push_bytes(&mut self, bytes: &[u8]) {
        debug_assert!(!self.input.is_finished(), "push_bytes after finish");
        self.stats.feeds = self.stats.feeds.saturating_add(1);
        self.stats.bytes_fed = self.stats.bytes_fed.saturating_add(bytes.len() as u64);
        self.input.push_bytes(bytes);
        self.run();
    }

    /// Mark end of input, flush partial tokens, and produce `Eof`.
    pub(crate) fn finish(&mut self) {
        self.input.finish();
        self.run();
        debug_assert!(self.eof_emitted, "finish must end with Eof");
    }

    /// Hand the queued tokens to the caller, oldest first.
    pub(crate) fn drain_tokens(&mut self) -> std::vec::Drain<'_, Token> {
        self.tokens.drain(..)
    }

    /// Take the whole queue at once, for callers that make more than one pass
    /// over it.
    pub(crate) fn take_tokens(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.tokens)
    }

    pub(crate) fn stats(&self) -> TokenizerStats {
        TokenizerStats {
            chars_consumed: self.input.position(),
            ..self.stats
        }
    }

    fn run(&mut self) {
        while self.step() == Step::Progress {}
        self.input.compact();
    }

    fn transition_to(&mut self, next: TokenizerState) {
        if self.state == next {
            return;
        }
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html5.tokenizer",
            "state {:?} -> {:?} @{}",
            self.state,
            next,
            self.input.position()
        );
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    fn step(&mut self) -> Step {
        if self.eof_emitted {
            return Step::NeedMoreInput;
        }
        if self.char_ref.is_some() {
            return self.step_char_ref();
        }
        if self.peek().is_none() {
            return if self.input.is_finished() {
                self.step_eof()
            } else {
                Step::NeedMoreInput
            };
        }
        match self.state {
            TokenizerState::Data => self.step_data(),
            TokenizerState::Plaintext => self.step_plaintext(),
            TokenizerState::RawData(kind) => self.step_raw_data(kind),
            TokenizerState::RawLessThanSign(kind) => self.step_raw_less_than_sign(kind),
            TokenizerState::RawEndTagOpen(kind) => self.step_raw_end_tag_open(kind),
            TokenizerState::RawEndTagName(kind) => self.step_raw_end_tag_name(kind),
            TokenizerState::ScriptDataEscapeStart(esc) => self.step_script_escape_start(esc),
            TokenizerState::ScriptDataEscapeStartDash => self.step_script_escape_start_dash(),
            TokenizerState::ScriptDataEscapedDash(esc) => self.step_script_escaped_dash(esc),
            TokenizerState::ScriptDataEscapedDashDash(esc) => {
                self.step_script_escaped_dash_dash(esc)
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => self.step_script_double_escape_end(),
            TokenizerState::TagOpen => self.step_tag_open(),
            TokenizerState::EndTagOpen => self.step_end_tag_open(),
            TokenizerState::TagName => self.step_tag_name(),
            TokenizerState::BeforeAttributeName => self.step_before_attribute_name(),
            TokenizerState::AttributeName => self.step_attribute_name(),
            TokenizerState::AfterAttributeName => self.step_after_attribute_name(),
            TokenizerState::BeforeAttributeValue => self.step_before_attribute_value(),
            TokenizerState::AttributeValue(kind) => self.step_attribute_value(kind),
            TokenizerState::AfterAttributeValueQuoted => self.step_after_attribute_value_quoted(),
            TokenizerState::SelfClosingStartTag => self.step_self_closing_start_tag(),
            TokenizerState::MarkupDeclarationOpen => self.step_markup_declaration_open(),
            TokenizerState::CommentStart
            | TokenizerState::CommentStartDash
            | TokenizerState::Comment
            | TokenizerState::CommentEndDash
            | TokenizerState::CommentEnd
            | TokenizerState::CommentEndBang
            | TokenizerState::BogusComment => self.step_comment(),
            TokenizerState::Doctype
            | TokenizerState::BeforeDoctypeName
            | TokenizerState::DoctypeName
            | TokenizerState::AfterDoctypeName
            | TokenizerState::AfterDoctypeKeyword(_)
            | TokenizerState::BeforeDoctypeIdentifier(_)
            | TokenizerState::DoctypeIdentifierDoubleQuoted(_)
            | TokenizerState::DoctypeIdentifierSingleQuoted(_)
            | TokenizerState::AfterDoctypeIdentifier(_)
            | TokenizerState::BetweenDoctypePublicAndSystemIdentifiers
            | TokenizerState::BogusDoctype => self.step_doctype(),
        }
    }

    fn step_data(&mut self) -> Step {
        let run = self.input.take_text_until(b'<', b'&', b'\0');
        if !run.is_empty() {
            self.pending_text.push_str(run);
            return Step::Progress;
        }
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match c {
            '&' => self.begin_char_ref(),
            '<' => self.transition_to(TokenizerState::TagOpen),
            '\0' => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_token(Token::NullCharacter);
            }
            c => self.emit_char(c),
        }
        Step::Progress
    }

    fn step_plaintext(&mut self) -> Step {
        let run = self.input.take_text_until(b'\0', b'\0', b'\0');
        if !run.is_empty() {
            self.pending_text.push_str(run);
            return Step::Progress;
        }
        if self.next_char() == Some('\0') {
            self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
            self.emit_char('\u{FFFD}');
        }
        Step::Progress
    }

    fn step_raw_data(&mut self, kind: RawKind) -> Step {
        let special = match kind {
            RawKind::Rcdata => b'&',
            RawKind::ScriptDataEscaped(_) => b'-',
            RawKind::Rawtext | RawKind::ScriptData => b'<',
        };
        let run = self.input.take_text_until(b'<', special, b'\0');
        if !run.is_empty() {
            self.pending_text.push_str(run);
            return Step::Progress;
        }
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match (c, kind) {
            ('&', RawKind::Rcdata) => self.begin_char_ref(),
            ('-', RawKind::ScriptDataEscaped(esc)) => {
                self.emit_char('-');
                self.transition_to(TokenizerState::ScriptDataEscapedDash(esc));
            }
            ('<', RawKind::ScriptDataEscaped(esc)) => self.script_escaped_less_than(esc),
            ('<', _) => self.transition_to(TokenizerState::RawLessThanSign(kind)),
            ('\0', _) => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            (c, _) => self.emit_char(c),
        }
        Step::Progress
    }

    fn step_raw_less_than_sign(&mut self, kind: RawKind) -> Step {
        let Some(c) = self.peek() else {
            return Step::NeedMoreInput;
        };
        const DOUBLE: RawKind = RawKind::ScriptDataEscaped(ScriptEscapeKind::DoubleEscaped);
        match (c, kind) {
            // The `<` was already emitted on entry in double escaped text.
            ('/', DOUBLE) => {
                self.consume(c);
                self.temp_buf.clear();
                self.emit_char('/');
                self.transition_to(TokenizerState::ScriptDataDoubleEscapeEnd);
            }
            (_, DOUBLE) => self.transition_to(TokenizerState::RawData(kind)),
            ('/', _) => {
                self.consume(c);
                self.temp_buf.clear();
                self.transition_to(TokenizerState::RawEndTagOpen(kind));
            }
            ('!', RawKind::ScriptData) => {
                self.consume(c);
                self.emit_str("<!");
                self.transition_to(TokenizerState::ScriptDataEscapeStart(
                    ScriptEscapeKind::Escaped,
                ));
            }
            (c, RawKind::ScriptDataEscaped(ScriptEscapeKind::Escaped))
                if c.is_ascii_alphabetic() =>
            {
                self.temp_buf.clear();
                self.emit_char('<');
                self.transition_to(TokenizerState::ScriptDataEscapeStart(
                    ScriptEscapeKind::DoubleEscaped,
                ));
            }
            _ => {
                self.emit_char('<');
                self.transition_to(TokenizerState::RawData(kind));
            }
        }
        Step::Progress
    }

    fn step_raw_end_tag_open(&mut self, kind: RawKind) -> Step {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                self.consume(c);
                self.create_tag(TagKind::End, c.to_ascii_lowercase());
                self.temp_buf.push(c);
                self.transition_to(TokenizerState::RawEndTagName(kind));
            }
            _ => {
                self.emit_str("</");
                self.transition_to(TokenizerState::RawData(kind));
            }
        }
        Step::Progress
    }

    fn step_raw_end_tag_name(&mut self, kind: RawKind) -> Step {
        let Some(c) = self.peek() else {
            return Step::NeedMoreInput;
        };
        if self.is_appropriate_end_tag() {
            let next = match c {
                c if is_tag_whitespace(c) => Some(TokenizerState::BeforeAttributeName),
                '/' => Some(TokenizerState::SelfClosingStartTag),
                _ => None,
            };
            if let Some(next) = next {
                self.consume(c);
                self.temp_buf.clear();
                self.transition_to(next);
                return Step::Progress;
            }
            if c == '>' {
                self.consume(c);
                self.temp_buf.clear();
                self.emit_current_tag();
                return Step::Progress;
            }
        }
        if c.is_ascii_alphabetic() {
            self.consume(c);
            self.current_tag.name.push(c.to_ascii_lowercase());
            self.temp_buf.push(c);
        } else {
            let mut literal = String::with_capacity(self.temp_buf.len() + 2);
            literal.push_str("</");
            literal.push_str(&mem::take(&mut self.temp_buf));
            self.emit_str(&literal);
            self.transition_to(TokenizerState::RawData(kind));
        }
        Step::Progress
    }

    fn step_tag_open(&mut self) -> Step {
        let Some(c) = self.peek() else {
            return Step::NeedMoreInput;
        };
        match c {
            '!' => {
                self.consume(c);
                self.transition_to(TokenizerState::MarkupDeclarationOpen);
            }
            '/' => {
                self.consume(c);
                self.transition_to(TokenizerState::EndTagOpen);
            }
            '?' => {
                self.parse_error(ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName);
                self.current_comment.clear();
                self.transition_to(TokenizerState::BogusComment);
            }
            c if c.is_ascii_alphabetic() => {
                self.consume(c);
                self.create_tag(TagKind::Start, c.to_ascii_lowercase());
                self.transition_to(TokenizerState::TagName);
            }
            _ => {
                self.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.emit_char('<');
                self.transition_to(TokenizerState::Data);
            }
        }
        Step::Progress
    }

    fn step_end_tag_open(&mut self) -> Step {
        let Some(c) = self.peek() else {
            return Step::NeedMoreInput;
        };
        match c {
            c if c.is_ascii_alphabetic() => {
                self.consume(c);
                self.create_tag(TagKind::End, c.to_ascii_lowercase());
                self.transition_to(TokenizerState::TagName);
            }
            '>' => {
                self.consume(c);
                self.parse_error(ParseErrorCode::MissingEndTagName);
                self.transition_to(TokenizerState::Data);
            }
            _ => {
                self.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.current_comment.clear();
                self.transition_to(TokenizerState::BogusComment);
            }
        }
        Step::Progress
    }

    fn step_tag_name(&mut self) -> Step {
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match c {
            c if is_tag_whitespace(c) => self.transition_to(TokenizerState::BeforeAttributeName),
            '/' => self.transition_to(TokenizerState::SelfClosingStartTag),
            '>' => self.emit_current_tag(),
            '\0' => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.current_tag.name.push('\u{FFFD}');
            }
            c => self.current_tag.name.push(c.to_ascii_lowercase()),
        }
        Step::Progress
    }

    fn step_before_attribute_name(&mut self) -> Step {
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match c {
            c if is_tag_whitespace(c) => {}
            '/' => self.transition_to(TokenizerState::SelfClosingStartTag),
            '>' => self.emit_current_tag(),
            c => self.start_attribute_with(c),
        }
        Step::Progress
    }

    fn step_attribute_name(&mut self) -> Step {
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match c {
            c if is_tag_whitespace(c) => self.transition_to(TokenizerState::AfterAttributeName),
            '/' => self.transition_to(TokenizerState::SelfClosingStartTag),
            '=' => self.transition_to(TokenizerState::BeforeAttributeValue),
            '>' => self.emit_current_tag(),
            '\0' => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.push_attr_name('\u{FFFD}');
            }
            '"' | '\'' | '<' => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterInAttributeName);
                self.push_attr_name(c);
            }
            c => self.push_attr_name(c.to_ascii_lowercase()),
        }
        Step::Progress
    }

    fn step_after_attribute_name(&mut self) -> Step {
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match c {
            c if is_tag_whitespace(c) => {}
            '/' => self.transition_to(TokenizerState::SelfClosingStartTag),
            '=' => self.transition_to(TokenizerState::BeforeAttributeValue),
            '>' => self.emit_current_tag(),
            c => self.start_attribute_with(c),
        }
        Step::Progress
    }

    /// Shared by the before/after attribute name states: `c` (already
    /// consumed) opens a new attribute.
    fn start_attribute_with(&mut self, c: char) {
        match c {
            '\0' => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.create_attribute('\u{FFFD}');
            }
            '=' => {
                self.parse_error(ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName);
                self.create_attribute(c);
            }
            '"' | '\'' | '<' => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterInAttributeName);
                self.create_attribute(c);
            }
            c => self.create_attribute(c.to_ascii_lowercase()),
        }
        self.transition_to(TokenizerState::AttributeName);
    }

    fn step_before_attribute_value(&mut self) -> Step {
        let Some(c) = self.peek() else {
            return Step::NeedMoreInput;
        };
        match c {
            c if is_tag_whitespace(c) => self.consume(c),
            '"' => {
                self.consume(c);
                self.transition_to(TokenizerState::AttributeValue(AttrValueKind::DoubleQuoted));
            }
            '\'' => {
                self.consume(c);
                self.transition_to(TokenizerState::AttributeValue(AttrValueKind::SingleQuoted));
            }
            '>' => {
                self.consume(c);
                self.parse_error(ParseErrorCode::MissingAttributeValue);
                self.emit_current_tag();
            }
            _ => self.transition_to(TokenizerState::AttributeValue(AttrValueKind::Unquoted)),
        }
        Step::Progress
    }

    fn step_attribute_value(&mut self, kind: AttrValueKind) -> Step {
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match (kind, c) {
            (AttrValueKind::DoubleQuoted, '"') | (AttrValueKind::SingleQuoted, '\'') => {
                self.transition_to(TokenizerState::AfterAttributeValueQuoted)
            }
            (AttrValueKind::Unquoted, c) if is_tag_whitespace(c) => {
                self.transition_to(TokenizerState::BeforeAttributeName)
            }
            (AttrValueKind::Unquoted, '>') => self.emit_current_tag(),
            (_, '&') => self.begin_char_ref(),
            (_, '\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.push_attr_value('\u{FFFD}');
            }
            (AttrValueKind::Unquoted, '"' | '\'' | '<' | '=' | '`') => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue);
                self.push_attr_value(c);
            }
            (_, c) => self.push_attr_value(c),
        }
        Step::Progress
    }

    fn step_after_attribute_value_quoted(&mut self) -> Step {
        let Some(c) = self.peek() else {
            return Step::NeedMoreInput;
        };
        match c {
            c if is_tag_whitespace(c) => {
                self.consume(c);
                self.transition_to(TokenizerState::BeforeAttributeName);
            }
            '/' => {
                self.consume(c);
                self.transition_to(TokenizerState::SelfClosingStartTag);
            }
            '>' => {
                self.consume(c);
                self.emit_current_tag();
            }
            _ => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBetweenAttributes);
                self.transition_to(TokenizerState::BeforeAttributeName);
            }
        }
        Step::Progress
    }

    fn step_self_closing_start_tag(&mut self) -> Step {
        if self.peek() == Some('>') {
            self.consume('>');
            self.current_tag.self_closing = true;
            self.emit_current_tag();
        } else {
            self.parse_error(ParseErrorCode::UnexpectedSolidusInTag);
            self.transition_to(TokenizerState::BeforeAttributeName);
        }
        Step::Progress
    }

    /// Input is exhausted and no more will arrive.
    fn step_eof(&mut self) -> Step {
        match self.state {
            TokenizerState::RawData(RawKind::ScriptDataEscaped(_))
            | TokenizerState::ScriptDataEscapedDash(_)
            | TokenizerState::ScriptDataEscapedDashDash(_) => {
                self.parse_error(ParseErrorCode::EofInScriptHtmlCommentLikeText);
                self.emit_token(Token::Eof);
                self.eof_emitted = true;
                return Step::NeedMoreInput;
            }
            TokenizerState::Data | TokenizerState::Plaintext | TokenizerState::RawData(_) => {
                self.emit_token(Token::Eof);
                self.eof_emitted = true;
                return Step::NeedMoreInput;
            }
            TokenizerState::RawLessThanSign(
                kind @ RawKind::ScriptDataEscaped(ScriptEscapeKind::DoubleEscaped),
            ) => self.transition_to(TokenizerState::RawData(kind)),
            TokenizerState::ScriptDataEscapeStart(ScriptEscapeKind::Escaped)
            | TokenizerState::ScriptDataEscapeStartDash => {
                self.transition_to(TokenizerState::RawData(RawKind::ScriptData));
            }
            TokenizerState::ScriptDataEscapeStart(ScriptEscapeKind::DoubleEscaped) => self
                .transition_to(TokenizerState::RawData(RawKind::ScriptDataEscaped(
                    ScriptEscapeKind::Escaped,
                ))),
            TokenizerState::ScriptDataDoubleEscapeEnd => self.transition_to(
                TokenizerState::RawData(RawKind::ScriptDataEscaped(
                    ScriptEscapeKind::DoubleEscaped,
                )),
            ),
            TokenizerState::RawLessThanSign(kind) => {
                self.emit_char('<');
                self.transition_to(TokenizerState::RawData(kind));
            }
            TokenizerState::RawEndTagOpen(kind) => {
                self.emit_str("</");
                self.transition_to(TokenizerState::RawData(kind));
            }
            TokenizerState::RawEndTagName(kind) => {
                let mut literal = String::from("</");
                literal.push_str(&mem::take(&mut self.temp_buf));
                self.emit_str(&literal);
                self.transition_to(TokenizerState::RawData(kind));
            }
            TokenizerState::TagOpen => {
                self.parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_char('<');
                self.transition_to(TokenizerState::Data);
            }
            TokenizerState::EndTagOpen => {
                self.parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_str("</");
                self.transition_to(TokenizerState::Data);
            }
            TokenizerState::TagName
            | TokenizerState::BeforeAttributeName
            | TokenizerState::AttributeName
            | TokenizerState::AfterAttributeName
            | TokenizerState::BeforeAttributeValue
            | TokenizerState::AttributeValue(_)
            | TokenizerState::AfterAttributeValueQuoted
            | TokenizerState::SelfClosingStartTag => {
                self.parse_error(ParseErrorCode::EofInTag);
                self.current_attr = None;
                self.transition_to(TokenizerState::Data);
            }
            _ => self.eof_in_declaration(),
        }
        Step::Progress
    }

    fn begin_char_ref(&mut self) {
        self.char_ref = Some(CharRef::new(self.state));
    }

    fn is_appropriate_end_tag(&self) -> bool {
        self.last_start_tag_name.as_deref() == Some(self.current_tag.name.as_str())
    }
}

fn is_tag_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | ' ')
}

#[cfg(test)]
mod tests;
