//! Token emission helpers and partial-token builders.

use std::mem;

use super::Engine;
use super::error::{ParseError, ParseErrorCode};
use super::states::{DoctypeIdKind, TokenizerState};
use super::token::{Attribute, Tag, TagKind, Token};

impl Engine {
    /// Queue a non-character token, flushing any held character run first.
    pub(super) fn emit_token(&mut self, token: Token) {
        self.flush_pending_text();
        self.push_token(token);
    }

    pub(super) fn emit_char(&mut self, c: char) {
        self.pending_text.push(c);
    }

    pub(super) fn emit_str(&mut self, text: &str) {
        self.pending_text.push_str(text);
    }

    pub(super) fn parse_error(&mut self, code: ParseErrorCode) {
        let error = ParseError {
            code,
            position: self.input.position(),
        };
        let message = if self.config.exact_errors {
            error.describe_in(self.state)
        } else {
            error.to_string()
        };
        self.stats.parse_errors = self.stats.parse_errors.saturating_add(1);
        self.emit_token(Token::ParseError(message));
    }

    fn flush_pending_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = mem::take(&mut self.pending_text);
        self.push_token(Token::Characters(text));
    }

    fn push_token(&mut self, token: Token) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html5.tokenizer", "emit token: {token:?}");
        self.tokens.push(token);
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
    }

    pub(super) fn create_tag(&mut self, kind: TagKind, first: char) {
        self.current_tag = Tag::new(kind);
        self.current_tag.name.push(first);
        self.current_attr = None;
    }

    pub(super) fn create_attribute(&mut self, first: char) {
        self.finish_attribute();
        self.current_attr = Some(Attribute {
            name: first.to_string(),
            value: String::new(),
        });
    }

    pub(super) fn push_attr_name(&mut self, c: char) {
        if let Some(attr) = self.current_attr.as_mut() {
            attr.name.push(c);
        }
    }

    pub(super) fn push_attr_value(&mut self, c: char) {
        if let Some(attr) = self.current_attr.as_mut() {
            attr.value.push(c);
        }
    }

    pub(super) fn push_attr_value_str(&mut self, text: &str) {
        if let Some(attr) = self.current_attr.as_mut() {
            attr.value.push_str(text);
        }
    }

    /// Move the attribute under construction onto the tag. The first of two
    /// same-named attributes wins.
    fn finish_attribute(&mut self) {
        let Some(attr) = self.current_attr.take() else {
            return;
        };
        if self.current_tag.attrs.iter().any(|a| a.name == attr.name) {
            self.parse_error(ParseErrorCode::DuplicateAttribute);
        } else {
            self.current_tag.attrs.push(attr);
        }
    }

    pub(super) fn emit_current_tag(&mut self) {
        self.finish_attribute();
        let tag = mem::replace(&mut self.current_tag, Tag::new(TagKind::Start));
        match tag.kind {
            TagKind::Start => self.last_start_tag_name = Some(tag.name.clone()),
            TagKind::End => {
                if !tag.attrs.is_empty() {
                    self.parse_error(ParseErrorCode::EndTagWithAttributes);
                }
                if tag.self_closing {
                    self.parse_error(ParseErrorCode::EndTagWithTrailingSolidus);
                }
            }
        }
        self.emit_token(Token::Tag(tag));
        self.transition_to(TokenizerState::Data);
    }

    pub(super) fn emit_current_comment(&mut self) {
        let text = mem::take(&mut self.current_comment);
        self.emit_token(Token::Comment(text));
        self.transition_to(TokenizerState::Data);
    }

    pub(super) fn push_doctype_name(&mut self, c: char) {
        self.current_doctype
            .name
            .get_or_insert_with(String::new)
            .push(c);
    }

    fn doctype_id_mut(&mut self, kind: DoctypeIdKind) -> &mut Option<String> {
        match kind {
            DoctypeIdKind::Public => &mut self.current_doctype.public_id,
            DoctypeIdKind::System => &mut self.current_doctype.system_id,
        }
    }

    /// An identifier opened by a quote is present, even if it stays empty.
    pub(super) fn clear_doctype_id(&mut self, kind: DoctypeIdKind) {
        *self.doctype_id_mut(kind) = Some(String::new());
    }

    pub(super) fn push_doctype_id(&mut self, kind: DoctypeIdKind, c: char) {
        self.doctype_id_mut(kind)
            .get_or_insert_with(String::new)
            .push(c);
    }

    pub(super) fn emit_current_doctype(&mut self) {
        let doctype = mem::take(&mut self.current_doctype);
        self.emit_token(Token::Doctype(doctype));
        self.transition_to(TokenizerState::Data);
    }
}
