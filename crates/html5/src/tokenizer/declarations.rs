//! Markup declarations: comments, bogus comments and doctypes.

use super::error::ParseErrorCode;
use super::input::MatchResult;
use super::states::{DoctypeIdKind, TokenizerState};
use super::{Engine, Step, is_tag_whitespace};

impl Engine {
    pub(super) fn step_markup_declaration_open(&mut self) -> Step {
        match self.input.match_ascii("--", false) {
            MatchResult::Matched => {
                self.skip_ascii(2);
                self.current_comment.clear();
                self.transition_to(TokenizerState::CommentStart);
                return Step::Progress;
            }
            MatchResult::NeedMoreInput => return Step::NeedMoreInput,
            MatchResult::NoMatch => {}
        }
        match self.input.match_ascii("doctype", true) {
            MatchResult::Matched => {
                self.skip_ascii(7);
                self.transition_to(TokenizerState::Doctype);
                return Step::Progress;
            }
            MatchResult::NeedMoreInput => return Step::NeedMoreInput,
            MatchResult::NoMatch => {}
        }
        match self.input.match_ascii("[CDATA[", false) {
            MatchResult::Matched => {
                // No foreign content without a tree builder: the section is
                // kept as a bogus comment, opener included.
                self.parse_error(ParseErrorCode::CdataInHtmlContent);
                self.current_comment.clear();
                let opener = self.input.skip_ascii(7);
                self.current_comment.push_str(opener);
                self.transition_to(TokenizerState::BogusComment);
                return Step::Progress;
            }
            MatchResult::NeedMoreInput => return Step::NeedMoreInput,
            MatchResult::NoMatch => {}
        }
        self.parse_error(ParseErrorCode::IncorrectlyOpenedComment);
        self.current_comment.clear();
        self.transition_to(TokenizerState::BogusComment);
        Step::Progress
    }

    pub(super) fn step_comment(&mut self) -> Step {
        if self.state == TokenizerState::Comment {
            let run = self.input.take_text_until(b'-', b'\0', b'\0');
            if !run.is_empty() {
                self.current_comment.push_str(run);
                return Step::Progress;
            }
        }
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match (self.state, c) {
            (TokenizerState::BogusComment, '>') => self.emit_current_comment(),
            (TokenizerState::BogusComment, '\0') => self.comment_null(""),
            (TokenizerState::BogusComment, c) => self.current_comment.push(c),

            (TokenizerState::CommentStart, '-') => {
                self.transition_to(TokenizerState::CommentStartDash)
            }
            (TokenizerState::CommentStart | TokenizerState::CommentStartDash, '>') => {
                self.parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.emit_current_comment();
            }
            (TokenizerState::CommentStartDash, '-') => {
                self.transition_to(TokenizerState::CommentEnd)
            }

            (TokenizerState::Comment, '-') => self.transition_to(TokenizerState::CommentEndDash),
            (TokenizerState::CommentEndDash, '-') => {
                self.transition_to(TokenizerState::CommentEnd)
            }

            (TokenizerState::CommentEnd, '>') => self.emit_current_comment(),
            (TokenizerState::CommentEnd, '!') => {
                self.transition_to(TokenizerState::CommentEndBang)
            }
            (TokenizerState::CommentEnd, '-') => self.current_comment.push('-'),

            (TokenizerState::CommentEndBang, '-') => {
                self.current_comment.push_str("--!");
                self.transition_to(TokenizerState::CommentEndDash);
            }
            (TokenizerState::CommentEndBang, '>') => {
                self.parse_error(ParseErrorCode::IncorrectlyClosedComment);
                self.emit_current_comment();
            }

            (state, '\0') => self.comment_null(unclosed_dashes(state)),
            (state, c) => {
                self.current_comment.push_str(unclosed_dashes(state));
                self.current_comment.push(c);
                self.transition_to(TokenizerState::Comment);
            }
        }
        Step::Progress
    }

    fn comment_null(&mut self, prefix: &str) {
        self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
        self.current_comment.push_str(prefix);
        self.current_comment.push('\u{FFFD}');
        if self.state != TokenizerState::BogusComment {
            self.transition_to(TokenizerState::Comment);
        }
    }

    pub(super) fn step_doctype(&mut self) -> Step {
        if self.state == TokenizerState::AfterDoctypeName {
            return self.step_after_doctype_name();
        }
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match self.state {
            TokenizerState::Doctype => {
                self.transition_to(TokenizerState::BeforeDoctypeName);
                if !is_tag_whitespace(c) {
                    if c != '>' {
                        self.parse_error(ParseErrorCode::MissingWhitespaceBeforeDoctypeName);
                    }
                    self.before_doctype_name(c);
                }
            }
            TokenizerState::BeforeDoctypeName => self.before_doctype_name(c),
            TokenizerState::DoctypeName => match c {
                c if is_tag_whitespace(c) => self.transition_to(TokenizerState::AfterDoctypeName),
                '>' => self.emit_current_doctype(),
                '\0' => {
                    self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                    self.push_doctype_name('\u{FFFD}');
                }
                c => self.push_doctype_name(c.to_ascii_lowercase()),
            },
            TokenizerState::AfterDoctypeKeyword(kind) => match c {
                c if is_tag_whitespace(c) => {
                    self.transition_to(TokenizerState::BeforeDoctypeIdentifier(kind))
                }
                '"' | '\'' => {
                    self.parse_error(match kind {
                        DoctypeIdKind::Public => {
                            ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword
                        }
                        DoctypeIdKind::System => {
                            ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword
                        }
                    });
                    self.open_doctype_id(kind, c);
                }
                '>' => self.missing_doctype_id(kind),
                _ => self.bogus_doctype_after(missing_quote_error(kind)),
            },
            TokenizerState::BeforeDoctypeIdentifier(kind) => match c {
                c if is_tag_whitespace(c) => {}
                '"' | '\'' => self.open_doctype_id(kind, c),
                '>' => self.missing_doctype_id(kind),
                _ => self.bogus_doctype_after(missing_quote_error(kind)),
            },
            TokenizerState::DoctypeIdentifierDoubleQuoted(kind)
            | TokenizerState::DoctypeIdentifierSingleQuoted(kind) => {
                let close = match self.state {
                    TokenizerState::DoctypeIdentifierDoubleQuoted(_) => '"',
                    _ => '\'',
                };
                match c {
                    c if c == close => {
                        self.transition_to(TokenizerState::AfterDoctypeIdentifier(kind))
                    }
                    '\0' => {
                        self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                        self.push_doctype_id(kind, '\u{FFFD}');
                    }
                    '>' => {
                        self.parse_error(match kind {
                            DoctypeIdKind::Public => ParseErrorCode::AbruptDoctypePublicIdentifier,
                            DoctypeIdKind::System => ParseErrorCode::AbruptDoctypeSystemIdentifier,
                        });
                        self.current_doctype.force_quirks = true;
                        self.emit_current_doctype();
                    }
                    c => self.push_doctype_id(kind, c),
                }
            }
            TokenizerState::AfterDoctypeIdentifier(DoctypeIdKind::Public) => match c {
                c if is_tag_whitespace(c) => {
                    self.transition_to(TokenizerState::BetweenDoctypePublicAndSystemIdentifiers)
                }
                '>' => self.emit_current_doctype(),
                '"' | '\'' => {
                    self.parse_error(
                        ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                    );
                    self.open_doctype_id(DoctypeIdKind::System, c);
                }
                _ => self.bogus_doctype_after(missing_quote_error(DoctypeIdKind::System)),
            },
            TokenizerState::AfterDoctypeIdentifier(DoctypeIdKind::System) => match c {
                c if is_tag_whitespace(c) => {}
                '>' => self.emit_current_doctype(),
                _ => {
                    // Unlike the other doctype errors this one does not force
                    // quirks mode.
                    self.parse_error(ParseErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                    self.transition_to(TokenizerState::BogusDoctype);
                }
            },
            TokenizerState::BetweenDoctypePublicAndSystemIdentifiers => match c {
                c if is_tag_whitespace(c) => {}
                '>' => self.emit_current_doctype(),
                '"' | '\'' => self.open_doctype_id(DoctypeIdKind::System, c),
                _ => self.bogus_doctype_after(missing_quote_error(DoctypeIdKind::System)),
            },
            TokenizerState::BogusDoctype => match c {
                '>' => self.emit_current_doctype(),
                '\0' => self.parse_error(ParseErrorCode::UnexpectedNullCharacter),
                _ => {}
            },
            state => unreachable!("step_doctype called in {state:?}"),
        }
        Step::Progress
    }

    fn before_doctype_name(&mut self, c: char) {
        match c {
            c if is_tag_whitespace(c) => {}
            '>' => {
                self.parse_error(ParseErrorCode::MissingDoctypeName);
                self.current_doctype = Default::default();
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
            }
            '\0' => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.current_doctype = Default::default();
                self.push_doctype_name('\u{FFFD}');
                self.transition_to(TokenizerState::DoctypeName);
            }
            c => {
                self.current_doctype = Default::default();
                self.push_doctype_name(c.to_ascii_lowercase());
                self.transition_to(TokenizerState::DoctypeName);
            }
        }
    }

    fn step_after_doctype_name(&mut self) -> Step {
        let Some(c) = self.peek() else {
            return Step::NeedMoreInput;
        };
        if is_tag_whitespace(c) {
            self.consume(c);
            return Step::Progress;
        }
        if c == '>' {
            self.consume(c);
            self.emit_current_doctype();
            return Step::Progress;
        }
        for (keyword, kind) in [
            ("public", DoctypeIdKind::Public),
            ("system", DoctypeIdKind::System),
        ] {
            match self.input.match_ascii(keyword, true) {
                MatchResult::Matched => {
                    self.skip_ascii(keyword.len());
                    self.transition_to(TokenizerState::AfterDoctypeKeyword(kind));
                    return Step::Progress;
                }
                MatchResult::NeedMoreInput => return Step::NeedMoreInput,
                MatchResult::NoMatch => {}
            }
        }
        self.parse_error(ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName);
        self.current_doctype.force_quirks = true;
        self.transition_to(TokenizerState::BogusDoctype);
        Step::Progress
    }

    fn open_doctype_id(&mut self, kind: DoctypeIdKind, quote: char) {
        self.clear_doctype_id(kind);
        self.transition_to(if quote == '"' {
            TokenizerState::DoctypeIdentifierDoubleQuoted(kind)
        } else {
            TokenizerState::DoctypeIdentifierSingleQuoted(kind)
        });
    }

    fn missing_doctype_id(&mut self, kind: DoctypeIdKind) {
        self.parse_error(match kind {
            DoctypeIdKind::Public => ParseErrorCode::MissingDoctypePublicIdentifier,
            DoctypeIdKind::System => ParseErrorCode::MissingDoctypeSystemIdentifier,
        });
        self.current_doctype.force_quirks = true;
        self.emit_current_doctype();
    }

    /// The offending character is already consumed. Callers handle `>`
    /// themselves, so it never reaches here.
    fn bogus_doctype_after(&mut self, code: ParseErrorCode) {
        self.parse_error(code);
        self.current_doctype.force_quirks = true;
        self.transition_to(TokenizerState::BogusDoctype);
    }

    /// End of input inside a markup declaration.
    pub(super) fn eof_in_declaration(&mut self) {
        match self.state {
            TokenizerState::MarkupDeclarationOpen => {
                self.parse_error(ParseErrorCode::IncorrectlyOpenedComment);
                self.current_comment.clear();
                self.transition_to(TokenizerState::BogusComment);
            }
            TokenizerState::BogusComment => self.emit_current_comment(),
            TokenizerState::CommentStart
            | TokenizerState::CommentStartDash
            | TokenizerState::Comment
            | TokenizerState::CommentEndDash
            | TokenizerState::CommentEnd
            | TokenizerState::CommentEndBang => {
                self.parse_error(ParseErrorCode::EofInComment);
                self.emit_current_comment();
            }
            TokenizerState::Doctype | TokenizerState::BeforeDoctypeName => {
                self.parse_error(ParseErrorCode::EofInDoctype);
                self.current_doctype = Default::default();
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
            }
            TokenizerState::BogusDoctype => self.emit_current_doctype(),
            _ => {
                self.parse_error(ParseErrorCode::EofInDoctype);
                self.current_doctype.force_quirks = true;
                self.emit_current_doctype();
            }
        }
    }
}

/// Dashes a comment state has seen but not yet committed to the text.
fn unclosed_dashes(state: TokenizerState) -> &'static str {
    match state {
        TokenizerState::CommentStartDash | TokenizerState::CommentEndDash => "-",
        TokenizerState::CommentEnd => "--",
        TokenizerState::CommentEndBang => "--!",
        _ => "",
    }
}

fn missing_quote_error(kind: DoctypeIdKind) -> ParseErrorCode {
    match kind {
        DoctypeIdKind::Public => ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier,
        DoctypeIdKind::System => ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier,
    }
}
