//! Script data escape states: text inside `<!-- ... -->` within a script,
//! where a nested `<script>` switches to double escaped text until its
//! matching `</script>`.
//!
//! Escaped text is a raw kind ([`RawKind::ScriptDataEscaped`]), so the shared
//! raw data and end tag states cover it; only the dash runs and the escape
//! boundaries live here.

use super::error::ParseErrorCode;
use super::states::{RawKind, ScriptEscapeKind, TokenizerState};
use super::{Engine, Step, is_tag_whitespace};

fn escaped(esc: ScriptEscapeKind) -> TokenizerState {
    TokenizerState::RawData(RawKind::ScriptDataEscaped(esc))
}

impl Engine {
    pub(super) fn step_script_escape_start(&mut self, esc: ScriptEscapeKind) -> Step {
        match esc {
            ScriptEscapeKind::Escaped => self.script_escape_dash(
                TokenizerState::ScriptDataEscapeStartDash,
                TokenizerState::RawData(RawKind::ScriptData),
            ),
            ScriptEscapeKind::DoubleEscaped => self
                .script_double_escape_boundary(
                    ScriptEscapeKind::DoubleEscaped,
                    ScriptEscapeKind::Escaped,
                ),
        }
    }

    pub(super) fn step_script_escape_start_dash(&mut self) -> Step {
        self.script_escape_dash(
            TokenizerState::ScriptDataEscapedDashDash(ScriptEscapeKind::Escaped),
            TokenizerState::RawData(RawKind::ScriptData),
        )
    }

    /// `-` is emitted and moves to `on_dash`; anything else is reconsumed in
    /// `otherwise`.
    fn script_escape_dash(&mut self, on_dash: TokenizerState, otherwise: TokenizerState) -> Step {
        if self.peek() == Some('-') {
            self.consume('-');
            self.emit_char('-');
            self.transition_to(on_dash);
        } else {
            self.transition_to(otherwise);
        }
        Step::Progress
    }

    pub(super) fn step_script_escaped_dash(&mut self, esc: ScriptEscapeKind) -> Step {
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match c {
            '-' => {
                self.emit_char('-');
                self.transition_to(TokenizerState::ScriptDataEscapedDashDash(esc));
            }
            c => self.script_escaped_char(esc, c),
        }
        Step::Progress
    }

    pub(super) fn step_script_escaped_dash_dash(&mut self, esc: ScriptEscapeKind) -> Step {
        let Some(c) = self.next_char() else {
            return Step::NeedMoreInput;
        };
        match c {
            '-' => self.emit_char('-'),
            '>' => {
                self.emit_char('>');
                self.transition_to(TokenizerState::RawData(RawKind::ScriptData));
            }
            c => self.script_escaped_char(esc, c),
        }
        Step::Progress
    }

    /// A non-dash character after one or more dashes in escaped text.
    fn script_escaped_char(&mut self, esc: ScriptEscapeKind, c: char) {
        match c {
            '<' => self.script_escaped_less_than(esc),
            '\0' => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
                self.transition_to(escaped(esc));
            }
            c => {
                self.emit_char(c);
                self.transition_to(escaped(esc));
            }
        }
    }

    /// A consumed `<` in escaped text. Double escaped text keeps it as text
    /// right away, since only `</script` can end it.
    pub(super) fn script_escaped_less_than(&mut self, esc: ScriptEscapeKind) {
        if esc == ScriptEscapeKind::DoubleEscaped {
            self.emit_char('<');
        }
        self.transition_to(TokenizerState::RawLessThanSign(RawKind::ScriptDataEscaped(
            esc,
        )));
    }

    pub(super) fn step_script_double_escape_end(&mut self) -> Step {
        self.script_double_escape_boundary(
            ScriptEscapeKind::Escaped,
            ScriptEscapeKind::DoubleEscaped,
        )
    }

    /// Collects a tag name after `<` or `</` into the temporary buffer. If the
    /// name turns out to be `script`, text continues as `on_script`; otherwise
    /// (or on any non-letter) as `otherwise`. All characters stay text.
    fn script_double_escape_boundary(
        &mut self,
        on_script: ScriptEscapeKind,
        otherwise: ScriptEscapeKind,
    ) -> Step {
        let Some(c) = self.peek() else {
            return Step::NeedMoreInput;
        };
        if is_tag_whitespace(c) || c == '/' || c == '>' {
            self.consume(c);
            let next = if self.temp_buf == "script" {
                on_script
            } else {
                otherwise
            };
            self.emit_char(c);
            self.transition_to(escaped(next));
        } else if c.is_ascii_alphabetic() {
            self.consume(c);
            self.temp_buf.push(c.to_ascii_lowercase());
            self.emit_char(c);
        } else {
            self.transition_to(escaped(otherwise));
        }
        Step::Progress
    }
}
