//! Character reference sub-machine.
//!
//! Entered on `&` in states that allow references. While active it takes
//! priority over the main state, consumes input one character at a time and
//! finally appends its expansion (or the literal text) to wherever the
//! surrounding state was writing: the pending character run or the current
//! attribute value. The terminating character is never consumed.

use super::{Engine, Step};
use super::error::ParseErrorCode;
use super::states::TokenizerState;
use crate::entities;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Just after `&`.
    Begin,
    /// After `&#`.
    Numeric,
    Digits { hex: bool },
    Named,
}

#[derive(Debug)]
pub(crate) struct CharRef {
    phase: Phase,
    in_attribute: bool,
    /// Everything consumed after the `&`.
    raw: String,
    value: u32,
    digits: usize,
}

impl CharRef {
    pub(crate) fn new(state: TokenizerState) -> Self {
        Self {
            phase: Phase::Begin,
            in_attribute: state.is_attribute_value(),
            raw: String::new(),
            value: 0,
            digits: 0,
        }
    }
}

const UNICODE_LIMIT: u32 = 0x11_0000;

impl Engine {
    pub(super) fn step_char_ref(&mut self) -> Step {
        let c = self.peek();
        if c.is_none() && !self.input.is_finished() {
            return Step::NeedMoreInput;
        }
        let Some(mut cr) = self.char_ref.take() else {
            return Step::Progress;
        };
        match cr.phase {
            Phase::Begin => match c {
                Some(c) if c.is_ascii_alphanumeric() => {
                    cr.phase = Phase::Named;
                    self.char_ref = Some(cr);
                }
                Some('#') => {
                    self.consume('#');
                    cr.raw.push('#');
                    cr.phase = Phase::Numeric;
                    self.char_ref = Some(cr);
                }
                _ => self.finish_char_ref(&cr, "&"),
            },
            Phase::Numeric => {
                let hex = matches!(c, Some('x' | 'X'));
                if let Some(x) = c.filter(|_| hex) {
                    self.consume(x);
                    cr.raw.push(x);
                }
                cr.phase = Phase::Digits { hex };
                self.char_ref = Some(cr);
            }
            Phase::Digits { hex } => {
                let radix = if hex { 16 } else { 10 };
                match c {
                    Some(d) if d.is_digit(radix) => {
                        self.consume(d);
                        cr.raw.push(d);
                        let digit = d.to_digit(radix).unwrap_or(0);
                        cr.value = cr
                            .value
                            .saturating_mul(radix)
                            .saturating_add(digit)
                            .min(UNICODE_LIMIT);
                        cr.digits += 1;
                        self.char_ref = Some(cr);
                    }
                    _ if cr.digits == 0 => {
                        self.parse_error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
                        let literal = format!("&{}", cr.raw);
                        self.finish_char_ref(&cr, &literal);
                    }
                    Some(';') => {
                        self.consume(';');
                        let decoded = self.numeric_reference(cr.value);
                        self.finish_char_ref(&cr, decoded.encode_utf8(&mut [0; 4]));
                    }
                    _ => {
                        self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                        let decoded = self.numeric_reference(cr.value);
                        self.finish_char_ref(&cr, decoded.encode_utf8(&mut [0; 4]));
                    }
                }
            }
            Phase::Named => match c {
                Some(a) if a.is_ascii_alphanumeric() && cr.raw.len() < entities::MAX_NAME_LEN => {
                    self.consume(a);
                    cr.raw.push(a);
                    self.char_ref = Some(cr);
                }
                Some(';') if cr.raw.len() < entities::MAX_NAME_LEN => {
                    self.consume(';');
                    cr.raw.push(';');
                    self.resolve_named(cr, None);
                }
                next => self.resolve_named(cr, next),
            },
        }
        Step::Progress
    }

    /// `next` is the first unconsumed character after `raw`, if any.
    fn resolve_named(&mut self, cr: CharRef, next: Option<char>) {
        match entities::longest_prefix_match(&cr.raw) {
            Some((len, expansion)) => {
                let (matched, rest) = cr.raw.split_at(len);
                if !matched.ends_with(';') {
                    let following = rest.chars().next().or(next);
                    // Legacy references inside attribute values stay literal
                    // when followed by `=` or an alphanumeric.
                    if cr.in_attribute
                        && following.is_some_and(|f| f == '=' || f.is_ascii_alphanumeric())
                    {
                        let literal = format!("&{}", cr.raw);
                        self.finish_char_ref(&cr, &literal);
                        return;
                    }
                    self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                }
                let text = format!("{expansion}{rest}");
                self.finish_char_ref(&cr, &text);
            }
            None => {
                if cr.raw.ends_with(';') {
                    self.parse_error(ParseErrorCode::UnknownNamedCharacterReference);
                }
                let literal = format!("&{}", cr.raw);
                self.finish_char_ref(&cr, &literal);
            }
        }
    }

    fn finish_char_ref(&mut self, cr: &CharRef, text: &str) {
        self.char_ref = None;
        if cr.in_attribute {
            self.push_attr_value_str(text);
        } else {
            self.emit_str(text);
        }
    }

    fn numeric_reference(&mut self, value: u32) -> char {
        match value {
            0 => {
                self.parse_error(ParseErrorCode::NullCharacterReference);
                '\u{FFFD}'
            }
            v if v >= UNICODE_LIMIT => {
                self.parse_error(ParseErrorCode::CharacterReferenceOutsideUnicodeRange);
                '\u{FFFD}'
            }
            0xD800..=0xDFFF => {
                self.parse_error(ParseErrorCode::SurrogateCharacterReference);
                '\u{FFFD}'
            }
            v if is_noncharacter(v) => {
                self.parse_error(ParseErrorCode::NoncharacterCharacterReference);
                char::from_u32(v).unwrap_or('\u{FFFD}')
            }
            v if is_control_reference(v) => {
                self.parse_error(ParseErrorCode::ControlCharacterReference);
                c1_replacement(v)
                    .or_else(|| char::from_u32(v))
                    .unwrap_or('\u{FFFD}')
            }
            v => char::from_u32(v).unwrap_or('\u{FFFD}'),
        }
    }
}

fn is_noncharacter(v: u32) -> bool {
    matches!(v, 0xFDD0..=0xFDEF) || (v & 0xFFFE) == 0xFFFE
}

fn is_control_reference(v: u32) -> bool {
    matches!(v, 0x01..=0x08 | 0x0B | 0x0D..=0x1F | 0x7F..=0x9F)
}

/// Windows-1252 interpretation of C1 code points referenced numerically.
fn c1_replacement(v: u32) -> Option<char> {
    let c = match v {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(c)
}
