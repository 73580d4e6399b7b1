//! Recoverable tokenization errors.
//!
//! These never reach the caller as `Err`: each one is rendered to text and
//! delivered through the sink's `error` callback, and tokenization carries on.
//! Messages are the WHATWG parse error codes.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseErrorCode {
    #[error("unexpected-null-character")]
    UnexpectedNullCharacter,
    #[error("unexpected-question-mark-instead-of-tag-name")]
    UnexpectedQuestionMarkInsteadOfTagName,
    #[error("invalid-first-character-of-tag-name")]
    InvalidFirstCharacterOfTagName,
    #[error("missing-end-tag-name")]
    MissingEndTagName,
    #[error("eof-before-tag-name")]
    EofBeforeTagName,
    #[error("eof-in-tag")]
    EofInTag,
    #[error("eof-in-script-html-comment-like-text")]
    EofInScriptHtmlCommentLikeText,
    #[error("unexpected-equals-sign-before-attribute-name")]
    UnexpectedEqualsSignBeforeAttributeName,
    #[error("unexpected-character-in-attribute-name")]
    UnexpectedCharacterInAttributeName,
    #[error("missing-attribute-value")]
    MissingAttributeValue,
    #[error("unexpected-character-in-unquoted-attribute-value")]
    UnexpectedCharacterInUnquotedAttributeValue,
    #[error("missing-whitespace-between-attributes")]
    MissingWhitespaceBetweenAttributes,
    #[error("unexpected-solidus-in-tag")]
    UnexpectedSolidusInTag,
    #[error("duplicate-attribute")]
    DuplicateAttribute,
    #[error("end-tag-with-attributes")]
    EndTagWithAttributes,
    #[error("end-tag-with-trailing-solidus")]
    EndTagWithTrailingSolidus,
    #[error("incorrectly-opened-comment")]
    IncorrectlyOpenedComment,
    #[error("cdata-in-html-content")]
    CdataInHtmlContent,
    #[error("abrupt-closing-of-empty-comment")]
    AbruptClosingOfEmptyComment,
    #[error("incorrectly-closed-comment")]
    IncorrectlyClosedComment,
    #[error("eof-in-comment")]
    EofInComment,
    #[error("eof-in-doctype")]
    EofInDoctype,
    #[error("missing-whitespace-before-doctype-name")]
    MissingWhitespaceBeforeDoctypeName,
    #[error("missing-doctype-name")]
    MissingDoctypeName,
    #[error("invalid-character-sequence-after-doctype-name")]
    InvalidCharacterSequenceAfterDoctypeName,
    #[error("missing-whitespace-after-doctype-public-keyword")]
    MissingWhitespaceAfterDoctypePublicKeyword,
    #[error("missing-whitespace-after-doctype-system-keyword")]
    MissingWhitespaceAfterDoctypeSystemKeyword,
    #[error("missing-doctype-public-identifier")]
    MissingDoctypePublicIdentifier,
    #[error("missing-doctype-system-identifier")]
    MissingDoctypeSystemIdentifier,
    #[error("missing-quote-before-doctype-public-identifier")]
    MissingQuoteBeforeDoctypePublicIdentifier,
    #[error("missing-quote-before-doctype-system-identifier")]
    MissingQuoteBeforeDoctypeSystemIdentifier,
    #[error("abrupt-doctype-public-identifier")]
    AbruptDoctypePublicIdentifier,
    #[error("abrupt-doctype-system-identifier")]
    AbruptDoctypeSystemIdentifier,
    #[error("missing-whitespace-between-doctype-public-and-system-identifiers")]
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    #[error("unexpected-character-after-doctype-system-identifier")]
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    #[error("absence-of-digits-in-numeric-character-reference")]
    AbsenceOfDigitsInNumericCharacterReference,
    #[error("missing-semicolon-after-character-reference")]
    MissingSemicolonAfterCharacterReference,
    #[error("unknown-named-character-reference")]
    UnknownNamedCharacterReference,
    #[error("null-character-reference")]
    NullCharacterReference,
    #[error("character-reference-outside-unicode-range")]
    CharacterReferenceOutsideUnicodeRange,
    #[error("surrogate-character-reference")]
    SurrogateCharacterReference,
    #[error("noncharacter-character-reference")]
    NoncharacterCharacterReference,
    #[error("control-character-reference")]
    ControlCharacterReference,
}

/// A recoverable error at a position in the normalized character stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{code}")]
pub struct ParseError {
    pub code: ParseErrorCode,
    /// Characters consumed before the error was detected, after newline
    /// normalization and BOM removal.
    pub position: u64,
}

impl ParseError {
    /// Long form used when `exact_errors` is on.
    pub(crate) fn describe_in(&self, state: impl fmt::Debug) -> String {
        format!(
            "{} in state {:?} at character {}",
            self.code, state, self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_error_code() {
        let err = ParseError {
            code: ParseErrorCode::DuplicateAttribute,
            position: 12,
        };
        assert_eq!(err.to_string(), "duplicate-attribute");
        assert_eq!(
            err.describe_in("AttributeName"),
            "duplicate-attribute in state \"AttributeName\" at character 12"
        );
    }
}
