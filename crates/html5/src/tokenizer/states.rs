//! Tokenizer state machine definitions.
//!
//! Names follow the HTML tokenization chapter. The raw text kinds share
//! their less-than / end-tag-open / end-tag-name states, parameterized by
//! [`RawKind`]; script data inside `<!--` is a raw kind of its own, escaped or
//! double escaped. Doctype identifier states are parameterized by
//! [`DoctypeIdKind`].

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScriptEscapeKind {
    Escaped,
    DoubleEscaped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RawKind {
    Rcdata,
    Rawtext,
    ScriptData,
    ScriptDataEscaped(ScriptEscapeKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AttrValueKind {
    DoubleQuoted,
    SingleQuoted,
    Unquoted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DoctypeIdKind {
    Public,
    System,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenizerState {
    Data,
    Plaintext,
    RawData(RawKind),
    RawLessThanSign(RawKind),
    RawEndTagOpen(RawKind),
    RawEndTagName(RawKind),
    /// `Escaped`: after `<!` in script data. `DoubleEscaped`: after `<` and a
    /// letter in escaped script data, collecting a possible `script` name.
    ScriptDataEscapeStart(ScriptEscapeKind),
    ScriptDataEscapeStartDash,
    ScriptDataEscapedDash(ScriptEscapeKind),
    ScriptDataEscapedDashDash(ScriptEscapeKind),
    ScriptDataDoubleEscapeEnd,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValue(AttrValueKind),
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    MarkupDeclarationOpen,
    CommentStart,
    CommentStartDash,
    Comment,
    CommentEndDash,
    CommentEnd,
    CommentEndBang,
    BogusComment,
    Doctype,
    BeforeDoctypeName,
    DoctypeName,
    AfterDoctypeName,
    AfterDoctypeKeyword(DoctypeIdKind),
    BeforeDoctypeIdentifier(DoctypeIdKind),
    DoctypeIdentifierDoubleQuoted(DoctypeIdKind),
    DoctypeIdentifierSingleQuoted(DoctypeIdKind),
    AfterDoctypeIdentifier(DoctypeIdKind),
    BetweenDoctypePublicAndSystemIdentifiers,
    BogusDoctype,
}

impl TokenizerState {
    pub(crate) fn is_attribute_value(self) -> bool {
        matches!(self, TokenizerState::AttributeValue(_))
    }
}
