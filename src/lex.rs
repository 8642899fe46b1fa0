use std::fmt;

use crate::span::Span;

/// The kind of a single lexical unit.
///
/// The kind determines exactly which character sequences the lex text may
/// hold: punctuation kinds hold their single character, `Letters` and
/// `Digits` hold runs, `Whitespace` holds a run of space, tab and carriage
/// return characters, and `NewLine` holds `"\n"` or `"\r\n"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexKind {
    /// `<`
    LeftAngleBracket,
    /// `>`
    RightAngleBracket,
    /// `[`
    LeftSquareBracket,
    /// `]`
    RightSquareBracket,
    /// `?`
    QuestionMark,
    /// `!`
    ExclamationPoint,
    /// `-`
    Dash,
    /// `'`
    SingleQuote,
    /// `"`
    DoubleQuote,
    /// `=`
    Equals,
    /// `_`
    Underscore,
    /// `.`
    Period,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `&`
    Ampersand,
    /// `/`
    ForwardSlash,
    /// A run of space, tab and carriage return characters.
    Whitespace,
    /// `"\n"` or `"\r\n"`.
    NewLine,
    /// A run of alphabetic characters.
    Letters,
    /// A run of ASCII digits.
    Digits,
    /// A single character no other kind claims.
    Unrecognized,
}

impl LexKind {
    /// Whether a lex of this kind may start a name.
    pub fn is_name_start(&self) -> bool {
        matches!(
            self,
            LexKind::Letters | LexKind::Underscore | LexKind::Colon
        )
    }

    /// Whether a lex of this kind may continue a name.
    pub fn is_name_continuation(&self) -> bool {
        matches!(
            self,
            LexKind::Letters
                | LexKind::Digits
                | LexKind::Period
                | LexKind::Dash
                | LexKind::Underscore
                | LexKind::Colon
        )
    }

    /// Whether this kind is whitespace, a newline included.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, LexKind::Whitespace | LexKind::NewLine)
    }
}

/// A single lexical unit: a kind, its verbatim text and its start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lex {
    /// The kind of the lex.
    pub kind: LexKind,
    /// The verbatim source text of the lex.
    pub text: String,
    /// The start offset of the lex in the source.
    pub start: usize,
}

impl Lex {
    pub(crate) fn new(kind: LexKind, text: impl Into<String>, start: usize) -> Self {
        Lex {
            kind,
            text: text.into(),
            start,
        }
    }

    /// The number of bytes this lex covers.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the lex text is empty. Lexes produced by the lexer never are.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The offset one past the last byte of this lex.
    pub fn after_end(&self) -> usize {
        self.start + self.text.len()
    }

    /// The span this lex covers.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.text.len())
    }
}

impl fmt::Display for Lex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
