use crate::lex::{Lex, LexKind};

/// The character classes the primitive scanner hands to the lexer.
///
/// This is deliberately XML-agnostic: it knows about letters, digits, the
/// individual whitespace characters and a fixed set of punctuation, nothing
/// else. The [`Lexer`] reshapes this stream into XML lexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Letters,
    Digits,
    Space,
    Tab,
    CarriageReturn,
    NewLine,
    Punctuation(LexKind),
    Other,
}

/// A primitive character-class unit with its verbatim text and offset.
#[derive(Debug, Clone)]
struct RawLex {
    class: CharClass,
    start: usize,
    len: usize,
}

/// Scans the source into character-class units: letter runs, digit runs,
/// one unit per whitespace or punctuation character, `"\r\n"` folded into a
/// single newline unit.
struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner { source, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn punctuation_kind(ch: char) -> Option<LexKind> {
        let kind = match ch {
            '<' => LexKind::LeftAngleBracket,
            '>' => LexKind::RightAngleBracket,
            '[' => LexKind::LeftSquareBracket,
            ']' => LexKind::RightSquareBracket,
            '?' => LexKind::QuestionMark,
            '!' => LexKind::ExclamationPoint,
            '-' => LexKind::Dash,
            '\'' => LexKind::SingleQuote,
            '"' => LexKind::DoubleQuote,
            '=' => LexKind::Equals,
            '_' => LexKind::Underscore,
            '.' => LexKind::Period,
            ':' => LexKind::Colon,
            ';' => LexKind::Semicolon,
            '&' => LexKind::Ampersand,
            '/' => LexKind::ForwardSlash,
            _ => return None,
        };
        Some(kind)
    }

    /// Absorb characters while `test` holds, starting after one already
    /// accepted character of `ch_len` bytes.
    fn run(&mut self, ch_len: usize, test: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        self.pos += ch_len;
        while let Some(ch) = self.peek() {
            if !test(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.pos - start
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = RawLex;

    fn next(&mut self) -> Option<RawLex> {
        let start = self.pos;
        let ch = self.peek()?;
        let (class, len) = match ch {
            '\n' => {
                self.pos += 1;
                (CharClass::NewLine, 1)
            }
            '\r' if self.source[self.pos..].starts_with("\r\n") => {
                self.pos += 2;
                (CharClass::NewLine, 2)
            }
            '\r' => {
                self.pos += 1;
                (CharClass::CarriageReturn, 1)
            }
            ' ' => {
                self.pos += 1;
                (CharClass::Space, 1)
            }
            '\t' => {
                self.pos += 1;
                (CharClass::Tab, 1)
            }
            _ => {
                if let Some(kind) = Self::punctuation_kind(ch) {
                    self.pos += 1;
                    (CharClass::Punctuation(kind), 1)
                } else if ch.is_ascii_digit() {
                    let len = self.run(1, |c| c.is_ascii_digit());
                    (CharClass::Digits, len)
                } else if ch.is_alphabetic() {
                    let len = self.run(ch.len_utf8(), |c| c.is_alphabetic());
                    (CharClass::Letters, len)
                } else {
                    self.pos += ch.len_utf8();
                    (CharClass::Other, ch.len_utf8())
                }
            }
        };
        Some(RawLex { class, start, len })
    }
}

/// The XML lexer.
///
/// Reshapes the primitive character-class stream into [`Lex`] values:
/// consecutive space, tab and carriage return units coalesce into a single
/// `Whitespace` lex, a newline terminates such a run and becomes its own
/// `NewLine` lex, and every other unit maps one-to-one onto an XML lex
/// kind, offsets and text preserved. The lexer itself cannot fail;
/// characters no kind claims come out as `Unrecognized`.
///
/// ```
/// use loxt::{Lexer, LexKind};
///
/// let kinds: Vec<_> = Lexer::new("<a>").map(|lex| lex.kind).collect();
/// assert_eq!(
///     kinds,
///     [LexKind::LeftAngleBracket, LexKind::Letters, LexKind::RightAngleBracket]
/// );
/// ```
pub struct Lexer<'a> {
    source: &'a str,
    scanner: std::iter::Peekable<Scanner<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over the given source text.
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            scanner: Scanner::new(source).peekable(),
        }
    }

    fn text(&self, start: usize, len: usize) -> &'a str {
        &self.source[start..start + len]
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Lex;

    fn next(&mut self) -> Option<Lex> {
        let raw = self.scanner.next()?;
        let kind = match raw.class {
            CharClass::Letters => LexKind::Letters,
            CharClass::Digits => LexKind::Digits,
            CharClass::NewLine => LexKind::NewLine,
            CharClass::Punctuation(kind) => kind,
            CharClass::Other => LexKind::Unrecognized,
            CharClass::Space | CharClass::Tab | CharClass::CarriageReturn => {
                // coalesce the whole whitespace run; a newline ends it
                let mut len = raw.len;
                while let Some(next) = self.scanner.peek() {
                    match next.class {
                        CharClass::Space | CharClass::Tab | CharClass::CarriageReturn => {
                            len += next.len;
                            self.scanner.next();
                        }
                        _ => break,
                    }
                }
                return Some(Lex::new(
                    LexKind::Whitespace,
                    self.text(raw.start, len),
                    raw.start,
                ));
            }
        };
        Some(Lex::new(kind, self.text(raw.start, raw.len), raw.start))
    }
}
