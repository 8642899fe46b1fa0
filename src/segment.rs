use std::fmt;

use crate::element::Element;
use crate::lex::{Lex, LexKind};
use crate::name::Name;
use crate::span::Span;

/// The type of a segment.
///
/// The `SegmentKind` can be used if you are interested in the type of a
/// segment without needing to match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// A bare lex at segment level, such as a standalone newline.
    Lex,
    /// An XML name.
    Name,
    /// A quoted string.
    QuotedString,
    /// An attribute.
    Attribute,
    /// A DOCTYPE internal subset, `[` through `]`.
    InternalDefinition,
    /// A run of text.
    Text,
    /// `<name …>`
    StartTag,
    /// `<name …/>`
    EmptyElement,
    /// `</name>`
    EndTag,
    /// A tag no other shape claims.
    UnrecognizedTag,
    /// `<?xml …?>`
    Declaration,
    /// `<?name …?>`
    ProcessingInstruction,
    /// `<!--…-->`
    Comment,
    /// `<![CDATA[…]]>`
    Cdata,
    /// `<!DOCTYPE …>`
    Doctype,
    /// A start tag with its children and, when found, its end tag.
    Element,
}

/// A node in the parse tree.
///
/// Every variant carries the ordered pieces it was read from and
/// reconstructs its text verbatim through `Display`; concatenating the
/// segments of a document reproduces the input byte for byte, malformed or
/// not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A bare lex at segment level, such as a standalone newline.
    Lex(Lex),
    /// An XML name.
    Name(Name),
    /// A quoted string.
    QuotedString(QuotedString),
    /// An attribute.
    Attribute(Attribute),
    /// A DOCTYPE internal subset.
    InternalDefinition(InternalDefinition),
    /// A run of text.
    Text(Text),
    /// `<name …>`
    StartTag(Tag),
    /// `<name …/>`
    EmptyElement(Tag),
    /// `</name>`
    EndTag(Tag),
    /// A tag no other shape claims.
    UnrecognizedTag(Tag),
    /// `<?xml …?>`
    Declaration(Tag),
    /// `<?name …?>`
    ProcessingInstruction(Tag),
    /// `<!--…-->`
    Comment(Tag),
    /// `<![CDATA[…]]>`
    Cdata(Tag),
    /// `<!DOCTYPE …>`
    Doctype(Tag),
    /// A start tag with its children and, when found, its end tag.
    Element(Element),
}

impl Segment {
    /// The type of this segment.
    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Lex(_) => SegmentKind::Lex,
            Segment::Name(_) => SegmentKind::Name,
            Segment::QuotedString(_) => SegmentKind::QuotedString,
            Segment::Attribute(_) => SegmentKind::Attribute,
            Segment::InternalDefinition(_) => SegmentKind::InternalDefinition,
            Segment::Text(_) => SegmentKind::Text,
            Segment::StartTag(_) => SegmentKind::StartTag,
            Segment::EmptyElement(_) => SegmentKind::EmptyElement,
            Segment::EndTag(_) => SegmentKind::EndTag,
            Segment::UnrecognizedTag(_) => SegmentKind::UnrecognizedTag,
            Segment::Declaration(_) => SegmentKind::Declaration,
            Segment::ProcessingInstruction(_) => SegmentKind::ProcessingInstruction,
            Segment::Comment(_) => SegmentKind::Comment,
            Segment::Cdata(_) => SegmentKind::Cdata,
            Segment::Doctype(_) => SegmentKind::Doctype,
            Segment::Element(_) => SegmentKind::Element,
        }
    }

    /// The tag inside this segment, for any of the tag variants.
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Segment::StartTag(tag)
            | Segment::EmptyElement(tag)
            | Segment::EndTag(tag)
            | Segment::UnrecognizedTag(tag)
            | Segment::Declaration(tag)
            | Segment::ProcessingInstruction(tag)
            | Segment::Comment(tag)
            | Segment::Cdata(tag)
            | Segment::Doctype(tag) => Some(tag),
            _ => None,
        }
    }

    /// The element inside this segment, if it is one.
    pub fn element(&self) -> Option<&Element> {
        match self {
            Segment::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The start offset of this segment.
    pub fn start(&self) -> usize {
        match self {
            Segment::Lex(lex) => lex.start,
            Segment::Name(name) => name.start(),
            Segment::QuotedString(quoted) => quoted.start(),
            Segment::Attribute(attribute) => attribute.start(),
            Segment::InternalDefinition(definition) => definition.start(),
            Segment::Text(text) => text.start(),
            Segment::Element(element) => element.start(),
            _ => self.tag().expect("tag variant").start(),
        }
    }

    /// The offset one past the last byte of this segment.
    pub fn after_end(&self) -> usize {
        match self {
            Segment::Lex(lex) => lex.after_end(),
            Segment::Name(name) => name.after_end(),
            Segment::QuotedString(quoted) => quoted.after_end(),
            Segment::Attribute(attribute) => attribute.after_end(),
            Segment::InternalDefinition(definition) => definition.after_end(),
            Segment::Text(text) => text.after_end(),
            Segment::Element(element) => element.after_end(),
            _ => self.tag().expect("tag variant").after_end(),
        }
    }

    /// The number of bytes this segment covers.
    pub fn len(&self) -> usize {
        self.after_end() - self.start()
    }

    /// Whether this segment covers no bytes. Segments built by the
    /// tokenizer never do.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The span this segment covers.
    pub fn span(&self) -> Span {
        Span::new(self.start(), self.len())
    }

    /// Whether the given index addresses this segment.
    ///
    /// The rule varies by variant: tags closed by a `>` contain the strict
    /// inside of their brackets, unterminated tags are open ended on the
    /// right, names, texts and bare lexes include both boundaries, an
    /// attribute stops at its last non-whitespace piece and a quoted string
    /// stops short of the position after its end quote.
    pub fn contains_index(&self, index: usize) -> bool {
        match self {
            Segment::Lex(lex) => index >= lex.start && index <= lex.after_end(),
            Segment::Name(name) => name.contains_index(index),
            Segment::QuotedString(quoted) => quoted.contains_index(index),
            Segment::Attribute(attribute) => attribute.contains_index(index),
            Segment::InternalDefinition(definition) => definition.contains_index(index),
            Segment::Text(text) => text.contains_index(index),
            Segment::Element(element) => element.contains_index(index),
            _ => self.tag().expect("tag variant").contains_index(index),
        }
    }

    /// Whether this segment is nothing but whitespace: a whitespace-only
    /// text run, or a bare whitespace or newline lex.
    pub fn is_whitespace(&self) -> bool {
        match self {
            Segment::Text(text) => text.is_whitespace(),
            Segment::Lex(lex) => lex.kind.is_whitespace(),
            _ => false,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Lex(lex) => lex.fmt(f),
            Segment::Name(name) => name.fmt(f),
            Segment::QuotedString(quoted) => quoted.fmt(f),
            Segment::Attribute(attribute) => attribute.fmt(f),
            Segment::InternalDefinition(definition) => definition.fmt(f),
            Segment::Text(text) => text.fmt(f),
            Segment::Element(element) => element.fmt(f),
            _ => self.tag().expect("tag variant").fmt(f),
        }
    }
}

/// A quoted string: a single or double start quote, content lexes, and,
/// when the input provided one, a matching end quote.
///
/// The other quote kind is ordinary content, so `"it's"` is one quoted
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedString {
    pub(crate) lexes: Vec<Lex>,
}

impl QuotedString {
    pub(crate) fn new(lexes: Vec<Lex>) -> Self {
        debug_assert!(matches!(
            lexes.first().map(|lex| lex.kind),
            Some(LexKind::SingleQuote) | Some(LexKind::DoubleQuote)
        ));
        QuotedString { lexes }
    }

    /// The lexes making up this quoted string, quotes included.
    pub fn lexes(&self) -> &[Lex] {
        &self.lexes
    }

    /// The start quote lex.
    pub fn start_quote(&self) -> &Lex {
        &self.lexes[0]
    }

    /// Whether the string ends with a quote matching its start quote.
    pub fn has_end_quote(&self) -> bool {
        self.lexes.len() > 1 && self.lexes[self.lexes.len() - 1].kind == self.lexes[0].kind
    }

    /// The content lexes between the quotes.
    pub fn unquoted_lexes(&self) -> &[Lex] {
        let end = if self.has_end_quote() {
            self.lexes.len() - 1
        } else {
            self.lexes.len()
        };
        &self.lexes[1..end]
    }

    /// The content text between the quotes.
    pub fn unquoted_string(&self) -> String {
        self.unquoted_lexes()
            .iter()
            .map(|lex| lex.text.as_str())
            .collect()
    }

    /// The start offset of the quoted string.
    pub fn start(&self) -> usize {
        self.lexes[0].start
    }

    /// The offset one past the last byte of the quoted string.
    pub fn after_end(&self) -> usize {
        self.lexes[self.lexes.len() - 1].after_end()
    }

    /// The span the quoted string covers.
    pub fn span(&self) -> Span {
        Span::new(self.start(), self.after_end() - self.start())
    }

    /// A quoted string contains an index from its start quote up to but not
    /// past its end quote; without an end quote it is open ended.
    pub fn contains_index(&self, index: usize) -> bool {
        if self.has_end_quote() {
            index >= self.start() && index < self.after_end()
        } else {
            index >= self.start()
        }
    }
}

impl fmt::Display for QuotedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lex in &self.lexes {
            f.write_str(&lex.text)?;
        }
        Ok(())
    }
}

/// An attribute: a name, optionally followed by whitespace, an equals sign
/// and a quoted value, in any of the truncated shapes the recovery rules
/// allow. Whitespace around the equals sign and after the value belongs to
/// the attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub(crate) pieces: Vec<Segment>,
}

impl Attribute {
    pub(crate) fn new(pieces: Vec<Segment>) -> Self {
        debug_assert!(matches!(pieces.first(), Some(Segment::Name(_))));
        Attribute { pieces }
    }

    /// The ordered pieces of the attribute.
    pub fn pieces(&self) -> &[Segment] {
        &self.pieces
    }

    /// The attribute name.
    pub fn name(&self) -> &Name {
        match &self.pieces[0] {
            Segment::Name(name) => name,
            _ => unreachable!("attribute starts with its name"),
        }
    }

    /// The equals sign lex, when present.
    pub fn equals(&self) -> Option<&Lex> {
        self.pieces.iter().find_map(|piece| match piece {
            Segment::Lex(lex) if lex.kind == LexKind::Equals => Some(lex),
            _ => None,
        })
    }

    /// The quoted value, when present.
    pub fn value(&self) -> Option<&QuotedString> {
        self.pieces.iter().find_map(|piece| match piece {
            Segment::QuotedString(quoted) => Some(quoted),
            _ => None,
        })
    }

    pub(crate) fn has_trailing_whitespace(&self) -> bool {
        matches!(
            self.pieces.last(),
            Some(Segment::Lex(lex)) if lex.kind.is_whitespace()
        )
    }

    /// The start offset of the attribute.
    pub fn start(&self) -> usize {
        self.pieces[0].start()
    }

    /// The offset one past the last byte of the attribute, trailing
    /// whitespace included.
    pub fn after_end(&self) -> usize {
        self.pieces[self.pieces.len() - 1].after_end()
    }

    /// The span the attribute covers.
    pub fn span(&self) -> Span {
        Span::new(self.start(), self.after_end() - self.start())
    }

    fn content_after_end(&self) -> usize {
        self.pieces
            .iter()
            .rev()
            .find(|piece| !piece.is_whitespace())
            .map(|piece| piece.after_end())
            .unwrap_or_else(|| self.start())
    }

    /// An attribute contains an index inclusively, but whitespace trailing
    /// its value does not count.
    pub fn contains_index(&self, index: usize) -> bool {
        index >= self.start() && index <= self.content_after_end()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            piece.fmt(f)?;
        }
        Ok(())
    }
}

/// A DOCTYPE internal subset: `[`, opaque content, and, when the input
/// provided one, the closing `]`. Nested square brackets balance and quoted
/// strings are read as units, so a `]` inside either does not close it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalDefinition {
    pub(crate) pieces: Vec<Segment>,
    pub(crate) closed: bool,
}

impl InternalDefinition {
    /// The ordered pieces of the internal subset, brackets included.
    pub fn pieces(&self) -> &[Segment] {
        &self.pieces
    }

    /// Whether the closing `]` was found.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The start offset of the internal subset.
    pub fn start(&self) -> usize {
        self.pieces[0].start()
    }

    /// The offset one past the last byte of the internal subset.
    pub fn after_end(&self) -> usize {
        self.pieces[self.pieces.len() - 1].after_end()
    }

    /// The span the internal subset covers.
    pub fn span(&self) -> Span {
        Span::new(self.start(), self.after_end() - self.start())
    }

    /// Closed subsets contain the strict inside of their brackets;
    /// unterminated ones are open ended.
    pub fn contains_index(&self, index: usize) -> bool {
        if self.closed {
            index > self.start() && index < self.after_end()
        } else {
            index > self.start()
        }
    }
}

impl fmt::Display for InternalDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            piece.fmt(f)?;
        }
        Ok(())
    }
}

/// A run of text: everything between tags on a single line. A standalone
/// newline is its own segment, so a text never contains one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub(crate) lexes: Vec<Lex>,
}

impl Text {
    pub(crate) fn new(lexes: Vec<Lex>) -> Self {
        debug_assert!(!lexes.is_empty());
        Text { lexes }
    }

    /// The lexes making up this text.
    pub fn lexes(&self) -> &[Lex] {
        &self.lexes
    }

    /// The verbatim text.
    pub fn text(&self) -> String {
        self.lexes.iter().map(|lex| lex.text.as_str()).collect()
    }

    /// Whether the run is whitespace only.
    pub fn is_whitespace(&self) -> bool {
        self.lexes.iter().all(|lex| lex.kind.is_whitespace())
    }

    /// The tightest span over the non-whitespace lexes of the run, absent
    /// when the run is all whitespace.
    pub fn non_whitespace_span(&self) -> Option<Span> {
        let first = self
            .lexes
            .iter()
            .find(|lex| !lex.kind.is_whitespace())?;
        let last = self
            .lexes
            .iter()
            .rev()
            .find(|lex| !lex.kind.is_whitespace())?;
        Some(Span::new(first.start, last.after_end() - first.start))
    }

    /// The start offset of the text.
    pub fn start(&self) -> usize {
        self.lexes[0].start
    }

    /// The offset one past the last byte of the text.
    pub fn after_end(&self) -> usize {
        self.lexes[self.lexes.len() - 1].after_end()
    }

    /// The span the text covers.
    pub fn span(&self) -> Span {
        Span::new(self.start(), self.after_end() - self.start())
    }

    /// Texts are inclusive on both ends.
    pub fn contains_index(&self, index: usize) -> bool {
        index >= self.start() && index <= self.after_end()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lex in &self.lexes {
            f.write_str(&lex.text)?;
        }
        Ok(())
    }
}

/// The shared body of every tag shape: the ordered pieces between and
/// including its `<` and, when found, its `>`.
///
/// Which shape a tag is lives in the [`Segment`] variant wrapping it. The
/// derived accessors only scan the pieces; a piece that is an attribute is
/// reported as one no matter where in the tag it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub(crate) pieces: Vec<Segment>,
    pub(crate) closed: bool,
}

impl Tag {
    pub(crate) fn new(pieces: Vec<Segment>, closed: bool) -> Self {
        debug_assert!(!pieces.is_empty());
        Tag { pieces, closed }
    }

    /// The ordered pieces of the tag.
    pub fn pieces(&self) -> &[Segment] {
        &self.pieces
    }

    /// Whether the closing `>` was found.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The names in this tag, in order. For a start or end tag the first
    /// name is the tag name; for a DOCTYPE it is the `DOCTYPE` marker
    /// followed by the root element name and any external id keyword.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.pieces.iter().filter_map(|piece| match piece {
            Segment::Name(name) => Some(name),
            _ => None,
        })
    }

    /// The tag name: the first name among the pieces.
    pub fn name(&self) -> Option<&Name> {
        self.names().next()
    }

    /// The attributes of the tag, in order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.pieces.iter().filter_map(|piece| match piece {
            Segment::Attribute(attribute) => Some(attribute),
            _ => None,
        })
    }

    /// Get an attribute by name, compared case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes()
            .find(|attribute| attribute.name().matches_str(name))
    }

    /// The declaration's `version` attribute, wherever it sits in the tag.
    pub fn version(&self) -> Option<&Attribute> {
        self.attribute("version")
    }

    /// The declaration's `encoding` attribute, wherever it sits in the tag.
    pub fn encoding(&self) -> Option<&Attribute> {
        self.attribute("encoding")
    }

    /// The declaration's `standalone` attribute, wherever it sits in the
    /// tag.
    pub fn standalone(&self) -> Option<&Attribute> {
        self.attribute("standalone")
    }

    /// The quoted strings sitting directly in the tag, such as DOCTYPE
    /// public and system identifiers. Attribute values do not appear here.
    pub fn quoted_strings(&self) -> impl Iterator<Item = &QuotedString> {
        self.pieces.iter().filter_map(|piece| match piece {
            Segment::QuotedString(quoted) => Some(quoted),
            _ => None,
        })
    }

    /// The DOCTYPE internal subset, when present.
    pub fn internal_definition(&self) -> Option<&InternalDefinition> {
        self.pieces.iter().find_map(|piece| match piece {
            Segment::InternalDefinition(definition) => Some(definition),
            _ => None,
        })
    }

    /// The start offset of the tag.
    pub fn start(&self) -> usize {
        self.pieces[0].start()
    }

    /// The offset one past the last byte of the tag.
    pub fn after_end(&self) -> usize {
        self.pieces[self.pieces.len() - 1].after_end()
    }

    /// The number of bytes the tag covers.
    pub fn len(&self) -> usize {
        self.after_end() - self.start()
    }

    /// Whether the tag covers no bytes. Tags built by the tokenizer never
    /// do.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The span the tag covers.
    pub fn span(&self) -> Span {
        Span::new(self.start(), self.len())
    }

    /// Closed tags contain the strict inside of their brackets;
    /// unterminated ones are open ended on the right.
    pub fn contains_index(&self, index: usize) -> bool {
        if self.closed {
            index > self.start() && index < self.after_end()
        } else {
            index > self.start()
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            piece.fmt(f)?;
        }
        Ok(())
    }
}
