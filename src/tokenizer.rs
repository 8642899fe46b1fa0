use std::iter::Peekable;

use crate::issue::{Issue, IssueKind};
use crate::lex::{Lex, LexKind};
use crate::lexer::Lexer;
use crate::name::Name;
use crate::segment::{Attribute, InternalDefinition, QuotedString, Segment, Tag, Text};
use crate::span::Span;

/// What the start-tag reader is positioned after, which decides the
/// diagnostic when something unexpected shows up. Absorbing junk does not
/// move the position, which is why one bad stretch can report the same
/// expectation more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartTagPosition {
    /// Right after the tag name or a completed attribute.
    AfterName,
    /// Right after whitespace, where an attribute name may start.
    AfterWhitespace,
}

/// The segment tokenizer.
///
/// Reads the lex stream and yields exactly one [`Segment`] per `next`
/// call. Malformed shapes produce diagnostics in the sink the tokenizer
/// was built with, never a failure: whatever the input, every lex ends up
/// inside some segment and the stream continues after the damage.
///
/// ```
/// use loxt::{SegmentKind, Tokenizer};
///
/// let mut issues = Vec::new();
/// let mut tokenizer = Tokenizer::new("<a>text", Some(&mut issues));
/// let kinds: Vec<_> = (&mut tokenizer).map(|segment| segment.kind()).collect();
/// assert_eq!(kinds, [SegmentKind::StartTag, SegmentKind::Text]);
/// ```
pub struct Tokenizer<'a, 'i> {
    lexes: Peekable<Lexer<'a>>,
    issues: Option<&'i mut Vec<Issue>>,
}

impl<'a, 'i> Tokenizer<'a, 'i> {
    /// Create a tokenizer over the given source, reporting into the given
    /// sink. Without a sink the diagnostics are discarded and only the
    /// segments remain.
    pub fn new(source: &'a str, issues: Option<&'i mut Vec<Issue>>) -> Self {
        Tokenizer {
            lexes: Lexer::new(source).peekable(),
            issues,
        }
    }

    pub(crate) fn report(&mut self, kind: IssueKind, span: Span) {
        if let Some(issues) = self.issues.as_deref_mut() {
            issues.push(Issue::new(kind, span));
        }
    }

    fn report_at_peek(&mut self, kind: IssueKind) {
        let span = self.peek_span();
        self.report(kind, span);
    }

    fn peek_kind(&mut self) -> Option<LexKind> {
        self.lexes.peek().map(|lex| lex.kind)
    }

    fn peek_span(&mut self) -> Span {
        self.lexes.peek().map(|lex| lex.span()).unwrap_or_default()
    }

    fn bump(&mut self) -> Lex {
        self.lexes.next().expect("caller checked a lex is present")
    }

    fn bump_into(&mut self, pieces: &mut Vec<Segment>) {
        let lex = self.bump();
        pieces.push(Segment::Lex(lex));
    }

    /// Read a name. The caller has checked the current lex starts one.
    fn read_name(&mut self) -> Name {
        let mut lexes = vec![self.bump()];
        while let Some(kind) = self.peek_kind() {
            if !kind.is_name_continuation() {
                break;
            }
            lexes.push(self.bump());
        }
        Name::new(lexes)
    }

    /// Read a quoted string. The caller has checked the current lex is a
    /// quote. Everything up to the matching quote is content, newlines
    /// included; at end of input the missing end quote is reported against
    /// the start quote.
    fn read_quoted_string(&mut self) -> QuotedString {
        let start_quote = self.bump();
        let quote_kind = start_quote.kind;
        let quote_span = start_quote.span();
        let mut lexes = vec![start_quote];
        loop {
            match self.peek_kind() {
                None => {
                    self.report(IssueKind::MissingQuotedStringEndQuote, quote_span);
                    break;
                }
                Some(kind) if kind == quote_kind => {
                    lexes.push(self.bump());
                    break;
                }
                Some(_) => lexes.push(self.bump()),
            }
        }
        QuotedString::new(lexes)
    }

    /// Read a text run: everything up to the next `<`, newline or end of
    /// input.
    fn read_text(&mut self) -> Text {
        let mut lexes = vec![self.bump()];
        while let Some(kind) = self.peek_kind() {
            if matches!(kind, LexKind::LeftAngleBracket | LexKind::NewLine) {
                break;
            }
            lexes.push(self.bump());
        }
        Text::new(lexes)
    }

    /// Dispatch on the lex after a `<`.
    fn read_tag(&mut self) -> Segment {
        let open = self.bump();
        let open_span = open.span();
        let mut pieces = vec![Segment::Lex(open)];
        match self.peek_kind() {
            None => {
                self.report(
                    IssueKind::MissingNameQuestionMarkExclamationPointOrForwardSlash,
                    open_span,
                );
                self.finish_unrecognized(pieces, open_span)
            }
            Some(kind) if kind.is_name_start() => {
                let name = self.read_name();
                pieces.push(Segment::Name(name));
                self.read_start_tag(pieces, open_span)
            }
            Some(LexKind::QuestionMark) => {
                self.bump_into(&mut pieces);
                self.read_question_mark_tag(pieces, open_span)
            }
            Some(LexKind::ForwardSlash) => {
                self.bump_into(&mut pieces);
                self.read_end_tag(pieces, open_span)
            }
            Some(LexKind::ExclamationPoint) => {
                self.bump_into(&mut pieces);
                self.read_exclamation_point_tag(pieces, open_span)
            }
            Some(_) => {
                self.report_at_peek(IssueKind::ExpectedNameQuestionMarkExclamationPointOrForwardSlash);
                self.finish_unrecognized(pieces, open_span)
            }
        }
    }

    /// After `<?`: a declaration when the name is exactly `xml`, otherwise
    /// a processing instruction.
    fn read_question_mark_tag(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        match self.peek_kind() {
            Some(kind) if kind.is_name_start() => {
                let name = self.read_name();
                let is_declaration = name.is_exactly("xml");
                let name_span = name.span();
                pieces.push(Segment::Name(name));
                if is_declaration {
                    self.read_declaration(pieces, open_span, name_span)
                } else {
                    self.read_processing_instruction(pieces, open_span)
                }
            }
            None => {
                self.report(
                    IssueKind::MissingDeclarationOrProcessingInstructionName,
                    open_span,
                );
                self.finish_unrecognized(pieces, open_span)
            }
            Some(_) => {
                self.report_at_peek(IssueKind::ExpectedDeclarationOrProcessingInstructionName);
                self.finish_unrecognized(pieces, open_span)
            }
        }
    }

    /// After `<!`: DOCTYPE, comment or CDATA.
    fn read_exclamation_point_tag(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        match self.peek_kind() {
            Some(kind) if kind.is_name_start() => {
                let name = self.read_name();
                if name.is_exactly("DOCTYPE") {
                    pieces.push(Segment::Name(name));
                    self.read_doctype(pieces, open_span)
                } else {
                    self.report(
                        IssueKind::ExpectedDoctypeNameCommentDashesOrCdataLeftSquareBracket,
                        name.span(),
                    );
                    pieces.push(Segment::Name(name));
                    self.finish_unrecognized(pieces, open_span)
                }
            }
            Some(LexKind::Dash) => self.read_comment(pieces, open_span),
            Some(LexKind::LeftSquareBracket) => {
                self.bump_into(&mut pieces);
                self.read_cdata(pieces, open_span)
            }
            None => {
                self.report(
                    IssueKind::MissingDoctypeNameCommentDashesOrCdataLeftSquareBracket,
                    open_span,
                );
                self.finish_unrecognized(pieces, open_span)
            }
            Some(_) => {
                self.report_at_peek(IssueKind::ExpectedDoctypeNameCommentDashesOrCdataLeftSquareBracket);
                self.finish_unrecognized(pieces, open_span)
            }
        }
    }

    /// Read the rest of a start tag or empty-element tag; the `<` and the
    /// name are already among the pieces.
    fn read_start_tag(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        let mut position = StartTagPosition::AfterName;
        let mut empty_marker = false;
        loop {
            match self.peek_kind() {
                None => {
                    let kind = if empty_marker {
                        IssueKind::MissingEmptyElementRightAngleBracket
                    } else {
                        IssueKind::MissingStartTagRightAngleBracket
                    };
                    self.report(kind, open_span);
                    let tag = Tag::new(pieces, false);
                    return if empty_marker {
                        Segment::EmptyElement(tag)
                    } else {
                        Segment::StartTag(tag)
                    };
                }
                Some(LexKind::RightAngleBracket) => {
                    self.bump_into(&mut pieces);
                    let tag = Tag::new(pieces, true);
                    return if empty_marker {
                        Segment::EmptyElement(tag)
                    } else {
                        Segment::StartTag(tag)
                    };
                }
                Some(kind) if empty_marker => {
                    // only `>` may follow the empty-element slash
                    self.report_at_peek(IssueKind::ExpectedEmptyElementRightAngleBracket);
                    if matches!(kind, LexKind::SingleQuote | LexKind::DoubleQuote) {
                        let quoted = self.read_quoted_string();
                        pieces.push(Segment::QuotedString(quoted));
                    } else {
                        self.bump_into(&mut pieces);
                    }
                }
                Some(LexKind::ForwardSlash) => {
                    self.bump_into(&mut pieces);
                    empty_marker = true;
                }
                Some(LexKind::Whitespace) | Some(LexKind::NewLine) => {
                    self.bump_into(&mut pieces);
                    position = StartTagPosition::AfterWhitespace;
                }
                Some(kind) if kind.is_name_start() => {
                    let missing_whitespace_before = matches!(
                        pieces.last(),
                        Some(Segment::Attribute(attribute)) if !attribute.has_trailing_whitespace()
                    );
                    let attribute = self.read_attribute(missing_whitespace_before);
                    position = if attribute.has_trailing_whitespace() {
                        StartTagPosition::AfterWhitespace
                    } else {
                        StartTagPosition::AfterName
                    };
                    pieces.push(Segment::Attribute(attribute));
                }
                Some(kind) => {
                    let issue = match position {
                        StartTagPosition::AfterName => {
                            IssueKind::ExpectedWhitespaceStartTagRightAngleBracketOrEmptyElementForwardSlash
                        }
                        StartTagPosition::AfterWhitespace => {
                            IssueKind::ExpectedAttributeNameStartTagRightAngleBracketOrEmptyElementForwardSlash
                        }
                    };
                    self.report_at_peek(issue);
                    if matches!(kind, LexKind::SingleQuote | LexKind::DoubleQuote) {
                        let quoted = self.read_quoted_string();
                        pieces.push(Segment::QuotedString(quoted));
                    } else {
                        self.bump_into(&mut pieces);
                    }
                }
            }
        }
    }

    /// Read the rest of an end tag; the `<` and `/` are already among the
    /// pieces.
    fn read_end_tag(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        while let Some(LexKind::Whitespace) | Some(LexKind::NewLine) = self.peek_kind() {
            self.bump_into(&mut pieces);
        }
        match self.peek_kind() {
            Some(kind) if kind.is_name_start() => {
                let name = self.read_name();
                pieces.push(Segment::Name(name));
            }
            None => self.report(IssueKind::MissingEndTagName, open_span),
            Some(_) => self.report_at_peek(IssueKind::ExpectedEndTagName),
        }
        loop {
            match self.peek_kind() {
                None => {
                    self.report(IssueKind::MissingEndTagRightAngleBracket, open_span);
                    return Segment::EndTag(Tag::new(pieces, false));
                }
                Some(LexKind::RightAngleBracket) => {
                    self.bump_into(&mut pieces);
                    return Segment::EndTag(Tag::new(pieces, true));
                }
                Some(LexKind::Whitespace) | Some(LexKind::NewLine) => {
                    self.bump_into(&mut pieces);
                }
                Some(kind) => {
                    self.report_at_peek(IssueKind::ExpectedEndTagRightAngleBracket);
                    if matches!(kind, LexKind::SingleQuote | LexKind::DoubleQuote) {
                        let quoted = self.read_quoted_string();
                        pieces.push(Segment::QuotedString(quoted));
                    } else {
                        self.bump_into(&mut pieces);
                    }
                }
            }
        }
    }

    /// Read the rest of a `<?xml …?>` declaration; `<`, `?` and the `xml`
    /// name are already among the pieces.
    ///
    /// The attribute order is enforced with recovery: `version` first with
    /// the literal value `1.0`, then optionally `encoding` or `standalone`,
    /// then optionally `standalone` with `yes` or `no`. Whatever parses as
    /// an attribute still lands in the tag.
    fn read_declaration(
        &mut self,
        mut pieces: Vec<Segment>,
        open_span: Span,
        name_span: Span,
    ) -> Segment {
        let mut attribute_count = 0usize;
        let mut seen_standalone = false;
        loop {
            match self.peek_kind() {
                None => {
                    if attribute_count == 0 {
                        self.report(IssueKind::MissingDeclarationVersionAttribute, name_span);
                    }
                    self.report(IssueKind::MissingDeclarationRightQuestionMark, open_span);
                    return Segment::Declaration(Tag::new(pieces, false));
                }
                Some(LexKind::Whitespace) | Some(LexKind::NewLine) => {
                    self.bump_into(&mut pieces);
                }
                Some(LexKind::QuestionMark) => {
                    if attribute_count == 0 {
                        self.report_at_peek(IssueKind::ExpectedDeclarationVersionAttribute);
                    }
                    self.bump_into(&mut pieces);
                    return self.finish_declaration(pieces, open_span);
                }
                Some(LexKind::RightAngleBracket) => {
                    // accidental terminator: close here rather than hunt
                    // for a `?>` in the rest of the document
                    if attribute_count == 0 {
                        self.report_at_peek(IssueKind::ExpectedDeclarationVersionAttribute);
                    }
                    self.report_at_peek(IssueKind::ExpectedDeclarationRightQuestionMark);
                    self.bump_into(&mut pieces);
                    return Segment::Declaration(Tag::new(pieces, true));
                }
                Some(kind) if kind.is_name_start() => {
                    let attribute = self.read_attribute(false);
                    self.check_declaration_attribute(
                        &attribute,
                        attribute_count,
                        &mut seen_standalone,
                    );
                    attribute_count += 1;
                    pieces.push(Segment::Attribute(attribute));
                }
                Some(kind) => {
                    self.report_at_peek(IssueKind::ExpectedDeclarationRightQuestionMark);
                    if matches!(kind, LexKind::SingleQuote | LexKind::DoubleQuote) {
                        let quoted = self.read_quoted_string();
                        pieces.push(Segment::QuotedString(quoted));
                    } else {
                        self.bump_into(&mut pieces);
                    }
                }
            }
        }
    }

    /// After the declaration's `?`: only `>` is acceptable.
    fn finish_declaration(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        loop {
            match self.peek_kind() {
                None => {
                    self.report(IssueKind::MissingDeclarationRightAngleBracket, open_span);
                    return Segment::Declaration(Tag::new(pieces, false));
                }
                Some(LexKind::RightAngleBracket) => {
                    self.bump_into(&mut pieces);
                    return Segment::Declaration(Tag::new(pieces, true));
                }
                Some(kind) if kind.is_name_start() => {
                    // still read an attribute shape, so it stays visible
                    // through the tag's attribute accessors
                    let attribute = self.read_attribute(false);
                    self.report(
                        IssueKind::ExpectedDeclarationRightAngleBracket,
                        attribute.name().span(),
                    );
                    pieces.push(Segment::Attribute(attribute));
                }
                Some(kind) => {
                    self.report_at_peek(IssueKind::ExpectedDeclarationRightAngleBracket);
                    if matches!(kind, LexKind::SingleQuote | LexKind::DoubleQuote) {
                        let quoted = self.read_quoted_string();
                        pieces.push(Segment::QuotedString(quoted));
                    } else {
                        self.bump_into(&mut pieces);
                    }
                }
            }
        }
    }

    fn check_declaration_attribute(
        &mut self,
        attribute: &Attribute,
        index: usize,
        seen_standalone: &mut bool,
    ) {
        let name = attribute.name();
        let name_span = name.span();
        match index {
            0 => {
                if !name.matches_str("version") {
                    self.report(IssueKind::ExpectedDeclarationVersionAttribute, name_span);
                } else if let Some(value) = attribute.value() {
                    if value.unquoted_string() != "1.0" {
                        self.report(
                            IssueKind::InvalidDeclarationVersionAttributeValue,
                            value.span(),
                        );
                    }
                }
            }
            1 => {
                if name.matches_str("standalone") {
                    *seen_standalone = true;
                    self.check_standalone_value(attribute);
                } else if !name.matches_str("encoding") {
                    self.report(
                        IssueKind::ExpectedDeclarationEncodingOrStandaloneAttributeOrRightQuestionMark,
                        name_span,
                    );
                }
            }
            2 if !*seen_standalone => {
                if name.matches_str("standalone") {
                    *seen_standalone = true;
                    self.check_standalone_value(attribute);
                } else {
                    self.report(
                        IssueKind::ExpectedDeclarationStandaloneAttributeOrRightQuestionMark,
                        name_span,
                    );
                }
            }
            _ => self.report(IssueKind::ExpectedDeclarationRightQuestionMark, name_span),
        }
    }

    fn check_standalone_value(&mut self, attribute: &Attribute) {
        if let Some(value) = attribute.value() {
            let text = value.unquoted_string();
            if text != "yes" && text != "no" {
                self.report(
                    IssueKind::InvalidDeclarationStandaloneAttributeValue,
                    value.span(),
                );
            }
        }
    }

    /// Read the rest of a processing instruction; `<`, `?` and the target
    /// name are already among the pieces. The content is opaque; only a
    /// `?` directly followed by `>` closes cleanly. A bare `>` closes with
    /// a diagnostic.
    fn read_processing_instruction(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        loop {
            match self.peek_kind() {
                None => {
                    self.report(
                        IssueKind::MissingProcessingInstructionRightQuestionMark,
                        open_span,
                    );
                    return Segment::ProcessingInstruction(Tag::new(pieces, false));
                }
                Some(LexKind::QuestionMark) => {
                    self.bump_into(&mut pieces);
                    match self.peek_kind() {
                        Some(LexKind::RightAngleBracket) => {
                            self.bump_into(&mut pieces);
                            return Segment::ProcessingInstruction(Tag::new(pieces, true));
                        }
                        None => {
                            self.report(
                                IssueKind::MissingProcessingInstructionRightAngleBracket,
                                open_span,
                            );
                            return Segment::ProcessingInstruction(Tag::new(pieces, false));
                        }
                        // the question mark was content
                        Some(_) => {}
                    }
                }
                Some(LexKind::RightAngleBracket) => {
                    self.report_at_peek(IssueKind::ExpectedProcessingInstructionRightQuestionMark);
                    self.bump_into(&mut pieces);
                    return Segment::ProcessingInstruction(Tag::new(pieces, true));
                }
                Some(_) => self.bump_into(&mut pieces),
            }
        }
    }

    /// Read the rest of a `<!DOCTYPE …>`; `<`, `!` and the `DOCTYPE` name
    /// are already among the pieces.
    fn read_doctype(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        // what the next name would mean
        #[derive(PartialEq)]
        enum Stage {
            RootName,
            ExternalId,
            Rest,
        }
        let mut stage = Stage::RootName;
        loop {
            match self.peek_kind() {
                None => {
                    if stage == Stage::RootName {
                        self.report(IssueKind::MissingDoctypeRootElementName, open_span);
                    }
                    self.report(IssueKind::MissingDoctypeRightAngleBracket, open_span);
                    return Segment::Doctype(Tag::new(pieces, false));
                }
                Some(LexKind::Whitespace) | Some(LexKind::NewLine) => {
                    self.bump_into(&mut pieces);
                }
                Some(LexKind::RightAngleBracket) => {
                    if stage == Stage::RootName {
                        self.report_at_peek(IssueKind::ExpectedDoctypeRootElementName);
                    }
                    self.bump_into(&mut pieces);
                    return Segment::Doctype(Tag::new(pieces, true));
                }
                Some(LexKind::LeftSquareBracket) => {
                    if stage == Stage::RootName {
                        self.report_at_peek(IssueKind::ExpectedDoctypeRootElementName);
                    }
                    let definition = self.read_internal_definition();
                    pieces.push(Segment::InternalDefinition(definition));
                    stage = Stage::Rest;
                }
                Some(kind) if kind.is_name_start() => match stage {
                    Stage::RootName => {
                        let name = self.read_name();
                        pieces.push(Segment::Name(name));
                        stage = Stage::ExternalId;
                    }
                    Stage::ExternalId => {
                        let keyword = self.read_name();
                        let is_system = keyword.is_exactly("SYSTEM");
                        let is_public = keyword.is_exactly("PUBLIC");
                        if !is_system && !is_public {
                            self.report(IssueKind::InvalidDoctypeExternalIdType, keyword.span());
                        }
                        pieces.push(Segment::Name(keyword));
                        if is_public {
                            self.read_doctype_identifier(
                                &mut pieces,
                                open_span,
                                IssueKind::MissingDoctypePublicIdentifier,
                                IssueKind::ExpectedDoctypePublicIdentifier,
                            );
                        }
                        if is_public || is_system {
                            self.read_doctype_identifier(
                                &mut pieces,
                                open_span,
                                IssueKind::MissingDoctypeSystemIdentifier,
                                IssueKind::ExpectedDoctypeSystemIdentifier,
                            );
                        }
                        stage = Stage::Rest;
                    }
                    Stage::Rest => {
                        let name = self.read_name();
                        self.report(IssueKind::ExpectedDoctypeRightAngleBracket, name.span());
                        pieces.push(Segment::Name(name));
                    }
                },
                Some(kind) => {
                    let issue = if stage == Stage::RootName {
                        IssueKind::ExpectedDoctypeRootElementName
                    } else {
                        IssueKind::ExpectedDoctypeRightAngleBracket
                    };
                    self.report_at_peek(issue);
                    if matches!(kind, LexKind::SingleQuote | LexKind::DoubleQuote) {
                        let quoted = self.read_quoted_string();
                        pieces.push(Segment::QuotedString(quoted));
                    } else {
                        self.bump_into(&mut pieces);
                    }
                }
            }
        }
    }

    /// Read one quoted external identifier after `PUBLIC` or `SYSTEM`,
    /// reporting when it is not there. An unexpected lex is left in place
    /// for the DOCTYPE loop.
    fn read_doctype_identifier(
        &mut self,
        pieces: &mut Vec<Segment>,
        open_span: Span,
        missing: IssueKind,
        expected: IssueKind,
    ) {
        while let Some(LexKind::Whitespace) | Some(LexKind::NewLine) = self.peek_kind() {
            self.bump_into(pieces);
        }
        match self.peek_kind() {
            Some(LexKind::SingleQuote) | Some(LexKind::DoubleQuote) => {
                let quoted = self.read_quoted_string();
                pieces.push(Segment::QuotedString(quoted));
            }
            None => self.report(missing, open_span),
            Some(_) => self.report_at_peek(expected),
        }
    }

    /// Read a `[…]` internal subset. Content is opaque except that nested
    /// square brackets balance and quoted strings are read whole.
    fn read_internal_definition(&mut self) -> InternalDefinition {
        let open = self.bump();
        let open_span = open.span();
        let mut pieces = vec![Segment::Lex(open)];
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                None => {
                    self.report(IssueKind::MissingInternalDefinitionRightSquareBracket, open_span);
                    return InternalDefinition {
                        pieces,
                        closed: false,
                    };
                }
                Some(LexKind::RightSquareBracket) => {
                    self.bump_into(&mut pieces);
                    if depth == 0 {
                        return InternalDefinition {
                            pieces,
                            closed: true,
                        };
                    }
                    depth -= 1;
                }
                Some(LexKind::LeftSquareBracket) => {
                    self.bump_into(&mut pieces);
                    depth += 1;
                }
                Some(LexKind::SingleQuote) | Some(LexKind::DoubleQuote) => {
                    let quoted = self.read_quoted_string();
                    pieces.push(Segment::QuotedString(quoted));
                }
                Some(_) => self.bump_into(&mut pieces),
            }
        }
    }

    /// Read the rest of a comment; `<` and `!` are among the pieces and
    /// the current lex is the first dash.
    fn read_comment(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        self.bump_into(&mut pieces);
        match self.peek_kind() {
            Some(LexKind::Dash) => self.bump_into(&mut pieces),
            None => {
                self.report(IssueKind::MissingCommentSecondStartDash, open_span);
                return self.finish_unrecognized(pieces, open_span);
            }
            Some(_) => {
                self.report_at_peek(IssueKind::ExpectedCommentSecondStartDash);
                return self.finish_unrecognized(pieces, open_span);
            }
        }
        // content; a `>` preceded by at least two dashes closes
        let mut dash_run = 0usize;
        loop {
            match self.peek_kind() {
                None => {
                    let kind = match dash_run {
                        0 => IssueKind::MissingCommentClosingDashes,
                        1 => IssueKind::MissingCommentSecondClosingDash,
                        _ => IssueKind::MissingCommentRightAngleBracket,
                    };
                    self.report(kind, open_span);
                    return Segment::Comment(Tag::new(pieces, false));
                }
                Some(LexKind::Dash) => {
                    self.bump_into(&mut pieces);
                    dash_run += 1;
                }
                Some(LexKind::RightAngleBracket) if dash_run >= 2 => {
                    self.bump_into(&mut pieces);
                    return Segment::Comment(Tag::new(pieces, true));
                }
                Some(_) => {
                    self.bump_into(&mut pieces);
                    dash_run = 0;
                }
            }
        }
    }

    /// Read the rest of a CDATA section; `<`, `!` and `[` are already
    /// among the pieces.
    fn read_cdata(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        match self.peek_kind() {
            Some(kind) if kind.is_name_start() => {
                let name = self.read_name();
                if name.is_exactly("CDATA") {
                    pieces.push(Segment::Name(name));
                } else {
                    self.report(IssueKind::ExpectedCdataName, name.span());
                    pieces.push(Segment::Name(name));
                    return self.finish_unrecognized(pieces, open_span);
                }
            }
            None => {
                self.report(IssueKind::MissingCdataName, open_span);
                return self.finish_unrecognized(pieces, open_span);
            }
            Some(_) => {
                self.report_at_peek(IssueKind::ExpectedCdataName);
                return self.finish_unrecognized(pieces, open_span);
            }
        }
        match self.peek_kind() {
            Some(LexKind::LeftSquareBracket) => self.bump_into(&mut pieces),
            None => {
                self.report(IssueKind::MissingCdataSecondLeftSquareBracket, open_span);
                return self.finish_unrecognized(pieces, open_span);
            }
            Some(_) => {
                self.report_at_peek(IssueKind::ExpectedCdataSecondLeftSquareBracket);
                return self.finish_unrecognized(pieces, open_span);
            }
        }
        // content; a `>` preceded by at least two `]` closes
        let mut bracket_run = 0usize;
        loop {
            match self.peek_kind() {
                None => {
                    let kind = match bracket_run {
                        0 => IssueKind::MissingCdataClosingRightSquareBrackets,
                        1 => IssueKind::MissingCdataSecondRightSquareBracket,
                        _ => IssueKind::MissingCdataRightAngleBracket,
                    };
                    self.report(kind, open_span);
                    return Segment::Cdata(Tag::new(pieces, false));
                }
                Some(LexKind::RightSquareBracket) => {
                    self.bump_into(&mut pieces);
                    bracket_run += 1;
                }
                Some(LexKind::RightAngleBracket) if bracket_run >= 2 => {
                    self.bump_into(&mut pieces);
                    return Segment::Cdata(Tag::new(pieces, true));
                }
                Some(_) => {
                    self.bump_into(&mut pieces);
                    bracket_run = 0;
                }
            }
        }
    }

    /// Absorb everything up to a `>` or end of input into an unrecognized
    /// tag, reading quoted strings whole.
    fn finish_unrecognized(&mut self, mut pieces: Vec<Segment>, open_span: Span) -> Segment {
        loop {
            match self.peek_kind() {
                None => {
                    self.report(IssueKind::MissingTagRightAngleBracket, open_span);
                    return Segment::UnrecognizedTag(Tag::new(pieces, false));
                }
                Some(LexKind::RightAngleBracket) => {
                    self.bump_into(&mut pieces);
                    return Segment::UnrecognizedTag(Tag::new(pieces, true));
                }
                Some(LexKind::SingleQuote) | Some(LexKind::DoubleQuote) => {
                    let quoted = self.read_quoted_string();
                    pieces.push(Segment::QuotedString(quoted));
                }
                Some(_) => self.bump_into(&mut pieces),
            }
        }
    }

    /// Read one attribute: `name [ws] [= [ws] value] [ws]`. The caller has
    /// checked the current lex starts a name. When the name directly
    /// follows a previous attribute, `missing_whitespace_before` makes the
    /// reader report that against this attribute's name.
    fn read_attribute(&mut self, missing_whitespace_before: bool) -> Attribute {
        let name = self.read_name();
        let name_span = name.span();
        if missing_whitespace_before {
            self.report(IssueKind::ExpectedWhitespaceBetweenAttributes, name_span);
        }
        let mut pieces = vec![Segment::Name(name)];
        while let Some(LexKind::Whitespace) | Some(LexKind::NewLine) = self.peek_kind() {
            self.bump_into(&mut pieces);
        }
        match self.peek_kind() {
            Some(LexKind::Equals) => {
                let equals = self.bump();
                let equals_span = equals.span();
                pieces.push(Segment::Lex(equals));
                while let Some(LexKind::Whitespace) | Some(LexKind::NewLine) = self.peek_kind() {
                    self.bump_into(&mut pieces);
                }
                match self.peek_kind() {
                    Some(LexKind::SingleQuote) | Some(LexKind::DoubleQuote) => {
                        let quoted = self.read_quoted_string();
                        pieces.push(Segment::QuotedString(quoted));
                        // trailing whitespace on the same line belongs to
                        // the attribute; a newline stays with the tag
                        while let Some(LexKind::Whitespace) = self.peek_kind() {
                            self.bump_into(&mut pieces);
                        }
                    }
                    None => self.report(IssueKind::MissingAttributeValue, equals_span),
                    Some(_) => self.report_at_peek(IssueKind::ExpectedAttributeValue),
                }
            }
            None => self.report(IssueKind::MissingAttributeEqualsSign, name_span),
            Some(_) => self.report_at_peek(IssueKind::ExpectedAttributeEqualsSign),
        }
        Attribute::new(pieces)
    }
}

impl<'a, 'i> Iterator for Tokenizer<'a, 'i> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        match self.peek_kind()? {
            LexKind::LeftAngleBracket => Some(self.read_tag()),
            LexKind::NewLine => Some(Segment::Lex(self.bump())),
            _ => Some(Segment::Text(self.read_text())),
        }
    }
}
