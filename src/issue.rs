use std::fmt;

use crate::span::Span;

/// How serious an issue is. Every issue the parser produces today is an
/// error; the type exists so the sink can carry other levels later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A well-formedness violation.
    Error,
}

/// Every defect the tokenizer, element builder and document builder can
/// report.
///
/// `Missing…` kinds mean the input ended before a required piece arrived;
/// `Expected…` kinds mean something else sat where the piece was required;
/// `Invalid…` kinds mean the piece was there with the wrong content;
/// `Document…` kinds are root-level well-formedness rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    // after `<`
    MissingNameQuestionMarkExclamationPointOrForwardSlash,
    ExpectedNameQuestionMarkExclamationPointOrForwardSlash,
    // after `<?`
    MissingDeclarationOrProcessingInstructionName,
    ExpectedDeclarationOrProcessingInstructionName,
    // after `<!`
    MissingDoctypeNameCommentDashesOrCdataLeftSquareBracket,
    ExpectedDoctypeNameCommentDashesOrCdataLeftSquareBracket,
    // start tags and empty-element tags
    ExpectedWhitespaceBetweenAttributes,
    ExpectedWhitespaceStartTagRightAngleBracketOrEmptyElementForwardSlash,
    ExpectedAttributeNameStartTagRightAngleBracketOrEmptyElementForwardSlash,
    ExpectedEmptyElementRightAngleBracket,
    MissingStartTagRightAngleBracket,
    MissingEmptyElementRightAngleBracket,
    // end tags
    MissingEndTagName,
    ExpectedEndTagName,
    ExpectedEndTagRightAngleBracket,
    MissingEndTagRightAngleBracket,
    // declarations
    MissingDeclarationVersionAttribute,
    ExpectedDeclarationVersionAttribute,
    InvalidDeclarationVersionAttributeValue,
    ExpectedDeclarationEncodingOrStandaloneAttributeOrRightQuestionMark,
    ExpectedDeclarationStandaloneAttributeOrRightQuestionMark,
    InvalidDeclarationStandaloneAttributeValue,
    ExpectedDeclarationRightQuestionMark,
    MissingDeclarationRightQuestionMark,
    ExpectedDeclarationRightAngleBracket,
    MissingDeclarationRightAngleBracket,
    // processing instructions
    ExpectedProcessingInstructionRightQuestionMark,
    MissingProcessingInstructionRightQuestionMark,
    MissingProcessingInstructionRightAngleBracket,
    // DOCTYPE
    MissingDoctypeRootElementName,
    ExpectedDoctypeRootElementName,
    InvalidDoctypeExternalIdType,
    MissingDoctypePublicIdentifier,
    ExpectedDoctypePublicIdentifier,
    MissingDoctypeSystemIdentifier,
    ExpectedDoctypeSystemIdentifier,
    MissingInternalDefinitionRightSquareBracket,
    ExpectedDoctypeRightAngleBracket,
    MissingDoctypeRightAngleBracket,
    // comments
    ExpectedCommentSecondStartDash,
    MissingCommentSecondStartDash,
    MissingCommentClosingDashes,
    MissingCommentSecondClosingDash,
    MissingCommentRightAngleBracket,
    // CDATA
    MissingCdataName,
    ExpectedCdataName,
    MissingCdataSecondLeftSquareBracket,
    ExpectedCdataSecondLeftSquareBracket,
    MissingCdataClosingRightSquareBrackets,
    MissingCdataSecondRightSquareBracket,
    MissingCdataRightAngleBracket,
    // attributes
    MissingAttributeEqualsSign,
    ExpectedAttributeEqualsSign,
    MissingAttributeValue,
    ExpectedAttributeValue,
    MissingQuotedStringEndQuote,
    // unrecognized tags
    MissingTagRightAngleBracket,
    // elements
    MissingElementEndTag,
    ExpectedElementEndTagWithDifferentName,
    // documents
    MissingDocumentRootElement,
    DocumentDeclarationMustBeFirstSegment,
    DocumentCanHaveOneDeclaration,
    DocumentDoctypeMustBeAfterDeclaration,
    DocumentCanHaveOneDoctype,
    DocumentCanHaveOneRootElement,
    DocumentCannotHaveTextAtRootLevel,
    DocumentCannotHaveCdataAtRootLevel,
}

impl IssueKind {
    /// The fixed message text for this kind.
    pub fn message(&self) -> &'static str {
        use IssueKind::*;
        match self {
            MissingNameQuestionMarkExclamationPointOrForwardSlash => {
                "missing name, '?', '!' or '/' after '<'"
            }
            ExpectedNameQuestionMarkExclamationPointOrForwardSlash => {
                "expected a name, '?', '!' or '/' after '<'"
            }
            MissingDeclarationOrProcessingInstructionName => {
                "missing declaration or processing instruction name after '<?'"
            }
            ExpectedDeclarationOrProcessingInstructionName => {
                "expected a declaration or processing instruction name after '<?'"
            }
            MissingDoctypeNameCommentDashesOrCdataLeftSquareBracket => {
                "missing 'DOCTYPE', comment dashes or CDATA '[' after '<!'"
            }
            ExpectedDoctypeNameCommentDashesOrCdataLeftSquareBracket => {
                "expected 'DOCTYPE', comment dashes or CDATA '[' after '<!'"
            }
            ExpectedWhitespaceBetweenAttributes => "expected whitespace between attributes",
            ExpectedWhitespaceStartTagRightAngleBracketOrEmptyElementForwardSlash => {
                "expected whitespace, start tag '>' or empty element '/'"
            }
            ExpectedAttributeNameStartTagRightAngleBracketOrEmptyElementForwardSlash => {
                "expected an attribute name, start tag '>' or empty element '/'"
            }
            ExpectedEmptyElementRightAngleBracket => "expected empty element '>' after '/'",
            MissingStartTagRightAngleBracket => "missing start tag '>'",
            MissingEmptyElementRightAngleBracket => "missing empty element '>'",
            MissingEndTagName => "missing end tag name",
            ExpectedEndTagName => "expected an end tag name",
            ExpectedEndTagRightAngleBracket => "expected end tag '>'",
            MissingEndTagRightAngleBracket => "missing end tag '>'",
            MissingDeclarationVersionAttribute => "missing declaration 'version' attribute",
            ExpectedDeclarationVersionAttribute => "expected declaration 'version' attribute",
            InvalidDeclarationVersionAttributeValue => {
                "declaration 'version' attribute value must be '1.0'"
            }
            ExpectedDeclarationEncodingOrStandaloneAttributeOrRightQuestionMark => {
                "expected declaration 'encoding' or 'standalone' attribute or '?>'"
            }
            ExpectedDeclarationStandaloneAttributeOrRightQuestionMark => {
                "expected declaration 'standalone' attribute or '?>'"
            }
            InvalidDeclarationStandaloneAttributeValue => {
                "declaration 'standalone' attribute value must be 'yes' or 'no'"
            }
            ExpectedDeclarationRightQuestionMark => "expected declaration '?'",
            MissingDeclarationRightQuestionMark => "missing declaration '?'",
            ExpectedDeclarationRightAngleBracket => "expected declaration '>' after '?'",
            MissingDeclarationRightAngleBracket => "missing declaration '>' after '?'",
            ExpectedProcessingInstructionRightQuestionMark => {
                "expected processing instruction '?' before '>'"
            }
            MissingProcessingInstructionRightQuestionMark => {
                "missing processing instruction '?'"
            }
            MissingProcessingInstructionRightAngleBracket => {
                "missing processing instruction '>' after '?'"
            }
            MissingDoctypeRootElementName => "missing DOCTYPE root element name",
            ExpectedDoctypeRootElementName => "expected a DOCTYPE root element name",
            InvalidDoctypeExternalIdType => {
                "DOCTYPE external id type must be 'PUBLIC' or 'SYSTEM'"
            }
            MissingDoctypePublicIdentifier => "missing DOCTYPE public identifier",
            ExpectedDoctypePublicIdentifier => "expected a quoted DOCTYPE public identifier",
            MissingDoctypeSystemIdentifier => "missing DOCTYPE system identifier",
            ExpectedDoctypeSystemIdentifier => "expected a quoted DOCTYPE system identifier",
            MissingInternalDefinitionRightSquareBracket => {
                "missing internal definition ']'"
            }
            ExpectedDoctypeRightAngleBracket => "expected DOCTYPE '>'",
            MissingDoctypeRightAngleBracket => "missing DOCTYPE '>'",
            ExpectedCommentSecondStartDash => "expected second comment start '-'",
            MissingCommentSecondStartDash => "missing second comment start '-'",
            MissingCommentClosingDashes => "missing comment closing '--'",
            MissingCommentSecondClosingDash => "missing second comment closing '-'",
            MissingCommentRightAngleBracket => "missing comment '>'",
            MissingCdataName => "missing 'CDATA' after '<!['",
            ExpectedCdataName => "expected 'CDATA' after '<!['",
            MissingCdataSecondLeftSquareBracket => "missing second CDATA '['",
            ExpectedCdataSecondLeftSquareBracket => "expected second CDATA '['",
            MissingCdataClosingRightSquareBrackets => "missing CDATA closing ']]'",
            MissingCdataSecondRightSquareBracket => "missing second CDATA closing ']'",
            MissingCdataRightAngleBracket => "missing CDATA '>'",
            MissingAttributeEqualsSign => "missing attribute '='",
            ExpectedAttributeEqualsSign => "expected attribute '='",
            MissingAttributeValue => "missing attribute value",
            ExpectedAttributeValue => "expected a quoted attribute value",
            MissingQuotedStringEndQuote => "missing quoted string end quote",
            MissingTagRightAngleBracket => "missing tag '>'",
            MissingElementEndTag => "missing element end tag",
            ExpectedElementEndTagWithDifferentName => {
                "element end tag name does not match its start tag name"
            }
            MissingDocumentRootElement => "document is missing a root element",
            DocumentDeclarationMustBeFirstSegment => {
                "a declaration must be the first segment of a document"
            }
            DocumentCanHaveOneDeclaration => "a document can have only one declaration",
            DocumentDoctypeMustBeAfterDeclaration => {
                "a DOCTYPE must come after the declaration"
            }
            DocumentCanHaveOneDoctype => "a document can have only one DOCTYPE",
            DocumentCanHaveOneRootElement => "a document can have only one root element",
            DocumentCannotHaveTextAtRootLevel => "a document cannot have text at root level",
            DocumentCannotHaveCdataAtRootLevel => "a document cannot have CDATA at root level",
        }
    }
}

/// A structured description of one defect in the input.
///
/// Issues never abort the parse; the tokenizer pushes them into the sink it
/// was given and produces a segment regardless. They arrive in document
/// order, once per defect, at the point of detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Issue {
    /// What went wrong.
    pub kind: IssueKind,
    /// Where it went wrong.
    pub span: Span,
}

impl Issue {
    pub(crate) fn new(kind: IssueKind, span: Span) -> Self {
        Issue { kind, span }
    }

    /// The severity of this issue.
    pub fn severity(&self) -> Severity {
        Severity::Error
    }

    /// The fixed message text for this issue.
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message(),
            self.span.start,
            self.span.after_end()
        )
    }
}
