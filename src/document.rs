use std::fmt;

use crate::element::ElementBuilder;
use crate::issue::{Issue, IssueKind};
use crate::pretty::{format_segments, FormatOptions};
use crate::segment::{Segment, Tag};
use crate::span::Span;
use crate::tokenizer::Tokenizer;

/// A parsed document: the ordered top-level segments and every issue the
/// parse produced, in detection order.
///
/// The segments reproduce the input verbatim through `Display`, malformed
/// input included, so the document is always enough to get the source
/// back.
///
/// ```
/// use loxt::Document;
///
/// let document = Document::parse("<greeting>hi</greeting>");
/// assert!(document.issues().is_empty());
/// assert_eq!(document.to_string(), "<greeting>hi</greeting>");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    segments: Vec<Segment>,
    issues: Vec<Issue>,
}

impl Document {
    /// Parse source text into a document.
    ///
    /// This cannot fail: defects become [`Issue`] values and the damaged
    /// constructs still come out as segments.
    pub fn parse(source: &str) -> Document {
        let mut issues = Vec::new();
        let mut segments = Vec::new();
        let mut checker = RootChecker::default();
        let mut builder = ElementBuilder::new(Tokenizer::new(source, Some(&mut issues)));
        while let Some(segment) = builder.next() {
            checker.check(&segment, &mut builder);
            segments.push(segment);
        }
        checker.finish(&mut builder);
        drop(builder);
        Document { segments, issues }
    }

    /// The top-level segments, in document order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Every issue the parse produced, in detection order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// The prolog: the longest prefix of segments holding only the
    /// declaration, DOCTYPE, processing instructions, comments and
    /// whitespace. Absent when that prefix is empty.
    pub fn prolog(&self) -> Option<&[Segment]> {
        let end = self
            .segments
            .iter()
            .position(|segment| {
                !matches!(
                    segment,
                    Segment::Declaration(_)
                        | Segment::Doctype(_)
                        | Segment::ProcessingInstruction(_)
                        | Segment::Comment(_)
                ) && !segment.is_whitespace()
            })
            .unwrap_or(self.segments.len());
        if end == 0 {
            None
        } else {
            Some(&self.segments[..end])
        }
    }

    /// The `<?xml …?>` declaration, when present.
    pub fn declaration(&self) -> Option<&Tag> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Declaration(tag) => Some(tag),
            _ => None,
        })
    }

    /// The `<!DOCTYPE …>`, when present.
    pub fn doctype(&self) -> Option<&Tag> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Doctype(tag) => Some(tag),
            _ => None,
        })
    }

    /// The root element: the first element or empty element at top level.
    pub fn root(&self) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|segment| matches!(segment, Segment::Element(_) | Segment::EmptyElement(_)))
    }

    /// Pretty-print the document.
    pub fn format(&self, options: &FormatOptions) -> String {
        format_segments(&self.segments, options)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            segment.fmt(f)?;
        }
        Ok(())
    }
}

/// The root-level well-formedness rules, run segment by segment as the
/// stream arrives so issues keep detection order.
#[derive(Default)]
struct RootChecker {
    seen_non_declaration: bool,
    seen_declaration: bool,
    seen_doctype: bool,
    doctype_span: Option<Span>,
    seen_root: bool,
    has_content: bool,
}

impl RootChecker {
    fn check(&mut self, segment: &Segment, builder: &mut ElementBuilder<'_, '_>) {
        match segment {
            Segment::Declaration(tag) => {
                // a declaration after another declaration is the
                // one-declaration rule's business, not this one's
                if self.seen_non_declaration {
                    builder.report(IssueKind::DocumentDeclarationMustBeFirstSegment, tag.span());
                }
                if self.seen_declaration {
                    builder.report(IssueKind::DocumentCanHaveOneDeclaration, tag.span());
                } else {
                    if let Some(doctype_span) = self.doctype_span {
                        builder.report(
                            IssueKind::DocumentDoctypeMustBeAfterDeclaration,
                            doctype_span,
                        );
                    }
                    self.seen_declaration = true;
                }
            }
            Segment::Doctype(tag) => {
                if self.seen_doctype {
                    builder.report(IssueKind::DocumentCanHaveOneDoctype, tag.span());
                } else {
                    self.seen_doctype = true;
                    self.doctype_span = Some(tag.span());
                }
            }
            Segment::Element(_) | Segment::EmptyElement(_) => {
                if self.seen_root {
                    builder.report(IssueKind::DocumentCanHaveOneRootElement, segment.span());
                } else {
                    self.seen_root = true;
                }
            }
            Segment::Text(text) => {
                if let Some(span) = text.non_whitespace_span() {
                    builder.report(IssueKind::DocumentCannotHaveTextAtRootLevel, span);
                }
            }
            Segment::Cdata(tag) => {
                builder.report(IssueKind::DocumentCannotHaveCdataAtRootLevel, tag.span());
            }
            _ => {}
        }
        if !matches!(segment, Segment::Declaration(_)) {
            self.seen_non_declaration = true;
        }
        if !segment.is_whitespace() {
            self.has_content = true;
        }
    }

    fn finish(&mut self, builder: &mut ElementBuilder<'_, '_>) {
        if !self.has_content {
            builder.report(IssueKind::MissingDocumentRootElement, Span::new(0, 0));
        }
    }
}
