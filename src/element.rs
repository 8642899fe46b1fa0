use std::fmt;

use crate::issue::IssueKind;
use crate::name::Name;
use crate::segment::{Attribute, Segment, Tag};
use crate::span::Span;
use crate::tokenizer::Tokenizer;

/// An element: a start tag, the segments between it and its end tag, and
/// the end tag itself when one was found.
///
/// A mismatched end tag still closes the element; the mismatch lives in
/// the issue list, not in the tree shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) start_tag: Tag,
    pub(crate) children: Vec<Segment>,
    pub(crate) end_tag: Option<Tag>,
}

impl Element {
    /// The start tag of the element.
    pub fn start_tag(&self) -> &Tag {
        &self.start_tag
    }

    /// The child segments between the start and end tags.
    pub fn children(&self) -> &[Segment] {
        &self.children
    }

    /// The end tag, when one was found.
    pub fn end_tag(&self) -> Option<&Tag> {
        self.end_tag.as_ref()
    }

    /// The element name, from its start tag.
    pub fn name(&self) -> Option<&Name> {
        self.start_tag.name()
    }

    /// The attributes of the element, from its start tag.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.start_tag.attributes()
    }

    /// Get an attribute by name, compared case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.start_tag.attribute(name)
    }

    /// The start offset of the element, which is its start tag's.
    pub fn start(&self) -> usize {
        self.start_tag.start()
    }

    /// The offset one past the last byte of the element: the end tag's
    /// when present, otherwise the last child's or the start tag's.
    pub fn after_end(&self) -> usize {
        if let Some(end_tag) = &self.end_tag {
            end_tag.after_end()
        } else if let Some(last) = self.children.last() {
            last.after_end()
        } else {
            self.start_tag.after_end()
        }
    }

    /// The span the element covers.
    pub fn span(&self) -> Span {
        Span::new(self.start(), self.after_end() - self.start())
    }

    /// An element follows the tag rule, keyed on its end tag: with a
    /// closed end tag it contains the strict inside of its span, otherwise
    /// it is open ended on the right.
    pub fn contains_index(&self, index: usize) -> bool {
        let closed = self.end_tag.as_ref().map(|tag| tag.closed).unwrap_or(false);
        if closed {
            index > self.start() && index < self.after_end()
        } else {
            index > self.start()
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.start_tag.fmt(f)?;
        for child in &self.children {
            child.fmt(f)?;
        }
        if let Some(end_tag) = &self.end_tag {
            end_tag.fmt(f)?;
        }
        Ok(())
    }
}

/// Layers element nesting over the segment stream: every start tag opens
/// an element that accumulates children until an end tag or the end of the
/// stream, recursively.
pub struct ElementBuilder<'a, 'i> {
    tokenizer: Tokenizer<'a, 'i>,
}

impl<'a, 'i> ElementBuilder<'a, 'i> {
    /// Create a builder over the given tokenizer.
    pub fn new(tokenizer: Tokenizer<'a, 'i>) -> Self {
        ElementBuilder { tokenizer }
    }

    pub(crate) fn report(&mut self, kind: IssueKind, span: Span) {
        self.tokenizer.report(kind, span);
    }

    fn build_element(&mut self, start_tag: Tag) -> Element {
        let mut children = Vec::new();
        loop {
            match self.tokenizer.next() {
                None => {
                    let span = start_tag
                        .name()
                        .map(|name| name.span())
                        .unwrap_or_else(|| start_tag.span());
                    self.report(IssueKind::MissingElementEndTag, span);
                    return Element {
                        start_tag,
                        children,
                        end_tag: None,
                    };
                }
                Some(Segment::EndTag(end_tag)) => {
                    // any end tag closes this element; the wrong name is
                    // an issue, not an open element
                    let matched = match (start_tag.name(), end_tag.name()) {
                        (Some(start_name), Some(end_name)) => start_name.matches(end_name),
                        _ => false,
                    };
                    if !matched {
                        let span = end_tag
                            .name()
                            .map(|name| name.span())
                            .unwrap_or_else(|| end_tag.span());
                        self.report(IssueKind::ExpectedElementEndTagWithDifferentName, span);
                    }
                    return Element {
                        start_tag,
                        children,
                        end_tag: Some(end_tag),
                    };
                }
                Some(Segment::StartTag(tag)) => {
                    let element = self.build_element(tag);
                    children.push(Segment::Element(element));
                }
                Some(segment) => children.push(segment),
            }
        }
    }
}

impl<'a, 'i> Iterator for ElementBuilder<'a, 'i> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        match self.tokenizer.next()? {
            Segment::StartTag(tag) => Some(Segment::Element(self.build_element(tag))),
            segment => Some(segment),
        }
    }
}
