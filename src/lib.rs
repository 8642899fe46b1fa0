//! Loxt is a fault-tolerant, lossless XML 1.0 parser and formatter built
//! for editor use.
//!
//! Every byte of input is classified, malformed constructs produce
//! [`Issue`] values with precise spans instead of aborting the parse, and
//! the resulting tree reproduces the input verbatim through `Display`:
//!
//! ```rust
//! use loxt::{parse, FormatOptions};
//!
//! let document = parse("<greeting kind=\"warm\">  hello  </greeting>");
//!
//! assert!(document.issues().is_empty());
//! assert_eq!(document.to_string(), "<greeting kind=\"warm\">  hello  </greeting>");
//! assert_eq!(
//!     document.format(&FormatOptions::default()),
//!     "<greeting kind=\"warm\">hello</greeting>"
//! );
//! ```
//!
//! Malformed input still parses; the damage is described instead of
//! thrown:
//!
//! ```rust
//! use loxt::parse;
//!
//! let document = parse("<a><b></a>");
//! assert_eq!(document.to_string(), "<a><b></a>");
//! assert!(!document.issues().is_empty());
//! ```

mod document;
mod element;
mod issue;
mod lex;
mod lexer;
mod name;
mod pretty;
mod schema;
mod segment;
mod span;
mod tokenizer;

pub use document::Document;
pub use element::{Element, ElementBuilder};
pub use issue::{Issue, IssueKind, Severity};
pub use lex::{Lex, LexKind};
pub use lexer::Lexer;
pub use name::Name;
pub use pretty::FormatOptions;
pub use schema::{AttributeSchema, ChildElementSchema, ElementSchema};
pub use segment::{
    Attribute, InternalDefinition, QuotedString, Segment, SegmentKind, Tag, Text,
};
pub use span::Span;
pub use tokenizer::Tokenizer;

/// Parse source text into a [`Document`].
///
/// This cannot fail; see [`Document::parse`].
pub fn parse(source: &str) -> Document {
    Document::parse(source)
}
