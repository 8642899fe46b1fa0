use crate::element::Element;
use crate::lex::LexKind;
use crate::segment::{Attribute, Segment, Tag, Text};

/// Options for pretty-printing.
///
/// The defaults produce two-space indentation with `\n` newlines and no
/// attribute alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// One level of indentation. Defaults to two spaces.
    pub single_indent: String,
    /// How many columns a tab advances. Only consulted when
    /// `single_indent` is a tab and attributes are aligned. Defaults to 2.
    pub tab_length: usize,
    /// The newline the formatter inserts. Defaults to `"\n"`.
    pub newline: String,
    /// The indentation the output starts at. Defaults to empty.
    pub current_indent: String,
    /// The column the output starts at. Defaults to 0.
    pub current_column_index: usize,
    /// Align continuation lines inside a tag to the column of its first
    /// attribute. Defaults to off.
    pub align_attributes: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            single_indent: "  ".to_string(),
            tab_length: 2,
            newline: "\n".to_string(),
            current_indent: String::new(),
            current_column_index: 0,
            align_attributes: false,
        }
    }
}

/// The formatter: the output string, the indent stack and the column
/// counter. A newline resets the column to 0, a tab advances it by the tab
/// length, anything else by one; attribute alignment consults the same
/// counter, so the two always agree.
struct Formatter<'o> {
    options: &'o FormatOptions,
    out: String,
    indents: Vec<String>,
    column: usize,
}

impl<'o> Formatter<'o> {
    fn new(options: &'o FormatOptions) -> Self {
        Formatter {
            out: String::new(),
            indents: vec![options.current_indent.clone()],
            column: options.current_column_index,
            options,
        }
    }

    fn write(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\n' => self.column = 0,
                '\t' => self.column += self.options.tab_length,
                _ => self.column += 1,
            }
        }
        self.out.push_str(text);
    }

    fn write_newline(&mut self) {
        let newline = self.options.newline.clone();
        self.write(&newline);
    }

    fn write_indent(&mut self) {
        let indent = self
            .indents
            .last()
            .expect("indent stack is never empty")
            .clone();
        self.write(&indent);
    }

    fn push_indent(&mut self) {
        let indent = format!(
            "{}{}",
            self.indents.last().expect("indent stack is never empty"),
            self.options.single_indent
        );
        self.indents.push(indent);
    }

    /// Push an indent whose width is the current column, for attribute
    /// alignment. With a tab indent the column is materialized as tabs
    /// followed by the leftover spaces.
    fn push_column_indent(&mut self) {
        let column = self.column;
        let indent = if self.options.single_indent == "\t" {
            let tabs = column / self.options.tab_length;
            let spaces = column % self.options.tab_length;
            format!("{}{}", "\t".repeat(tabs), " ".repeat(spaces))
        } else {
            " ".repeat(column)
        };
        self.indents.push(indent);
    }

    fn pop_indent(&mut self) {
        self.indents.pop();
    }

    fn ends_with_newline(&self) -> bool {
        self.out.ends_with('\n')
    }
}

/// Format a whole document: whitespace-only text drops out, top-level
/// newlines pass through verbatim, and everything else is separated by a
/// newline unless the output already ends in one.
pub(crate) fn format_segments(segments: &[Segment], options: &FormatOptions) -> String {
    let mut f = Formatter::new(options);
    for segment in segments {
        match segment {
            Segment::Text(text) if text.is_whitespace() => {}
            Segment::Lex(lex) if lex.kind == LexKind::NewLine => {
                f.write(&lex.text);
            }
            _ => {
                if !f.out.is_empty() && !f.ends_with_newline() {
                    f.write_newline();
                }
                format_segment(segment, &mut f);
            }
        }
    }
    f.out
}

impl Segment {
    /// Pretty-print this segment on its own.
    pub fn format(&self, options: &FormatOptions) -> String {
        let mut f = Formatter::new(options);
        format_segment(self, &mut f);
        f.out
    }
}

fn format_segment(segment: &Segment, f: &mut Formatter<'_>) {
    match segment {
        Segment::Element(element) => format_element(element, f),
        Segment::StartTag(tag)
        | Segment::EmptyElement(tag)
        | Segment::EndTag(tag)
        | Segment::UnrecognizedTag(tag)
        | Segment::Declaration(tag)
        | Segment::Doctype(tag) => format_tag(tag, false, f),
        // no internal reflow
        Segment::Comment(tag) | Segment::Cdata(tag) | Segment::ProcessingInstruction(tag) => {
            let raw = tag.to_string();
            f.write(&raw);
        }
        Segment::Text(text) => {
            let trimmed = trimmed_text(text);
            f.write(&trimmed);
        }
        other => {
            let raw = other.to_string();
            f.write(&raw);
        }
    }
}

/// The text of a run with leading and trailing whitespace lexes dropped;
/// inner whitespace stays verbatim.
fn trimmed_text(text: &Text) -> String {
    let lexes = text.lexes();
    let first = match lexes.iter().position(|lex| !lex.kind.is_whitespace()) {
        Some(first) => first,
        None => return String::new(),
    };
    let last = lexes
        .iter()
        .rposition(|lex| !lex.kind.is_whitespace())
        .expect("a non-whitespace lex exists");
    lexes[first..=last]
        .iter()
        .map(|lex| lex.text.as_str())
        .collect()
}

/// Structural punctuation attaches directly, never after an inserted
/// space.
fn is_structural(kind: LexKind) -> bool {
    matches!(
        kind,
        LexKind::LeftAngleBracket
            | LexKind::RightAngleBracket
            | LexKind::ForwardSlash
            | LexKind::QuestionMark
            | LexKind::ExclamationPoint
            | LexKind::LeftSquareBracket
            | LexKind::RightSquareBracket
    )
}

/// Walk the tag's pieces: newlines pass through verbatim followed by the
/// current indent, other whitespace collapses to a single space where
/// content follows, and never before the closing `>`. With `collapse` the
/// closing `>` becomes `/>`, which is how an empty element's start tag
/// absorbs its end tag.
fn format_tag(tag: &Tag, collapse: bool, f: &mut Formatter<'_>) {
    let mut pending_space = false;
    let mut at_line_start = false;
    let mut pushed_align = false;
    for piece in tag.pieces() {
        match piece {
            Segment::Lex(lex) => match lex.kind {
                LexKind::Whitespace => pending_space = true,
                LexKind::NewLine => {
                    f.write(&lex.text);
                    f.write_indent();
                    pending_space = false;
                    at_line_start = true;
                }
                LexKind::RightAngleBracket => {
                    f.write(if collapse { "/>" } else { ">" });
                    pending_space = false;
                    at_line_start = false;
                }
                kind if is_structural(kind) => {
                    f.write(&lex.text);
                    pending_space = false;
                    at_line_start = false;
                }
                _ => {
                    if pending_space && !at_line_start {
                        f.write(" ");
                    }
                    f.write(&lex.text);
                    pending_space = false;
                    at_line_start = false;
                }
            },
            Segment::Attribute(attribute) => {
                if pending_space && !at_line_start {
                    f.write(" ");
                }
                pending_space = false;
                at_line_start = false;
                if f.options.align_attributes && !pushed_align {
                    f.push_column_indent();
                    pushed_align = true;
                }
                format_attribute(attribute, f);
                // whitespace the attribute absorbed after its value
                // separates it from whatever follows
                pending_space = attribute.has_trailing_whitespace();
            }
            other => {
                if pending_space && !at_line_start {
                    f.write(" ");
                }
                pending_space = false;
                at_line_start = false;
                let raw = other.to_string();
                f.write(&raw);
            }
        }
    }
    if pushed_align {
        f.pop_indent();
    }
}

/// An attribute formats as `name`, `name=` or `name=value`; the whitespace
/// it absorbed around the equals sign and after the value drops out.
fn format_attribute(attribute: &Attribute, f: &mut Formatter<'_>) {
    let name = attribute.name().to_string();
    f.write(&name);
    if attribute.equals().is_some() {
        f.write("=");
    }
    if let Some(value) = attribute.value() {
        let raw = value.to_string();
        f.write(&raw);
    }
}

fn format_element(element: &Element, f: &mut Formatter<'_>) {
    let children = element.children();
    let content: Vec<&Segment> = children
        .iter()
        .filter(|child| !child.is_whitespace())
        .collect();

    if content.is_empty() {
        let end_matches = match (
            element.start_tag().name(),
            element.end_tag().and_then(|tag| tag.name()),
        ) {
            (Some(start_name), Some(end_name)) => start_name.matches(end_name),
            _ => false,
        };
        if end_matches && element.start_tag().is_closed() {
            // <a></a> collapses to <a/>
            format_tag(element.start_tag(), true, f);
        } else {
            format_tag(element.start_tag(), false, f);
            if let Some(end_tag) = element.end_tag() {
                format_tag(end_tag, false, f);
            }
        }
        return;
    }

    if content.len() == 1 {
        if let Segment::Text(text) = content[0] {
            let trimmed = trimmed_text(text);
            if !trimmed.is_empty() {
                format_tag(element.start_tag(), false, f);
                f.write(&trimmed);
                if let Some(end_tag) = element.end_tag() {
                    format_tag(end_tag, false, f);
                }
                return;
            }
        }
    }

    format_tag(element.start_tag(), false, f);
    f.push_indent();
    let mut newline_run = 0usize;
    for child in children {
        match child {
            Segment::Lex(lex) if lex.kind == LexKind::NewLine => {
                newline_run += 1;
            }
            child if child.is_whitespace() => {}
            child => {
                // one separating newline, plus one per extra blank source line
                f.write_newline();
                for _ in 1..newline_run.max(1) {
                    f.write_newline();
                }
                f.write_indent();
                format_segment(child, f);
                newline_run = 0;
            }
        }
    }
    f.pop_indent();
    f.write_newline();
    for _ in 1..newline_run.max(1) {
        f.write_newline();
    }
    f.write_indent();
    if let Some(end_tag) = element.end_tag() {
        format_tag(end_tag, false, f);
    }
}
