use loxt::{parse, Segment, SegmentKind, Tokenizer};

fn tokenize(xml: &str) -> Vec<Segment> {
    let mut issues = Vec::new();
    Tokenizer::new(xml, Some(&mut issues)).collect()
}

fn kinds(xml: &str) -> Vec<SegmentKind> {
    tokenize(xml).iter().map(|segment| segment.kind()).collect()
}

#[test]
fn test_start_tag() {
    let segments = tokenize(r#"<a b="c" d='e'>"#);
    assert_eq!(segments.len(), 1);
    let tag = segments[0].tag().unwrap();
    assert_eq!(segments[0].kind(), SegmentKind::StartTag);
    assert!(tag.is_closed());
    assert_eq!(tag.name().unwrap().text(), "a");
    let attributes: Vec<_> = tag.attributes().collect();
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes[0].name().text(), "b");
    assert_eq!(attributes[0].value().unwrap().unquoted_string(), "c");
    assert_eq!(attributes[1].name().text(), "d");
    assert_eq!(attributes[1].value().unwrap().unquoted_string(), "e");
}

#[test]
fn test_empty_element() {
    let segments = tokenize("<br/>");
    assert_eq!(kinds("<br/>"), [SegmentKind::EmptyElement]);
    assert!(segments[0].tag().unwrap().is_closed());
}

#[test]
fn test_end_tag() {
    let segments = tokenize("</a>");
    assert_eq!(segments[0].kind(), SegmentKind::EndTag);
    assert_eq!(segments[0].tag().unwrap().name().unwrap().text(), "a");
}

#[test]
fn test_text_and_newlines() {
    assert_eq!(
        kinds("one\ntwo"),
        [SegmentKind::Text, SegmentKind::Lex, SegmentKind::Text]
    );
}

#[test]
fn test_text_span() {
    let segments = tokenize("<a>  test  ");
    let text = match &segments[1] {
        Segment::Text(text) => text,
        other => panic!("expected text, got {:?}", other.kind()),
    };
    assert!(!text.is_whitespace());
    let span = text.non_whitespace_span().unwrap();
    assert_eq!((span.start, span.len), (5, 4));
}

#[test]
fn test_whitespace_only_text() {
    let segments = tokenize("   ");
    let text = match &segments[0] {
        Segment::Text(text) => text,
        other => panic!("expected text, got {:?}", other.kind()),
    };
    assert!(text.is_whitespace());
    assert!(text.non_whitespace_span().is_none());
}

#[test]
fn test_comment() {
    assert_eq!(kinds("<!-- a--b -->"), [SegmentKind::Comment]);
    let segments = tokenize("<!---->");
    assert!(segments[0].tag().unwrap().is_closed());
}

#[test]
fn test_comment_extra_dashes_close() {
    // three dashes before the > still terminate
    let segments = tokenize("<!--x--->");
    assert_eq!(segments[0].kind(), SegmentKind::Comment);
    assert!(segments[0].tag().unwrap().is_closed());
}

#[test]
fn test_cdata() {
    let segments = tokenize("<![CDATA[x]]>");
    assert_eq!(segments[0].kind(), SegmentKind::Cdata);
    assert!(segments[0].tag().unwrap().is_closed());
    assert_eq!(segments[0].to_string(), "<![CDATA[x]]>");
}

#[test]
fn test_cdata_name_is_case_sensitive() {
    let segments = tokenize("<![cdata[x]]>");
    assert_eq!(segments[0].kind(), SegmentKind::UnrecognizedTag);
}

#[test]
fn test_processing_instruction() {
    let segments = tokenize("<?php echo ?>");
    assert_eq!(segments[0].kind(), SegmentKind::ProcessingInstruction);
    assert_eq!(segments[0].tag().unwrap().name().unwrap().text(), "php");
    assert!(segments[0].tag().unwrap().is_closed());
}

#[test]
fn test_processing_instruction_question_mark_content() {
    // a lone ? inside the content does not close
    let segments = tokenize("<?pi a ? b ?>");
    assert_eq!(segments[0].kind(), SegmentKind::ProcessingInstruction);
    assert!(segments[0].tag().unwrap().is_closed());
    assert_eq!(segments[0].to_string(), "<?pi a ? b ?>");
}

#[test]
fn test_declaration_dispatch_is_exact() {
    assert_eq!(
        kinds("<?xml version=\"1.0\"?>"),
        [SegmentKind::Declaration]
    );
    // only the lowercase literal xml is a declaration
    assert_eq!(kinds("<?XML?>"), [SegmentKind::ProcessingInstruction]);
    assert_eq!(kinds("<?xmlx?>"), [SegmentKind::ProcessingInstruction]);
}

#[test]
fn test_doctype() {
    let segments = tokenize("<!DOCTYPE html>");
    assert_eq!(segments[0].kind(), SegmentKind::Doctype);
    let tag = segments[0].tag().unwrap();
    let names: Vec<_> = tag.names().map(|name| name.text()).collect();
    assert_eq!(names, ["DOCTYPE", "html"]);
}

#[test]
fn test_doctype_system() {
    let segments = tokenize(r#"<!DOCTYPE note SYSTEM "Note.dtd">"#);
    let tag = segments[0].tag().unwrap();
    let identifiers: Vec<_> = tag
        .quoted_strings()
        .map(|quoted| quoted.unquoted_string())
        .collect();
    assert_eq!(identifiers, ["Note.dtd"]);
    assert!(tag.is_closed());
}

#[test]
fn test_doctype_public() {
    let segments =
        tokenize(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0//EN" "xhtml1.dtd">"#);
    let tag = segments[0].tag().unwrap();
    assert_eq!(tag.quoted_strings().count(), 2);
    assert!(tag.is_closed());
}

#[test]
fn test_doctype_internal_definition() {
    let xml = r#"<!DOCTYPE doc [ <!ENTITY x "y"> ]>"#;
    let segments = tokenize(xml);
    let tag = segments[0].tag().unwrap();
    let definition = tag.internal_definition().unwrap();
    assert!(definition.is_closed());
    assert_eq!(definition.to_string(), r#"[ <!ENTITY x "y"> ]"#);
    assert!(tag.is_closed());
    assert_eq!(segments[0].to_string(), xml);
}

#[test]
fn test_internal_definition_nested_brackets() {
    let xml = "<!DOCTYPE d [ a [b] c ]>";
    let segments = tokenize(xml);
    let definition = segments[0].tag().unwrap().internal_definition().unwrap();
    assert_eq!(definition.to_string(), "[ a [b] c ]");
}

#[test]
fn test_unrecognized_tag() {
    assert_eq!(kinds("<@>"), [SegmentKind::UnrecognizedTag]);
}

#[test]
fn test_quoted_string_without_end_quote() {
    let segments = tokenize("<a b=\"c");
    let tag = segments[0].tag().unwrap();
    let value = tag.attributes().next().unwrap().value().unwrap();
    assert!(!value.has_end_quote());
    assert_eq!(value.unquoted_string(), "c");
}

#[test]
fn test_quoted_string_other_quote_is_content() {
    let segments = tokenize("<a b=\"it's\">");
    let tag = segments[0].tag().unwrap();
    let value = tag.attributes().next().unwrap().value().unwrap();
    assert!(value.has_end_quote());
    assert_eq!(value.unquoted_string(), "it's");
}

#[test]
fn test_attribute_shapes() {
    // name only
    let segments = tokenize("<a b>");
    let tag = segments[0].tag().unwrap();
    let attribute = tag.attributes().next().unwrap();
    assert!(attribute.equals().is_none());
    assert!(attribute.value().is_none());

    // name and equals, no value
    let segments = tokenize("<a b=>");
    let tag = segments[0].tag().unwrap();
    let attribute = tag.attributes().next().unwrap();
    assert!(attribute.equals().is_some());
    assert!(attribute.value().is_none());

    // padded equals
    let segments = tokenize("<a b = \"c\">");
    let tag = segments[0].tag().unwrap();
    let attribute = tag.attributes().next().unwrap();
    assert_eq!(attribute.value().unwrap().unquoted_string(), "c");
}

#[test]
fn test_declaration_attributes() {
    let mut issues = Vec::new();
    let segments: Vec<_> = Tokenizer::new(
        "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\" ?>",
        Some(&mut issues),
    )
    .collect();
    assert!(issues.is_empty());
    let tag = segments[0].tag().unwrap();
    assert_eq!(tag.version().unwrap().value().unwrap().unquoted_string(), "1.0");
    assert_eq!(tag.encoding().unwrap().value().unwrap().unquoted_string(), "utf-8");
    assert_eq!(tag.standalone().unwrap().value().unwrap().unquoted_string(), "yes");
}

#[test]
fn test_declaration_accessors_absent_attributes() {
    let mut issues = Vec::new();
    let segments: Vec<_> =
        Tokenizer::new("<?xml version=\"1.0\"?>", Some(&mut issues)).collect();
    let tag = segments[0].tag().unwrap();
    assert!(tag.version().is_some());
    assert!(tag.encoding().is_none());
    assert!(tag.standalone().is_none());
}

#[test]
fn test_segment_spans_are_contiguous() {
    let xml = "<?xml version=\"1.0\"?><a b=\"c\">text<br/></a>\n<!-- done -->";
    let mut offset = 0;
    for segment in tokenize(xml) {
        assert_eq!(segment.start(), offset);
        offset = segment.after_end();
    }
    assert_eq!(offset, xml.len());
}

#[test]
fn test_parse_nested_elements() {
    let document = parse("<a><b><c/></b></a>");
    assert!(document.issues().is_empty());
    let root = document.root().unwrap().element().unwrap();
    assert_eq!(root.name().unwrap().text(), "a");
    assert_eq!(root.children().len(), 1);
    let b = root.children()[0].element().unwrap();
    assert_eq!(b.name().unwrap().text(), "b");
    assert_eq!(b.children()[0].kind(), SegmentKind::EmptyElement);
    assert!(b.end_tag().is_some());
}

#[test]
fn test_parse_element_spans() {
    let document = parse("<a><b/></a>");
    let root = document.root().unwrap().element().unwrap();
    assert_eq!(root.start(), 0);
    assert_eq!(root.after_end(), 11);
    assert_eq!(root.children()[0].span(), (3..7).into());
}
