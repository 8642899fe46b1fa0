use loxt::{parse, IssueKind, Span};

fn issues(xml: &str) -> Vec<(IssueKind, Span)> {
    parse(xml)
        .issues()
        .iter()
        .map(|issue| (issue.kind, issue.span))
        .collect()
}

#[test]
fn test_bare_left_angle_bracket() {
    assert_eq!(
        issues("<"),
        [
            (
                IssueKind::MissingNameQuestionMarkExclamationPointOrForwardSlash,
                Span::new(0, 1)
            ),
            (IssueKind::MissingTagRightAngleBracket, Span::new(0, 1)),
        ]
    );
}

#[test]
fn test_missing_start_tag_right_angle_bracket() {
    assert_eq!(
        issues("<a"),
        [
            (IssueKind::MissingStartTagRightAngleBracket, Span::new(0, 1)),
            (IssueKind::MissingElementEndTag, Span::new(1, 1)),
        ]
    );
}

#[test]
fn test_missing_element_end_tag() {
    assert_eq!(
        issues("<a>"),
        [(IssueKind::MissingElementEndTag, Span::new(1, 1))]
    );
}

#[test]
fn test_mismatched_end_tag() {
    assert_eq!(
        issues("<a></b>"),
        [(
            IssueKind::ExpectedElementEndTagWithDifferentName,
            Span::new(5, 1)
        )]
    );
}

#[test]
fn test_end_tag_names_match_case_insensitively() {
    assert!(issues("<A></a>").is_empty());
}

#[test]
fn test_end_tag_at_root_level_is_accepted() {
    assert!(issues("</a>").is_empty());
}

#[test]
fn test_mismatch_consumes_the_end_tag() {
    // </a> closes <b>, so <a> runs out of input
    assert_eq!(
        issues("<a><b></a>"),
        [
            (
                IssueKind::ExpectedElementEndTagWithDifferentName,
                Span::new(8, 1)
            ),
            (IssueKind::MissingElementEndTag, Span::new(1, 1)),
        ]
    );
}

#[test]
fn test_missing_quoted_string_end_quote() {
    assert_eq!(
        issues("<a b=\"c"),
        [
            (IssueKind::MissingQuotedStringEndQuote, Span::new(5, 1)),
            (IssueKind::MissingStartTagRightAngleBracket, Span::new(0, 1)),
            (IssueKind::MissingElementEndTag, Span::new(1, 1)),
        ]
    );
}

#[test]
fn test_attribute_without_equals() {
    assert_eq!(
        issues("<a b/>"),
        [(IssueKind::ExpectedAttributeEqualsSign, Span::new(4, 1))]
    );
}

#[test]
fn test_attribute_without_value() {
    assert_eq!(
        issues("<a b=/>"),
        [(IssueKind::ExpectedAttributeValue, Span::new(5, 1))]
    );
}

#[test]
fn test_missing_whitespace_between_attributes() {
    assert_eq!(
        issues(r#"<a b="c"d="e"/>"#),
        [(IssueKind::ExpectedWhitespaceBetweenAttributes, Span::new(8, 1))]
    );
}

#[test]
fn test_junk_in_start_tag_reports_twice() {
    // the = where a name was expected and the quoted string after it
    // both report against the same expectation
    assert_eq!(
        issues(r#"<a ="v">"#),
        [
            (
                IssueKind::ExpectedAttributeNameStartTagRightAngleBracketOrEmptyElementForwardSlash,
                Span::new(3, 1)
            ),
            (
                IssueKind::ExpectedAttributeNameStartTagRightAngleBracketOrEmptyElementForwardSlash,
                Span::new(4, 1)
            ),
            (IssueKind::MissingElementEndTag, Span::new(1, 1)),
        ]
    );
}

#[test]
fn test_junk_after_empty_element_slash() {
    assert_eq!(
        issues("<a/ b>"),
        [
            (IssueKind::ExpectedEmptyElementRightAngleBracket, Span::new(3, 1)),
            (IssueKind::ExpectedEmptyElementRightAngleBracket, Span::new(4, 1)),
        ]
    );
}

#[test]
fn test_end_tag_without_name() {
    assert_eq!(
        issues("</>"),
        [(IssueKind::ExpectedEndTagName, Span::new(2, 1))]
    );
}

#[test]
fn test_unterminated_end_tag() {
    assert_eq!(
        issues("</a"),
        [(IssueKind::MissingEndTagRightAngleBracket, Span::new(0, 1))]
    );
}

#[test]
fn test_declaration_without_version() {
    assert_eq!(
        issues("<?xml?>"),
        [(IssueKind::ExpectedDeclarationVersionAttribute, Span::new(5, 1))]
    );
}

#[test]
fn test_declaration_wrong_version_value() {
    assert_eq!(
        issues(r#"<?xml version="1.1"?><a/>"#),
        [(
            IssueKind::InvalidDeclarationVersionAttributeValue,
            Span::new(14, 5)
        )]
    );
}

#[test]
fn test_declaration_unexpected_second_attribute() {
    assert_eq!(
        issues(r#"<?xml version="1.0" foo="bar"?><a/>"#),
        [(
            IssueKind::ExpectedDeclarationEncodingOrStandaloneAttributeOrRightQuestionMark,
            Span::new(20, 3)
        )]
    );
}

#[test]
fn test_declaration_invalid_standalone_value() {
    assert_eq!(
        issues(r#"<?xml version="1.0" standalone="maybe"?><a/>"#),
        [(
            IssueKind::InvalidDeclarationStandaloneAttributeValue,
            Span::new(31, 7)
        )]
    );
}

#[test]
fn test_declaration_third_attribute_must_be_standalone() {
    assert_eq!(
        issues(r#"<?xml version="1.0" encoding="utf-8" encoding="x"?><a/>"#),
        [(
            IssueKind::ExpectedDeclarationStandaloneAttributeOrRightQuestionMark,
            Span::new(37, 8)
        )]
    );
}

#[test]
fn test_declaration_closed_by_bare_right_angle_bracket() {
    assert_eq!(
        issues(r#"<?xml version="1.0"><a/>"#),
        [(
            IssueKind::ExpectedDeclarationRightQuestionMark,
            Span::new(19, 1)
        )]
    );
}

#[test]
fn test_unterminated_declaration() {
    assert_eq!(
        issues("<?xml"),
        [
            (IssueKind::MissingDeclarationVersionAttribute, Span::new(2, 3)),
            (IssueKind::MissingDeclarationRightQuestionMark, Span::new(0, 1)),
        ]
    );
}

#[test]
fn test_unterminated_processing_instruction() {
    assert_eq!(
        issues("<?pi data"),
        [(
            IssueKind::MissingProcessingInstructionRightQuestionMark,
            Span::new(0, 1)
        )]
    );
    assert_eq!(
        issues("<?pi data?"),
        [(
            IssueKind::MissingProcessingInstructionRightAngleBracket,
            Span::new(0, 1)
        )]
    );
}

#[test]
fn test_processing_instruction_bare_right_angle_bracket() {
    assert_eq!(
        issues("<?pi data>"),
        [(
            IssueKind::ExpectedProcessingInstructionRightQuestionMark,
            Span::new(9, 1)
        )]
    );
}

#[test]
fn test_comment_missing_second_start_dash() {
    assert_eq!(
        issues("<!-x-->"),
        [(IssueKind::ExpectedCommentSecondStartDash, Span::new(3, 1))]
    );
}

#[test]
fn test_unterminated_comment() {
    assert_eq!(
        issues("<!--x"),
        [(IssueKind::MissingCommentClosingDashes, Span::new(0, 1))]
    );
    assert_eq!(
        issues("<!--x-"),
        [(IssueKind::MissingCommentSecondClosingDash, Span::new(0, 1))]
    );
    assert_eq!(
        issues("<!--x--"),
        [(IssueKind::MissingCommentRightAngleBracket, Span::new(0, 1))]
    );
}

#[test]
fn test_cdata_wrong_name() {
    assert_eq!(
        issues("<![CDAT[x]]>"),
        [(IssueKind::ExpectedCdataName, Span::new(3, 4))]
    );
}

#[test]
fn test_unterminated_cdata() {
    assert_eq!(
        issues("<![CDATA[x"),
        [(
            IssueKind::MissingCdataClosingRightSquareBrackets,
            Span::new(0, 1)
        )]
    );
}

#[test]
fn test_doctype_missing_root_element_name() {
    assert_eq!(
        issues("<!DOCTYPE>"),
        [(IssueKind::ExpectedDoctypeRootElementName, Span::new(9, 1))]
    );
}

#[test]
fn test_doctype_invalid_external_id_type() {
    assert_eq!(
        issues(r#"<!DOCTYPE a FOO "s">"#),
        [
            (IssueKind::InvalidDoctypeExternalIdType, Span::new(12, 3)),
            (IssueKind::ExpectedDoctypeRightAngleBracket, Span::new(16, 1)),
        ]
    );
}

#[test]
fn test_doctype_missing_system_identifier() {
    assert_eq!(
        issues("<!DOCTYPE a SYSTEM>"),
        [(IssueKind::ExpectedDoctypeSystemIdentifier, Span::new(18, 1))]
    );
}

#[test]
fn test_doctype_public_needs_two_identifiers() {
    assert_eq!(
        issues(r#"<!DOCTYPE a PUBLIC "p">"#),
        [(IssueKind::ExpectedDoctypeSystemIdentifier, Span::new(22, 1))]
    );
}

#[test]
fn test_unterminated_internal_definition() {
    assert_eq!(
        issues("<!DOCTYPE a [x"),
        [
            (
                IssueKind::MissingInternalDefinitionRightSquareBracket,
                Span::new(12, 1)
            ),
            (IssueKind::MissingDoctypeRightAngleBracket, Span::new(0, 1)),
        ]
    );
}

#[test]
fn test_issue_messages_are_fixed() {
    let document = parse("<");
    assert_eq!(
        document.issues()[0].message(),
        "missing name, '?', '!' or '/' after '<'"
    );
    assert_eq!(
        document.issues()[0].to_string(),
        "missing name, '?', '!' or '/' after '<' at 0..1"
    );
}

#[test]
fn test_question_mark_without_name() {
    assert_eq!(
        issues("<?"),
        [
            (
                IssueKind::MissingDeclarationOrProcessingInstructionName,
                Span::new(0, 1)
            ),
            (IssueKind::MissingTagRightAngleBracket, Span::new(0, 1)),
        ]
    );
    assert_eq!(
        issues("<?$?>"),
        [(
            IssueKind::ExpectedDeclarationOrProcessingInstructionName,
            Span::new(2, 1)
        )]
    );
}

#[test]
fn test_exclamation_point_without_marker() {
    assert_eq!(
        issues("<!"),
        [
            (
                IssueKind::MissingDoctypeNameCommentDashesOrCdataLeftSquareBracket,
                Span::new(0, 1)
            ),
            (IssueKind::MissingTagRightAngleBracket, Span::new(0, 1)),
        ]
    );
    assert_eq!(
        issues("<!foo>"),
        [(
            IssueKind::ExpectedDoctypeNameCommentDashesOrCdataLeftSquareBracket,
            Span::new(2, 3)
        )]
    );
}

#[test]
fn test_cdata_prefix_truncations() {
    assert_eq!(
        issues("<!["),
        [
            (IssueKind::MissingCdataName, Span::new(0, 1)),
            (IssueKind::MissingTagRightAngleBracket, Span::new(0, 1)),
        ]
    );
    assert_eq!(
        issues("<![CDATA"),
        [
            (IssueKind::MissingCdataSecondLeftSquareBracket, Span::new(0, 1)),
            (IssueKind::MissingTagRightAngleBracket, Span::new(0, 1)),
        ]
    );
}

#[test]
fn test_cdata_partial_terminators() {
    assert_eq!(
        issues("<![CDATA[x]"),
        [(
            IssueKind::MissingCdataSecondRightSquareBracket,
            Span::new(0, 1)
        )]
    );
    assert_eq!(
        issues("<![CDATA[x]]"),
        [(IssueKind::MissingCdataRightAngleBracket, Span::new(0, 1))]
    );
}

#[test]
fn test_junk_after_left_angle_bracket() {
    assert_eq!(
        issues("< a>"),
        [(
            IssueKind::ExpectedNameQuestionMarkExclamationPointOrForwardSlash,
            Span::new(1, 1)
        )]
    );
}

#[test]
fn test_junk_where_second_attribute_expected() {
    assert_eq!(
        issues(r#"<a b="c" =>"#),
        [
            (
                IssueKind::ExpectedAttributeNameStartTagRightAngleBracketOrEmptyElementForwardSlash,
                Span::new(9, 1)
            ),
            (IssueKind::MissingElementEndTag, Span::new(1, 1)),
        ]
    );
}

#[test]
fn test_declaration_eof_after_attributes() {
    assert_eq!(
        issues(r#"<?xml version="1.0""#),
        [(IssueKind::MissingDeclarationRightQuestionMark, Span::new(0, 1))]
    );
    assert_eq!(
        issues(r#"<?xml version="1.0"?"#),
        [(IssueKind::MissingDeclarationRightAngleBracket, Span::new(0, 1))]
    );
}

#[test]
fn test_declaration_attribute_after_question_mark() {
    let document = parse(r#"<?xml version="1.0"? encoding="x">"#);
    let kinds_and_spans: Vec<_> = document
        .issues()
        .iter()
        .map(|issue| (issue.kind, issue.span))
        .collect();
    assert_eq!(
        kinds_and_spans,
        [
            (
                IssueKind::ExpectedDeclarationRightAngleBracket,
                Span::new(20, 1)
            ),
            (
                IssueKind::ExpectedDeclarationRightAngleBracket,
                Span::new(21, 8)
            ),
        ]
    );
    // the stray attribute still shows up through the accessors
    let declaration = document.declaration().unwrap();
    assert!(declaration.attribute("encoding").is_some());
}

#[test]
fn test_declaration_attribute_after_standalone() {
    assert_eq!(
        issues(r#"<?xml version="1.0" standalone="yes" encoding="utf-8"?>"#),
        [(
            IssueKind::ExpectedDeclarationRightQuestionMark,
            Span::new(37, 8)
        )]
    );
}

#[test]
fn test_end_tag_whitespace_before_name_is_recovered() {
    assert!(issues("<a></ a>").is_empty());
    assert!(issues("<a></a >").is_empty());
}
