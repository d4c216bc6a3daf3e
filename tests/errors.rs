mod harness;

use serde_json::json;

use harness::render_err;
use mustache_core::{RenderError, Template};

#[test]
fn unclosed_tag_is_unbalanced_tags() {
    let err = render_err("hello {{name", json!({}));
    assert!(matches!(err, RenderError::UnbalancedTags { .. }));
}

#[test]
fn unclosed_section_is_reported() {
    let err = render_err("{{#xs}}body", json!({"xs": ["a"]}));
    assert!(matches!(err, RenderError::UnclosedSection { .. }));
}

#[test]
fn mismatched_section_close_is_reported() {
    let err = render_err("{{#a}}x{{/b}}", json!({}));
    assert!(matches!(err, RenderError::MismatchedSectionClose { .. }));
}

#[test]
fn section_close_with_no_open_is_reported() {
    let err = render_err("stray{{/x}}", json!({}));
    assert!(matches!(err, RenderError::MismatchedSectionClose { .. }));
}

#[test]
fn malformed_set_delimiter_is_reported() {
    let err = render_err("{{=only-one=}}", json!({}));
    assert!(matches!(err, RenderError::MalformedSetDelimiter { .. }));
}

#[test]
fn max_depth_exceeded_is_reported_instead_of_hanging() {
    let tpl = Template::parse("{{#xs}}{{.}}{{/xs}}").unwrap().with_max_depth(10);
    let big_list: Vec<i32> = (0..1000).collect();
    let err = tpl
        .render(&mustache_core::JsonValue(json!({"xs": big_list})))
        .unwrap_err();
    assert!(matches!(err, RenderError::MaxDepthExceeded { .. }));
}

#[test]
fn missing_name_degrades_to_empty_output_rather_than_erroring() {
    harness::init_logging();
    let rendered =
        mustache_core::render_json("[{{missing}}]", &json!({}), &Default::default()).unwrap();
    assert_eq!(rendered, "[]");
}

#[test]
fn missing_partial_degrades_to_empty_output_rather_than_erroring() {
    harness::init_logging();
    let rendered =
        mustache_core::render_json("[{{>missing}}]", &json!({}), &Default::default()).unwrap();
    assert_eq!(rendered, "[]");
}
