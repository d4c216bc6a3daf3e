mod harness;

use serde_json::json;
use test_case::test_case;

use harness::render;

#[test]
fn plain_interpolation_substitutes_the_resolved_value() {
    assert_eq!(
        render("Hello, {{name}}!", json!({"name": "world"})),
        "Hello, world!"
    );
}

#[test]
fn default_tag_escapes_html() {
    assert_eq!(render("<{{a}}>", json!({"a": "<&>"})), "<&lt;&amp;&gt;>");
}

#[test]
fn ampersand_tag_does_not_escape() {
    assert_eq!(render("{{&a}}", json!({"a": "<&>"})), "<&>");
}

#[test]
fn triple_mustache_does_not_escape() {
    assert_eq!(render("{{{a}}}", json!({"a": "<&>"})), "<&>");
}

#[test]
fn interior_whitespace_in_a_tag_is_ignored() {
    assert_eq!(render("{{ name }}", json!({"name": "x"})), "x");
    assert_eq!(render("{{\tname\t}}", json!({"name": "x"})), "x");
}

#[test]
fn dotted_name_resolves_nested_fields() {
    assert_eq!(render("{{a.b.c}}", json!({"a": {"b": {"c": "deep"}}})), "deep");
}

#[test]
fn dotted_name_matches_equivalent_nested_section() {
    let dotted = render("{{a.b}}", json!({"a": {"b": "x"}}));
    let nested = render("{{#a}}{{b}}{{/a}}", json!({"a": {"b": "x"}}));
    assert_eq!(dotted, nested);
    assert_eq!(dotted, "x");
}

#[test]
fn missing_name_renders_as_empty_string() {
    assert_eq!(render("[{{missing}}]", json!({})), "[]");
}

#[test_case(json!("world"), "world"; "string value")]
#[test_case(json!(42), "42"; "integer value")]
#[test_case(json!(true), "true"; "boolean value")]
#[test_case(json!(null), ""; "null value")]
fn scalar_kinds_stringify_for_interpolation(value: serde_json::Value, expected: &str) {
    assert_eq!(render("{{v}}", json!({"v": value})), expected);
}

#[test]
fn html_escaping_is_idempotent_on_already_escaped_content() {
    // Escaping already-escaped content through a raw tag matches re-escaping the
    // original through a default tag.
    let original = "<tag & \"quote\">";
    let escaped_once = render("{{v}}", json!({"v": original}));
    let escaped_again = render("{{&v}}", json!({"v": escaped_once.clone()}));
    assert_eq!(escaped_again, escaped_once);
}

#[test]
fn template_with_no_tags_round_trips_verbatim() {
    let plain = "just some\nplain multi-line\ntext with no tags at all";
    assert_eq!(render(plain, json!({"anything": "goes"})), plain);
}
