use std::collections::HashMap;

use mustache_core::{render_json, Delimiters, RenderError, Template};
use serde_json::Value;

/// Initialize `env_logger` so `log::debug!`/`log::warn!` diagnostics from resolution and
/// partial misses are visible when a test is run with `--nocapture`. Safe to call from
/// every test file since each `tests/*.rs` is its own binary.
#[allow(unused)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Render `template` against `data` with no partials, unwrapping a successful render.
/// Shared across the test files grouped by concern.
#[allow(unused)]
pub fn render(template: &str, data: Value) -> String {
    render_json(template, &data, &HashMap::new()).unwrap()
}

#[allow(unused)]
pub fn render_with_partials(template: &str, data: Value, partials: &[(&str, &str)]) -> String {
    let map: HashMap<String, String> = partials
        .iter()
        .map(|(name, body)| (name.to_string(), body.to_string()))
        .collect();
    render_json(template, &data, &map).unwrap()
}

#[allow(unused)]
pub fn render_with_delimiters(template: &str, data: Value, delimiters: Delimiters) -> String {
    Template::parse_with_delimiters(template, delimiters)
        .unwrap()
        .render(&mustache_core::JsonValue(data))
        .unwrap()
}

#[allow(unused)]
pub fn render_err(template: &str, data: Value) -> RenderError {
    render_json(template, &data, &HashMap::new()).unwrap_err()
}
