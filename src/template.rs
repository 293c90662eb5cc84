//! Template substitution into HTML.
//!
//! [`TemplateRenderer`] fills an HTML template with values from a JSON-style
//! data map using Handlebars syntax:
//!
//! | Marker | Meaning |
//! |--------|---------|
//! | `{{Name}}` | Field `Name`, HTML-escaped |
//! | `{{customer.name}}` | Nested field |
//! | `{{items.[0]}}` | Sequence element |
//! | `{{{Name}}}` | Field `Name`, inserted raw |
//!
//! The engine's block helpers (`{{#each}}`, `{{#if}}`, …) come along for
//! free but nothing in this crate depends on them.
//!
//! # Lookup Rules
//!
//! | Lookup | Lenient (default) | Strict |
//! |--------|-------------------|--------|
//! | key absent from a map | renders empty | [`TemplateError::Execution`] |
//! | walking into a string, number or bool | [`TemplateError::Execution`] | [`TemplateError::Execution`] |
//! | named key on a sequence | [`TemplateError::Execution`] | [`TemplateError::Execution`] |
//!
//! # Example
//!
//! ```rust
//! use pdf_template_service::TemplateRenderer;
//! use serde_json::json;
//!
//! let renderer = TemplateRenderer::default();
//! let data = json!({ "Name": "<John>" });
//! let html = renderer
//!     .render("<body>{{Name}}</body>", data.as_object().unwrap())
//!     .unwrap();
//!
//! assert_eq!(html, "<body>&lt;John&gt;</body>");
//! ```

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason, Template,
};
use serde_json::{Map, Value};

use crate::error::TemplateError;

/// Name under which Handlebars looks up the hook for unresolved expressions.
const HELPER_MISSING: &str = "helperMissing";

/// Renders HTML templates against a data map.
///
/// The renderer keeps no per-call state; one instance can be shared by every
/// concurrent request.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Create a renderer.
    ///
    /// With `strict` set, referencing a key that does not exist is an
    /// [`TemplateError::Execution`]. Without it, such markers render empty.
    /// Walking into a value of the wrong shape fails in both modes.
    pub fn new(strict: bool) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(strict);
        registry.register_helper(HELPER_MISSING, Box::new(ShapeCheck));
        Self { registry }
    }

    /// Whether missing fields are errors.
    pub fn is_strict(&self) -> bool {
        self.registry.strict_mode()
    }

    /// Substitute `data` into `template`.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::Syntax`] - the template could not be parsed
    /// - [`TemplateError::Execution`] - evaluation against `data` failed
    pub fn render(&self, template: &str, data: &Map<String, Value>) -> Result<String, TemplateError> {
        // Parse up front so malformed markup is reported as a syntax error
        // whatever the data looks like.
        Template::compile(template).map_err(|e| {
            log::debug!("Template failed to parse: {}", e);
            TemplateError::Syntax(e.to_string())
        })?;

        let html = self.registry.render_template(template, data).map_err(|e| {
            log::debug!("Template failed to render: {}", e);
            TemplateError::Execution(e.to_string())
        })?;

        log::trace!(
            "Rendered template ({} bytes → {} bytes)",
            template.len(),
            html.len()
        );

        Ok(html)
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("strict", &self.is_strict())
            .finish()
    }
}

/// Runs for every expression whose value could not be resolved.
///
/// A key missing from a map renders nothing. A path that steps through a
/// scalar, or asks a sequence for a named key, is an error. Calls with
/// arguments are unknown helpers and stay errors.
struct ShapeCheck;

impl HelperDef for ShapeCheck {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        _out: &mut dyn Output,
    ) -> HelperResult {
        let name = h.name();

        if !h.params().is_empty() || !h.hash().is_empty() {
            return Err(RenderErrorReason::Other(format!("Helper not defined: {}", name)).into());
        }

        let (scope, segments) = split_path(name);
        let mut prefix = scope.to_string();

        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                prefix.push('.');
            }
            prefix.push_str(segment);

            let Some(next) = segments.get(i + 1) else {
                break;
            };

            let value = rc.evaluate(ctx, &prefix)?;
            if value.is_missing() {
                break;
            }

            match value.as_json() {
                Value::Object(_) | Value::Null => {}
                Value::Array(_) if is_index(next) => {}
                other => return Err(shape_error(name, &prefix, other)),
            }
        }

        log::trace!("Missing template value rendered empty: {}", name);
        Ok(())
    }
}

/// Split a path into its scope prefix (`../`, `@root.`) and field segments.
fn split_path(path: &str) -> (String, Vec<&str>) {
    let mut scope = String::new();
    let mut rest = path;

    loop {
        if let Some(r) = rest.strip_prefix("../") {
            scope.push_str("../");
            rest = r;
        } else if let Some(r) = rest.strip_prefix("@root.").or_else(|| rest.strip_prefix("@root/")) {
            scope.push_str("@root.");
            rest = r;
        } else if let Some(r) = rest
            .strip_prefix("this.")
            .or_else(|| rest.strip_prefix("this/"))
            .or_else(|| rest.strip_prefix("./"))
        {
            rest = r;
        } else {
            break;
        }
    }

    let segments = rest.split(['.', '/']).filter(|s| !s.is_empty()).collect();
    (scope, segments)
}

/// `[0]` or `0`.
fn is_index(segment: &str) -> bool {
    let digits = segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(segment);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn shape_error(path: &str, prefix: &str, value: &Value) -> RenderError {
    let kind = match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) | Value::Null => "map",
    };
    RenderErrorReason::Other(format!(
        "cannot evaluate \"{}\": \"{}\" is a {}",
        path, prefix, kind
    ))
    .into()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("test data must be an object, got {}", other),
        }
    }

    #[test]
    fn test_render_simple_field() {
        let renderer = TemplateRenderer::default();
        let html = renderer
            .render(
                "<html><body>{{Name}}</body></html>",
                &data(json!({ "Name": "John Doe" })),
            )
            .unwrap();

        assert!(html.contains("John Doe"));
        assert!(!html.contains("{{"));
        assert_eq!(html, "<html><body>John Doe</body></html>");
    }

    #[test]
    fn test_render_escapes_html() {
        let renderer = TemplateRenderer::default();
        let html = renderer
            .render(
                "<p>{{comment}}</p>",
                &data(json!({ "comment": "<script>alert('x')</script> & more" })),
            )
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; more"));
    }

    #[test]
    fn test_render_triple_stash_is_raw() {
        let renderer = TemplateRenderer::default();
        let html = renderer
            .render("<div>{{{body}}}</div>", &data(json!({ "body": "<b>bold</b>" })))
            .unwrap();

        assert_eq!(html, "<div><b>bold</b></div>");
    }

    #[test]
    fn test_render_nested_and_sequence_values() {
        let renderer = TemplateRenderer::default();
        let html = renderer
            .render(
                "{{customer.name}}|{{items.[1]}}|{{count}}|{{paid}}",
                &data(json!({
                    "customer": { "name": "Ada" },
                    "items": ["first", "second"],
                    "count": 3,
                    "paid": true
                })),
            )
            .unwrap();

        assert_eq!(html, "Ada|second|3|true");
    }

    #[test]
    fn test_render_each_block() {
        let renderer = TemplateRenderer::default();
        let html = renderer
            .render(
                "<ul>{{#each rows}}<li>{{this}}</li>{{/each}}</ul>",
                &data(json!({ "rows": ["a", "b"] })),
            )
            .unwrap();

        assert_eq!(html, "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_render_empty_data_without_markers() {
        let renderer = TemplateRenderer::default();
        let html = renderer.render("<p>static</p>", &Map::new()).unwrap();
        assert_eq!(html, "<p>static</p>");
    }

    #[test]
    fn test_unterminated_marker_is_syntax_error() {
        let renderer = TemplateRenderer::default();
        let result = renderer.render(
            "<html><body>{{Name</body></html>",
            &data(json!({ "Name": "x" })),
        );
        assert!(
            matches!(result, Err(TemplateError::Syntax(_))),
            "Expected Syntax error, got {:?}",
            result
        );
    }

    #[test]
    fn test_unclosed_block_is_syntax_error() {
        let renderer = TemplateRenderer::default();
        let result = renderer.render("{{#if show}}<p>open", &data(json!({ "show": true })));
        assert!(matches!(result, Err(TemplateError::Syntax(_))));
    }

    /// Syntax errors win even when the data would also fail.
    #[test]
    fn test_syntax_checked_before_data() {
        let renderer = TemplateRenderer::new(true);
        let result = renderer.render("{{missing", &Map::new());
        assert!(matches!(result, Err(TemplateError::Syntax(_))));
    }

    #[test]
    fn test_strict_missing_field_is_execution_error() {
        let renderer = TemplateRenderer::new(true);
        let result = renderer.render("<p>{{Missing}}</p>", &data(json!({ "Name": "x" })));
        assert!(
            matches!(result, Err(TemplateError::Execution(_))),
            "Expected Execution error, got {:?}",
            result
        );
    }

    #[test]
    fn test_strict_shape_mismatch_is_execution_error() {
        let renderer = TemplateRenderer::new(true);
        let result = renderer.render("{{Name.first}}", &data(json!({ "Name": "John" })));
        assert!(matches!(result, Err(TemplateError::Execution(_))));
    }

    #[test]
    fn test_lenient_missing_field_renders_empty() {
        let renderer = TemplateRenderer::new(false);
        let html = renderer
            .render("<p>{{Missing}}</p>", &data(json!({ "Name": "x" })))
            .unwrap();
        assert_eq!(html, "<p></p>");
    }

    #[test]
    fn test_default_missing_field_renders_empty() {
        let renderer = TemplateRenderer::default();
        assert!(!renderer.is_strict());

        let html = renderer
            .render(
                "<p>{{Missing}}|{{customer.phone}}|{{order.lines.total}}</p>",
                &data(json!({ "customer": { "name": "Ada" }, "order": {} })),
            )
            .unwrap();
        assert_eq!(html, "<p>||</p>");
    }

    #[test]
    fn test_lenient_shape_mismatch_is_execution_error() {
        let renderer = TemplateRenderer::new(false);

        let result = renderer.render("<p>{{Name.first}}</p>", &data(json!({ "Name": "John" })));
        assert!(
            matches!(result, Err(TemplateError::Execution(_))),
            "Expected Execution error, got {:?}",
            result
        );

        let result = renderer.render("{{o.a.b}}", &data(json!({ "o": { "a": 1 } })));
        assert!(matches!(result, Err(TemplateError::Execution(_))));

        let result = renderer.render("{{flag.on}}", &data(json!({ "flag": true })));
        assert!(matches!(result, Err(TemplateError::Execution(_))));
    }

    #[test]
    fn test_lenient_named_key_on_sequence_is_execution_error() {
        let renderer = TemplateRenderer::new(false);
        let result = renderer.render("{{items.name}}", &data(json!({ "items": ["a", "b"] })));
        assert!(matches!(result, Err(TemplateError::Execution(_))));
    }

    #[test]
    fn test_lenient_index_past_end_renders_empty() {
        let renderer = TemplateRenderer::new(false);
        let html = renderer
            .render("[{{items.[5]}}]", &data(json!({ "items": ["a", "b"] })))
            .unwrap();
        assert_eq!(html, "[]");
    }

    #[test]
    fn test_shape_mismatch_inside_each_is_execution_error() {
        let renderer = TemplateRenderer::default();
        let result = renderer.render(
            "{{#each rows}}<li>{{this.name.first}}</li>{{/each}}",
            &data(json!({ "rows": [{ "name": "Ada" }] })),
        );
        assert!(matches!(result, Err(TemplateError::Execution(_))));
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("a.b"), (String::new(), vec!["a", "b"]));
        assert_eq!(split_path("this.a/b"), (String::new(), vec!["a", "b"]));
        assert_eq!(split_path("../../a.b"), ("../../".to_string(), vec!["a", "b"]));
        assert_eq!(split_path("@root.a.[0]"), ("@root.".to_string(), vec!["a", "[0]"]));
    }

    #[test]
    fn test_is_index() {
        assert!(is_index("[0]"));
        assert!(is_index("12"));
        assert!(!is_index("[]"));
        assert!(!is_index("name"));
    }

    #[test]
    fn test_unknown_helper_is_execution_error() {
        let renderer = TemplateRenderer::new(false);
        let result = renderer.render("{{shout Name}}", &data(json!({ "Name": "x" })));
        assert!(matches!(result, Err(TemplateError::Execution(_))));
    }

    #[test]
    fn test_renderer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplateRenderer>();
    }

    #[test]
    fn test_debug_shows_mode() {
        assert!(format!("{:?}", TemplateRenderer::new(false)).contains("strict: false"));
    }
}
