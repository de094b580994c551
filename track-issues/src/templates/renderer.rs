//! Template renderer.

use super::{TemplateError, DEFAULT_BODY_TEMPLATE, DEFAULT_TITLE_FORMAT};
use crate::issues::{render_reference, SourceIssue};
use handlebars::{no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde_json::{json, Value};

const TITLE: &str = "title";
const BODY: &str = "body";

/// Body text used when the source issue has none.
const NO_DESCRIPTION: &str = "No description provided.";

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
/// - `eq` helper for equality comparisons
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs.register_helper("eq", Box::new(eq_helper));
    hbs
}

/// Helper function for equality comparison in templates.
///
/// Usage: `{{#if (eq state "open")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param1 = h.param(0).and_then(|v| v.value().as_str());
    let param2 = h.param(1).and_then(|v| v.value().as_str());

    let result = match (param1, param2) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    out.write(if result { "true" } else { "" })?;
    Ok(())
}

/// Renders tracking-issue titles and bodies from source issues.
///
/// Templates are compiled once up front, so syntax errors surface before
/// the run makes any change.
pub struct TrackingRenderer {
    handlebars: Handlebars<'static>,
}

impl TrackingRenderer {
    /// Creates a renderer with the default title format and body template.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in templates fail to compile.
    pub fn new() -> Result<Self, TemplateError> {
        Self::with_templates(None, None)
    }

    /// Creates a renderer, overriding the title format and/or body template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidTemplate`] for templates that don't compile.
    pub fn with_templates(
        title_format: Option<&str>,
        body_template: Option<&str>,
    ) -> Result<Self, TemplateError> {
        let mut handlebars = create_handlebars_registry();
        for (template, text) in [
            (TITLE, title_format.unwrap_or(DEFAULT_TITLE_FORMAT)),
            (BODY, body_template.unwrap_or(DEFAULT_BODY_TEMPLATE)),
        ] {
            handlebars
                .register_template_string(template, text)
                .map_err(|e| TemplateError::InvalidTemplate {
                    template,
                    source: e,
                })?;
        }
        Ok(Self { handlebars })
    }

    /// Renders the tracking-issue title.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_title(&self, source: &SourceIssue) -> Result<String, TemplateError> {
        let title = self.render(TITLE, source)?;
        Ok(title.trim().to_string())
    }

    /// Renders the tracking-issue body.
    ///
    /// The source reference line always comes first, whatever the template.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_body(&self, source: &SourceIssue) -> Result<String, TemplateError> {
        let details = self.render(BODY, source)?;
        Ok(format!("{}\n\n{}", render_reference(source), details.trim_end()))
    }

    fn render(&self, template: &'static str, source: &SourceIssue) -> Result<String, TemplateError> {
        self.handlebars
            .render(template, &template_data(source))
            .map_err(|e| TemplateError::Render {
                template,
                source: e,
            })
    }
}

fn template_data(source: &SourceIssue) -> Value {
    let timestamp = |value: Option<chrono::DateTime<chrono::Utc>>| {
        value.map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339())
    };
    let body = source
        .body
        .as_deref()
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .unwrap_or(NO_DESCRIPTION);

    json!({
        "repository": source.id.repository,
        "owner": source.owner(),
        "number": source.id.number,
        "title": source.title,
        "url": source.url,
        "state": source.state.as_str(),
        "assignees": source.assignees,
        "created_at": timestamp(source.created_at),
        "updated_at": timestamp(source.updated_at),
        "body": body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::{parse_reference, IssueState};
    use chrono::{TimeZone, Utc};

    fn sample_source() -> SourceIssue {
        let mut source = SourceIssue::new("acme/widgets", 42, "Crash on start", IssueState::Open)
            .with_assignees(["alice"]);
        source.body = Some("Steps to reproduce".to_string());
        source.created_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        source
    }

    #[test]
    fn renders_default_title() {
        let renderer = TrackingRenderer::new().unwrap();
        assert_eq!(
            renderer.render_title(&sample_source()).unwrap(),
            "[acme/widgets] Crash on start"
        );
    }

    #[test]
    fn renders_default_body() {
        let renderer = TrackingRenderer::new().unwrap();
        let body = renderer.render_body(&sample_source()).unwrap();

        assert!(body.starts_with(
            "**Original Issue:** https://github.com/acme/widgets/issues/42\n\n"
        ));
        assert!(body.contains("**Repository:** acme/widgets"));
        assert!(body.contains("**State:** open"));
        assert!(body.contains("**Created:** 2024-05-01T12:00:00+00:00"));
        assert!(body.contains("**Updated:** unknown"));
        assert!(body.ends_with("---\n\nSteps to reproduce"));
    }

    #[test]
    fn rendered_body_round_trips_reference() {
        let renderer = TrackingRenderer::new().unwrap();
        let source = sample_source();
        let body = renderer.render_body(&source).unwrap();
        assert_eq!(parse_reference(&body), Ok(source.id));
    }

    #[test]
    fn custom_template_keeps_reference() {
        let renderer =
            TrackingRenderer::with_templates(Some("{{owner}}: {{title}}"), Some("Just a link"))
                .unwrap();
        let source = sample_source();

        assert_eq!(renderer.render_title(&source).unwrap(), "acme: Crash on start");
        let body = renderer.render_body(&source).unwrap();
        assert_eq!(parse_reference(&body), Ok(source.id));
        assert!(body.ends_with("Just a link"));
    }

    #[test]
    fn placeholder_for_missing_body() {
        let renderer = TrackingRenderer::new().unwrap();
        let mut source = sample_source();
        source.body = Some("   ".to_string());
        let body = renderer.render_body(&source).unwrap();
        assert!(body.ends_with("No description provided."));
    }

    #[test]
    fn conditional_eq() {
        let renderer = TrackingRenderer::with_templates(
            Some(r#"{{#if (eq state "open")}}OPEN{{else}}DONE{{/if}} {{title}}"#),
            None,
        )
        .unwrap();
        assert_eq!(
            renderer.render_title(&sample_source()).unwrap(),
            "OPEN Crash on start"
        );
    }

    #[test]
    fn no_html_escaping() {
        let renderer = TrackingRenderer::new().unwrap();
        let mut source = sample_source();
        source.title = "<b>bold</b> & co".to_string();
        assert_eq!(
            renderer.render_title(&source).unwrap(),
            "[acme/widgets] <b>bold</b> & co"
        );
    }

    #[test]
    fn rejects_invalid_templates() {
        assert!(matches!(
            TrackingRenderer::with_templates(Some("{{#if state}}unclosed"), None),
            Err(TemplateError::InvalidTemplate {
                template: "title",
                ..
            })
        ));
    }

    #[test]
    fn strict_mode_rejects_unknown_fields() {
        let renderer = TrackingRenderer::with_templates(Some("{{milestone}}"), None).unwrap();
        assert!(matches!(
            renderer.render_title(&sample_source()),
            Err(TemplateError::Render { .. })
        ));
    }
}
