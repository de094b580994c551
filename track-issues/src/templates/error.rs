//! Tracking-issue template errors.

/// Errors from compiling or rendering the title and body templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A title format or body template doesn't compile.
    #[error("Invalid {template} template: {source}")]
    InvalidTemplate {
        /// Which template, "title" or "body".
        template: &'static str,
        #[source]
        source: handlebars::TemplateError,
    },

    /// Rendering failed, usually on a variable the source issue doesn't carry.
    #[error("Failed to render {template}: {source}")]
    Render {
        /// Which template, "title" or "body".
        template: &'static str,
        #[source]
        source: handlebars::RenderError,
    },
}
