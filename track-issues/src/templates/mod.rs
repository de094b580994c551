//! Tracking-issue title and body rendering using Handlebars.
//!
//! Templates see these variables: `repository`, `owner`, `number`, `title`,
//! `url`, `state`, `assignees`, `created_at`, `updated_at` and `body`.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TrackingRenderer};

/// Default tracking-issue title.
pub const DEFAULT_TITLE_FORMAT: &str = "[{{repository}}] {{title}}";

/// Default tracking-issue body, rendered below the source reference line.
pub const DEFAULT_BODY_TEMPLATE: &str = "**Repository:** {{repository}}
**State:** {{state}}
**Created:** {{created_at}}
**Updated:** {{updated_at}}

---

{{body}}
";
