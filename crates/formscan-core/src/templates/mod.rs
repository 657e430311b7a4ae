//! Template library, per-domain views and template selection.

pub mod builtin;
pub mod library;
pub mod matcher;

pub use builtin::builtin_templates;
pub use library::{deduplicate, TemplateLibrary};
pub use matcher::{find_template, select_template, MatchStrategy, TemplateMatch};
