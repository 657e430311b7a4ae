//! Data models: OCR records, form templates, bound forms and configuration.

pub mod config;
pub mod form;
pub mod record;
pub mod template;
