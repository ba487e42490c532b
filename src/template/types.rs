//! Template types and error definitions

use std::path::PathBuf;

use thiserror::Error;

/// Template-specific error type.
///
/// Every variant is a permanent input error: the mailer never retries a
/// failed render.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template failed to compile: {0}")]
    Compile(Box<handlebars::TemplateError>),

    #[error("Template failed to render: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Failed to read template directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;
