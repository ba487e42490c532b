//! Email template system.
//!
//! This module provides:
//! - A compiled template registry loaded from a directory of `.hbs` files
//! - Strict-mode rendering against a JSON object context
//!
//! # Example
//!
//! ```ignore
//! let mut store = TemplateStore::new();
//! store.register("welcome", "<h1>Welcome, {{name}}!</h1>")?;
//!
//! let html = store.render("welcome", &json!({ "name": "Ada" }))?;
//! ```

mod store;
mod types;

pub use store::TemplateStore;
pub use types::{TemplateError, TemplateResult};
