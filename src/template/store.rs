use std::path::Path;

use handlebars::Handlebars;

use super::types::{TemplateError, TemplateResult};

/// Compiled template registry backed by handlebars.
///
/// Templates are registered once at startup (from a directory of `.hbs`
/// files, or inline) and the store is shared immutably afterwards.
/// Rendering is pure: the same template and context always produce the
/// same HTML.
pub struct TemplateStore {
    registry: Handlebars<'static>,
}

impl TemplateStore {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        // A context that does not bind every referenced variable is an
        // input error, not an empty string in the output.
        registry.set_strict_mode(true);
        Self { registry }
    }

    /// Build a store from a directory of `.hbs` files.
    pub fn from_directory(dir: impl AsRef<Path>) -> TemplateResult<Self> {
        let mut store = Self::new();
        store.load_directory(dir)?;
        Ok(store)
    }

    /// Register every `*.hbs` file in `dir`, named by file stem.
    ///
    /// Returns the number of templates registered. Files with other
    /// extensions are ignored.
    pub fn load_directory(&mut self, dir: impl AsRef<Path>) -> TemplateResult<usize> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| TemplateError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut loaded = 0;
        for entry in entries {
            let entry = entry.map_err(|source| TemplateError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("hbs") {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
                self.registry
                    .register_template_file(name, &path)
                    .map_err(|e| TemplateError::Compile(Box::new(e)))?;
                loaded += 1;
            }
        }

        Ok(loaded)
    }

    /// Register a template from source text.
    pub fn register(&mut self, name: &str, source: &str) -> TemplateResult<()> {
        self.registry
            .register_template_string(name, source)
            .map_err(|e| TemplateError::Compile(Box::new(e)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    pub fn len(&self) -> usize {
        self.registry.get_templates().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render a registered template against a JSON object context.
    pub fn render(&self, name: &str, context: &serde_json::Value) -> TemplateResult<String> {
        if !self.registry.has_template(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        Ok(self.registry.render(name, context)?)
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}
