//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::embedded;

/// Errors loading or rendering a template
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt template not found: {0}")]
    NotFound(String),

    #[error("Failed to read prompt {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader with an optional override directory
    pub fn new(user_dir: Option<&Path>) -> Self {
        debug!(?user_dir, "PromptLoader::new: called");
        let user_dir = user_dir.filter(|d| d.is_dir()).map(Path::to_path_buf);
        if user_dir.is_none() {
            debug!("PromptLoader::new: no user override directory");
        }
        Self {
            hbs: Self::engine(),
            user_dir,
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    // Model output flows into templates, so HTML escaping must be off
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{prompts-dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String, PromptError> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path).map_err(|source| PromptError::Read { path, source });
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String, PromptError> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|source| PromptError::Render {
                name: template_name.to_string(),
                source: Box::new(source),
            })
    }
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::embedded_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_render_does_not_escape() {
        let loader = PromptLoader::embedded_only();
        let ctx = serde_json::json!({
            "title": "Senior Art Director",
            "backstory": "Loves <bold> & \"quoted\" ideas",
            "goal": "Make it {{pop}}",
            "tools": null
        });

        let rendered = loader.render("agent", &ctx).unwrap();
        assert!(rendered.contains("Loves <bold> & \"quoted\" ideas"));
        assert!(rendered.contains("Make it {{pop}}"));
    }

    #[test]
    fn test_user_override_wins() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("research.pmt"), "Custom research for {{product_name}}").unwrap();

        let loader = PromptLoader::new(Some(dir.path()));
        let rendered = loader
            .render("research", &serde_json::json!({"product_name": "AeroFlow Pro"}))
            .unwrap();
        assert_eq!(rendered, "Custom research for AeroFlow Pro");

        // Templates without an override still come from the embedded set
        let agent = loader
            .render("agent", &serde_json::json!({"title": "T", "backstory": "B", "goal": "G"}))
            .unwrap();
        assert!(agent.contains("You are the T."));
    }

    #[test]
    fn test_broken_override_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("research.pmt"), "{{#if product_name}}unclosed").unwrap();

        let loader = PromptLoader::new(Some(dir.path()));
        let result = loader.render("research", &serde_json::json!({"product_name": "X"}));
        assert!(matches!(result, Err(PromptError::Render { .. })));
    }

    #[test]
    fn test_missing_dir_falls_back() {
        let loader = PromptLoader::new(Some(Path::new("/nonexistent/prompts")));
        assert!(loader.load_template("management").is_ok());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        let result = loader.load_template("nonexistent-template");
        assert!(matches!(result, Err(PromptError::NotFound(_))));
    }
}
