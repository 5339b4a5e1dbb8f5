//! Render a page template with its assets.

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use super::common::load_store;
use crate::registry::AssetRegistry;
use crate::templating::PageRenderer;

/// Render a Tera page template with its assets.
///
/// Without `--templates`, `TEMPLATE` is a file path rendered on its own.
/// With it, every matching template is loaded and `TEMPLATE` is a template
/// name, so `extends` and `include` work.
///
/// ```bash
/// bundlejam page page.html
/// bundlejam page index.html --templates 'templates/**/*.html' --context ctx.json
/// ```
#[derive(Args, Debug)]
pub struct PageCommand {
    /// Template file, or template name when `--templates` is given
    pub template: String,

    /// Glob of templates to load, e.g. `templates/**/*.html`
    #[arg(long, value_name = "GLOB")]
    pub templates: Option<String>,

    /// JSON file whose top-level object becomes the template context
    #[arg(long, value_name = "JSON_FILE")]
    pub context: Option<PathBuf>,
}

impl PageCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let store = load_store(config)?;
        let context = self.load_context()?;
        let mut registry = AssetRegistry::new(store);

        let html = match &self.templates {
            Some(glob) => {
                let renderer = PageRenderer::from_glob(glob)?;
                renderer.render(&self.template, &context, &mut registry)?
            }
            None => {
                let content = std::fs::read_to_string(&self.template)
                    .with_context(|| format!("Failed to read template: {}", self.template))?;
                PageRenderer::new()
                    .render_str(&content, &context, &mut registry)
                    .with_context(|| format!("Failed to render {}", self.template))?
            }
        };

        print!("{html}");
        if !html.ends_with('\n') {
            println!();
        }
        Ok(())
    }

    fn load_context(&self) -> Result<tera::Context> {
        let Some(path) = &self.context else {
            return Ok(tera::Context::new());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read context file: {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse context file: {}", path.display()))?;
        if !value.is_object() {
            bail!("Context file {} must contain a JSON object", path.display());
        }
        tera::Context::from_value(value)
            .with_context(|| format!("Invalid context in {}", path.display()))
    }
}
