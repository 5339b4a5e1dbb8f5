//! `<link rel="stylesheet">` inclusion processor.
//!
//! Options: `type` (default `text/css`), and the optional attributes
//! `media`, `title`, `charset`. All can be overridden per bundle through
//! `extra_context`.

use anyhow::{Context, Result};
use std::fmt::Write;

use super::{Processor, ProcessorContext, escape_attr};
use crate::config::{BundleConfig, ProcessorOptions};

const DEFAULT_TYPE: &str = "text/css";

#[derive(Debug, Clone, PartialEq, Eq)]
struct StylesheetOptions {
    mime_type: String,
    media: Option<String>,
    title: Option<String>,
    charset: Option<String>,
}

impl StylesheetOptions {
    fn from_options(options: &ProcessorOptions) -> Result<Self> {
        Ok(Self {
            mime_type: options.get_str("type")?.unwrap_or(DEFAULT_TYPE).to_string(),
            media: options.get_str("media")?.map(str::to_string),
            title: options.get_str("title")?.map(str::to_string),
            charset: options.get_str("charset")?.map(str::to_string),
        })
    }

    fn tag(&self, url: &str) -> String {
        let mut tag = format!(
            "<link href=\"{}\" rel=\"stylesheet\" type=\"{}\"",
            escape_attr(url),
            escape_attr(&self.mime_type)
        );
        for (name, value) in
            [("media", &self.media), ("title", &self.title), ("charset", &self.charset)]
        {
            if let Some(value) = value {
                let _ = write!(tag, " {name}=\"{}\"", escape_attr(value));
            }
        }
        tag.push_str(" />");
        tag
    }
}

/// Renders a bundle as stylesheet `<link>` tags.
#[derive(Debug)]
pub struct StylesheetProcessor {
    context: ProcessorContext,
}

impl StylesheetProcessor {
    /// Create the processor, validating the namespace options up front.
    pub fn new(options: &ProcessorOptions, context: ProcessorContext) -> Result<Self> {
        StylesheetOptions::from_options(options)?;
        Ok(Self {
            context,
        })
    }
}

impl Processor for StylesheetProcessor {
    fn render(
        &self,
        bundle_name: &str,
        bundle: &BundleConfig,
        options: &ProcessorOptions,
    ) -> Result<Vec<String>> {
        let options = StylesheetOptions::from_options(&options.overlay(&bundle.extra_context))
            .with_context(|| format!("invalid extra_context for bundle '{bundle_name}'"))?;

        Ok(self.context.asset_urls(bundle)?.iter().map(|url| options.tag(url)).collect())
    }
}
