//! `<script>` inclusion processor.
//!
//! Options (namespace-wide, overridable per bundle through `extra_context`):
//!
//! | key | type | default |
//! |---|---|---|
//! | `type` | string | `text/javascript` |
//! | `async` | bool | `false` |
//! | `defer` | bool | `false` |
//! | `charset` | string | `utf-8` |
//! | `id` | string pattern, `{name}` and `{url}` substituted | none |
//!
//! A namespace of client-side templates typically sets
//! `type = "text/ng-template"` and `id = "{url}"` so each template is
//! addressable by its URL.

use anyhow::{Context, Result};
use std::fmt::Write;

use super::{Processor, ProcessorContext, escape_attr};
use crate::config::{BundleConfig, ProcessorOptions};

const DEFAULT_TYPE: &str = "text/javascript";
const DEFAULT_CHARSET: &str = "utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptOptions {
    mime_type: String,
    is_async: bool,
    defer: bool,
    charset: String,
    id: Option<String>,
}

impl ScriptOptions {
    fn from_options(options: &ProcessorOptions) -> Result<Self> {
        Ok(Self {
            mime_type: options.get_str("type")?.unwrap_or(DEFAULT_TYPE).to_string(),
            is_async: options.get_bool("async")?.unwrap_or(false),
            defer: options.get_bool("defer")?.unwrap_or(false),
            charset: options.get_str("charset")?.unwrap_or(DEFAULT_CHARSET).to_string(),
            id: options.get_str("id")?.map(str::to_string),
        })
    }

    fn tag(&self, bundle_name: &str, url: &str) -> String {
        let mut tag = String::from("<script");
        if let Some(pattern) = &self.id {
            let id = pattern.replace("{name}", bundle_name).replace("{url}", url);
            let _ = write!(tag, " id=\"{}\"", escape_attr(&id));
        }
        if self.is_async {
            tag.push_str(" async");
        }
        if self.defer {
            tag.push_str(" defer");
        }
        let _ = write!(
            tag,
            " type=\"{}\" src=\"{}\" charset=\"{}\"></script>",
            escape_attr(&self.mime_type),
            escape_attr(url),
            escape_attr(&self.charset)
        );
        tag
    }
}

/// Renders a bundle as `<script>` tags.
#[derive(Debug)]
pub struct ScriptProcessor {
    context: ProcessorContext,
}

impl ScriptProcessor {
    /// Create the processor, validating the namespace options up front.
    pub fn new(options: &ProcessorOptions, context: ProcessorContext) -> Result<Self> {
        ScriptOptions::from_options(options)?;
        Ok(Self {
            context,
        })
    }
}

impl Processor for ScriptProcessor {
    fn render(
        &self,
        bundle_name: &str,
        bundle: &BundleConfig,
        options: &ProcessorOptions,
    ) -> Result<Vec<String>> {
        let options = ScriptOptions::from_options(&options.overlay(&bundle.extra_context))
            .with_context(|| format!("invalid extra_context for bundle '{bundle_name}'"))?;

        Ok(self
            .context
            .asset_urls(bundle)?
            .iter()
            .map(|url| options.tag(bundle_name, url))
            .collect())
    }
}
