//! Print rendered fragments.

use anyhow::Result;
use clap::Args;

use super::CliConfig;
use super::common::{ReferenceArgs, load_store};

/// Print the fragments the given references produce, one per line.
///
/// Namespaces are rendered one after another; output contains nothing but
/// the fragments so it can be pasted into a page.
#[derive(Args, Debug)]
pub struct RenderCommand {
    #[command(flatten)]
    pub references: ReferenceArgs,
}

impl RenderCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let store = load_store(config)?;
        let registry = self.references.registry(store)?;

        for namespace in self.references.selected_namespaces(&registry) {
            for fragment in registry.render(&namespace)? {
                println!("{fragment}");
            }
        }
        Ok(())
    }
}
