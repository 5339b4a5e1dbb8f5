//! Print emission order per namespace.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;

use super::common::{ReferenceArgs, load_store};
use super::{CliConfig, OutputFormat};

/// Print bundle names per namespace in emission order.
///
/// ```bash
/// bundlejam order angular-resource
/// bundlejam order angular-resource --namespace js --format json
/// ```
#[derive(Args, Debug)]
pub struct OrderCommand {
    #[command(flatten)]
    pub references: ReferenceArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl OrderCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let store = load_store(config)?;
        let registry = self.references.registry(store)?;

        let mut orders = BTreeMap::new();
        let namespaces = self.references.selected_namespaces(&registry);
        for namespace in &namespaces {
            orders.insert(namespace.as_str(), registry.order(namespace)?);
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&orders)?),
            OutputFormat::Text => {
                for namespace in &namespaces {
                    println!("{}", format!("[{namespace}]").bold());
                    for bundle in &orders[namespace.as_str()] {
                        println!("  {bundle}");
                    }
                }
            }
        }
        Ok(())
    }
}
