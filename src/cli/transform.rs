//! `transform`: the `before:deploy:deploy` hook.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::hooks::before_deploy;
use crate::service::ServiceDefinition;
use crate::template::CompiledTemplate;

/// Export layer outputs and upgrade layer references, rewriting the template in place.
#[derive(Args, Debug)]
pub struct TransformCommand {
    /// Compiled template to rewrite
    /// (default: .serverless/cloudformation-template-update-stack.json next to the service definition)
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,

    /// Print the transform summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl TransformCommand {
    pub fn execute(self, service: &ServiceDefinition) -> Result<()> {
        let path = super::resolve_template_path(service, self.template.as_deref());
        let mut template = CompiledTemplate::load(&path)?;

        let summary = before_deploy(service, &mut template)?;
        template.save(&path)?;

        tracing::info!(
            "Exported {} layers, upgraded {} layer references",
            summary.exported_layers.len(),
            summary.upgraded_layer_references.len()
        );

        if self.json {
            super::print_json(&summary)?;
        }
        Ok(())
    }
}
