//! `hook <event>`: run a lifecycle hook by its host name.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use crate::hooks::{HookEvent, run_hook};
use crate::installer::CommandInstaller;
use crate::service::ServiceDefinition;

/// Run the layer manager's work for one host lifecycle event.
#[derive(Args, Debug)]
pub struct HookCommand {
    /// Host event name: package:initialize or before:deploy:deploy
    event: String,

    /// Compiled template for before:deploy:deploy
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,

    /// Kill a package manager run that takes longer than this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print the hook outcome as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl HookCommand {
    pub async fn execute(self, service: &ServiceDefinition) -> Result<()> {
        let installer = CommandInstaller::with_timeout(self.timeout.map(Duration::from_secs));
        let event: HookEvent = self.event.parse()?;
        let path = super::resolve_template_path(service, self.template.as_deref());

        let outcome = run_hook(event, service, &path, &installer).await?;

        if self.json {
            super::print_json(&outcome)?;
        }
        Ok(())
    }
}
