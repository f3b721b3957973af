//! `install`: the `package:initialize` hook.

use anyhow::Result;
use clap::Args;
use std::time::Duration;

use crate::hooks::package_initialize;
use crate::installer::CommandInstaller;
use crate::service::ServiceDefinition;

/// Install the dependencies of every layer that has a `nodejs` directory.
#[derive(Args, Debug)]
pub struct InstallCommand {
    /// Kill a package manager run that takes longer than this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print the install summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl InstallCommand {
    pub async fn execute(self, service: &ServiceDefinition) -> Result<()> {
        let installer = CommandInstaller::with_timeout(self.timeout.map(Duration::from_secs));
        let summary = package_initialize(service, &installer).await?;

        if self.json {
            super::print_json(&summary)?;
        }
        Ok(())
    }
}
