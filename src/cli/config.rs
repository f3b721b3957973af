//! `config`: show the effective configuration.

use anyhow::Result;
use clap::Args;

use crate::hooks::load_config;
use crate::service::ServiceDefinition;

/// Print `custom.layerConfig` merged over the defaults, as JSON.
#[derive(Args, Debug)]
pub struct ConfigCommand {}

impl ConfigCommand {
    pub fn execute(self, service: &ServiceDefinition) -> Result<()> {
        let config = load_config(service)?;
        super::print_json(&config)
    }
}
