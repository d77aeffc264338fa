//! CLI argument definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{Config, Overrides};
use crate::pipeline;

#[derive(Parser)]
#[command(name = "topdl")]
#[command(about = "Report the Artifactory artifacts with the two highest download counts")]
#[command(version)]
pub struct Cli {
    /// Configuration file with api_host / api_key / api_json entries
    #[arg(long, value_name = "FILE")]
    pub conf: PathBuf,

    /// Artifactory hostname (overrides the configuration file)
    #[arg(long)]
    pub host: Option<String>,

    /// API key (overrides the configuration file)
    #[arg(long)]
    pub key: Option<String>,

    /// Emit the report as JSON ("true", "yes" or "1"; anything else means text)
    #[arg(long, value_name = "BOOL")]
    pub json: Option<String>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let overrides = Overrides {
            host: self.host,
            key: self.key,
            json: self.json,
        };

        let config = Config::resolve(&self.conf, overrides)?;
        pipeline::run(config).await
    }
}
