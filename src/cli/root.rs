use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::common::warn;
use crate::config::{env, Config, PublishConfig};
use crate::provision;
use crate::Result;

/// Seed the permission cache and the config store from a yaml file
#[derive(Parser, Debug)]
#[command(version)]
pub struct BootstrapCommand {
    /// Configuration file path
    #[arg(
        long,
        short = 'C',
        default_value = PublishConfig::DEFAULT_FILE,
        env = env::CONFIG_PATH
    )]
    pub config: PathBuf,
    /// Exit with an error when any write failed
    #[arg(long, env = env::STRICT, action = ArgAction::SetTrue)]
    pub strict: bool,
}

/// Parse command line args
pub fn parse() -> BootstrapCommand {
    BootstrapCommand::parse()
}

impl BootstrapCommand {
    pub async fn run(self) -> Result<()> {
        let BootstrapCommand { config, strict } = self;

        let config = Config::load_file(&config).await?;

        let report = provision::run(&config).await?;

        if strict {
            report.into_strict()
        } else {
            if !report.is_clean() {
                warn!("ignoring {} failed write(s)", report.failures().len());
            }
            Ok(())
        }
    }
}
