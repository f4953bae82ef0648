use super::load_config;
use crate::errors::AppResult;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigCommand {
    /// Configuration file (defaults to metrics.toml in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn run(&self) -> AppResult<()> {
        let config = load_config(self.config.as_deref(), None)?;
        print!("{}", config.to_toml_string()?);
        Ok(())
    }
}
