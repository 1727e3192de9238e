pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod domain;
pub mod resilience;
pub mod store;
pub mod ui;

#[cfg(test)]
mod test_support;

use std::io;

use anyhow::Result;
use cli::Cli;

pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.app_config();
    let mut stdout = io::stdout();
    commands::execute(&cli.command, config, &mut stdout).await
}
