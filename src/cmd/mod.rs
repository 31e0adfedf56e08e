mod check;
mod config;
mod serve;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};

use crate::config::AuthorizerConfig;

#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Serve(serve::ServeArgs),
    Check(check::CheckArgs),
    Config(config::ShowConfigArgs),
}

#[async_trait(?Send)]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Path of the TOML configuration file. Defaults to `$AUTHORIZER_CONFIG`;
    /// built-in defaults are used when neither is set.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<AuthorizerConfig> {
        AuthorizerConfig::load(self.config.as_deref())
    }
}

impl App {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Serve(args) => args.run().await,
            Commands::Check(args) => args.run().await,
            Commands::Config(args) => args.run().await,
        }
    }
}
