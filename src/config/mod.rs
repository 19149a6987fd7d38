pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Draw secret santa pairs and email every gifter their giftee")]
pub struct CliConfig {
    /// Roster file, one `First Last, email` per line
    #[arg(short, long, default_value = "participants.txt")]
    pub participants: String,

    /// Previous period's assignment file; pairings in it are not repeated
    #[arg(long)]
    pub history: Option<String>,

    /// Where this run's assignment is written
    #[arg(short, long, default_value = "assignations.txt")]
    pub output: String,

    /// Mail settings (TOML)
    #[arg(short, long, default_value = "santa.toml")]
    pub config: String,

    /// Seed for the shuffle, for reproducible draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Draw and check only; nothing is written or sent
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("participants", &self.participants)?;
        validate_path("output", &self.output)?;
        if let Some(history) = &self.history {
            validate_path("history", history)?;
        }
        if !self.dry_run {
            validate_path("config", &self.config)?;
        }
        Ok(())
    }
}
