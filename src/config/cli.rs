use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "story-progress")]
#[command(about = "Derive progress and score metrics from a student story snapshot")]
pub struct CliConfig {
    #[arg(long, help = "Path to the story state snapshot JSON file")]
    pub snapshot: String,

    #[arg(long, default_value = "./markers.toml")]
    pub catalog: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("snapshot", &self.snapshot)?;
        validate_path("catalog", &self.catalog)?;
        Ok(())
    }
}
