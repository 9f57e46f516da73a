pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_sources, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "slcsp-etl")]
#[command(about = "Compute the second-lowest-cost Silver plan rate for a list of ZIP codes")]
pub struct CliConfig {
    #[arg(long, default_value = ".", help = "Directory the input and output files are resolved against")]
    pub data_dir: String,

    #[arg(long, default_value = "plans.csv")]
    pub plans_file: String,

    #[arg(long, default_value = "zips.csv")]
    pub zips_file: String,

    #[arg(long, default_value = "slcsp.csv")]
    pub slcsp_file: String,

    #[arg(long, default_value = "slcsp_output.csv")]
    pub output_file: String,

    #[arg(long, default_value = "1", help = "Number of tasks resolving ZIP codes in parallel")]
    pub workers: usize,

    #[arg(long, help = "Also print the output CSV to stdout")]
    pub stdout: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage after each phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn plans_file(&self) -> &str {
        &self.plans_file
    }

    fn zips_file(&self) -> &str {
        &self.zips_file
    }

    fn slcsp_file(&self) -> &str {
        &self.slcsp_file
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn print_to_stdout(&self) -> bool {
        self.stdout
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_sources(self)
    }
}
