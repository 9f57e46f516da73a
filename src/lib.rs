pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    etl::EtlEngine,
    pipeline::SlcspPipeline,
    plan_index::SilverRateIndex,
    resolver::{classify, format_rate, resolve, Resolution},
    zip_index::ZipAreaIndex,
};
pub use domain::model::{PlanRecord, QueryRecord, RateAreaKey, SlcspRow, ZipRecord};
pub use utils::error::{EtlError, Result};
