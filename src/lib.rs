pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{storage::LocalStorage, toml_config::TomlConfig};

pub use core::{
    etl::{EtlEngine, EtlOutcome},
    pipeline::ProductionPipeline,
};
pub use domain::summary::ProductionSummary;
pub use utils::error::{EtlError, Result};
