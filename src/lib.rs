pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::{HealthClient, SystemRunner};
pub use config::DeployConfig;
pub use core::deployer::{DeployEngine, DeployPlan};
pub use utils::error::{DeployError, Result};
