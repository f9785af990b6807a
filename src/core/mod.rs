pub mod deployer;
pub mod secrets;
pub mod verify;

pub use crate::domain::model::{DeployReport, Invocation, StepOutcome};
pub use crate::domain::ports::{ConfigProvider, ProcessRunner};
pub use crate::utils::error::Result;
