pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::MarkerCatalog;
pub use crate::core::progress::{HowFar, ProgressModel, StageScore, TotalProgress};
pub use domain::model::{Classroom, McScore, StageRecord, StoryState};
pub use utils::error::{Result, StateError};
