pub mod progress;

pub use crate::config::MarkerCatalog;
pub use crate::domain::model::StoryState;
pub use crate::utils::error::Result;
pub use progress::{HowFar, ProgressModel, StageScore, TotalProgress};
