// Domain layer: typed snapshot records parsed from the raw story state.

pub mod model;

pub use model::{Classroom, McScore, StageRecord, StoryState};
