use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::error::{Result, StateError};

/// One stage entry inside a snapshot. Only `marker` and `index` are read;
/// any other field the client attaches is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageRecord {
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub index: Option<i64>,
}

/// Classroom metadata attached to a snapshot. Every field is nullable and
/// defaults to `None` when the classroom block is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Classroom {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub educator_id: Option<i64>,
    #[serde(default)]
    pub asynchronous: Option<bool>,
}

/// Multiple-choice scoring record for a single question. Each question is
/// worth a fixed 10 points whether or not a score was recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McScore {
    #[serde(default)]
    pub score: Option<i64>,
}

/// One student's story state, parsed from the raw nested snapshot.
///
/// `stages` is the only structurally required field; everything else fills
/// in a documented default when absent. `stage_index`, `max_stage_index` and
/// `total_score` use `None` as the unknown sentinel, which downstream
/// derivations surface as NaN rather than zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryState {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub stages: BTreeMap<String, StageRecord>,
    #[serde(default)]
    pub classroom: Classroom,
    #[serde(default)]
    pub responses: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub mc_scoring: BTreeMap<String, BTreeMap<String, Option<McScore>>>,
    #[serde(default)]
    pub stage_index: Option<i64>,
    // absent means "never advanced" (stage 0); an explicit null means unknown
    #[serde(default = "default_max_stage_index")]
    pub max_stage_index: Option<i64>,
    #[serde(default)]
    pub total_score: Option<f64>,
    #[serde(default)]
    pub student_user: serde_json::Value,
    #[serde(default)]
    pub teacher_user: serde_json::Value,
    #[serde(default)]
    pub has_best_fit_galaxy: bool,
}

fn default_max_stage_index() -> Option<i64> {
    Some(0)
}

impl StoryState {
    /// Parse a snapshot from an already-deserialized JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let state: StoryState =
            serde_json::from_value(value).map_err(|e| StateError::SnapshotError {
                message: format!("Snapshot does not match the story state shape: {}", e),
            })?;
        tracing::debug!(
            "Parsed snapshot '{}' with {} stages",
            state.name,
            state.stages.len()
        );
        Ok(state)
    }

    /// Parse a snapshot from raw JSON text.
    pub fn from_str(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }
}
