use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::MarkerCatalog;
use crate::domain::model::StoryState;
use crate::utils::error::Result;

/// Fixed maximum per multiple-choice question.
pub const POINTS_PER_QUESTION: u32 = 10;

/// Marker sentinel reported when a stage has no record or no marker field.
/// Distinct from an empty-but-valid marker id; when it reaches a catalog
/// lookup it is simply never found, so lookups resolve to NaN.
pub const NO_MARKER: &str = "none";

/// Score earned and score attainable for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageScore {
    pub score: i64,
    pub possible: u32,
}

/// Human-readable position of the student plus the matching fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct HowFar {
    pub text: String,
    pub fraction: f64,
}

/// Marker-weighted aggregate progress across every catalogued stage.
/// `percent` and `current` are NaN whenever any per-stage contribution is
/// indeterminate; a single unknown stage invalidates the whole aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalProgress {
    pub percent: f64,
    pub total: usize,
    pub current: f64,
}

/// Derived view over one immutable story state snapshot.
///
/// Construction parses the snapshot into typed fields and builds the
/// index/key stage map; every query afterwards is a pure read. A fresh
/// snapshot gets a fresh model, nothing is ever mutated in place.
#[derive(Debug, Clone)]
pub struct ProgressModel {
    state: StoryState,
    catalog: Arc<MarkerCatalog>,
    stage_map: BTreeMap<i64, String>,
}

impl ProgressModel {
    pub fn new(state: StoryState, catalog: Arc<MarkerCatalog>) -> Self {
        let stage_map = build_stage_map(&state);
        Self {
            state,
            catalog,
            stage_map,
        }
    }

    /// Parse a raw snapshot and build the model in one step.
    pub fn from_value(value: serde_json::Value, catalog: Arc<MarkerCatalog>) -> Result<Self> {
        Ok(Self::new(StoryState::from_value(value)?, catalog))
    }

    pub fn state(&self) -> &StoryState {
        &self.state
    }

    pub fn catalog(&self) -> &MarkerCatalog {
        &self.catalog
    }

    /// Stage index -> stage-key association. Numeric stage-keys seed it,
    /// explicit `index` fields override.
    pub fn stage_map(&self) -> &BTreeMap<i64, String> {
        &self.stage_map
    }

    /// Attainable multiple-choice score: 10 per question-key present in the
    /// scoring records, whether or not it was answered.
    pub fn possible_score(&self) -> u32 {
        self.state
            .mc_scoring
            .values()
            .map(|questions| questions.len() as u32 * POINTS_PER_QUESTION)
            .sum()
    }

    /// Earned and attainable score for one stage. A stage with no scoring
    /// entry contributes nothing to either term.
    pub fn stage_score(&self, stage_key: &str) -> StageScore {
        let Some(questions) = self.state.mc_scoring.get(stage_key) else {
            return StageScore {
                score: 0,
                possible: 0,
            };
        };

        let mut score = 0;
        let mut possible = 0;
        for record in questions.values() {
            if let Some(record) = record {
                score += record.score.unwrap_or(0);
            }
            possible += POINTS_PER_QUESTION;
        }
        StageScore { score, possible }
    }

    /// Inverse stage map lookup.
    pub fn stage_name_to_index(&self, key: &str) -> Option<i64> {
        self.stage_map
            .iter()
            .find(|(_, name)| name.as_str() == key)
            .map(|(index, _)| *index)
    }

    /// Where the student got to, as display text plus a fraction of the
    /// highest stage reached. Stages without a catalog entry are free-form
    /// slideshows, so their text carries no percentage.
    pub fn how_far(&self) -> HowFar {
        let Some(stage) = self.state.max_stage_index else {
            return HowFar {
                text: "No stage index".to_string(),
                fraction: 0.0,
            };
        };

        let fraction = self.stage_fraction_completed(Some(stage));
        let text = if self.catalog.markers_for(&stage.to_string()).is_none() {
            format!("In Stage {} slideshow", stage)
        } else {
            format!("{:.0}% through Stage {}", fraction * 100.0, stage)
        };
        HowFar { text, fraction }
    }

    /// Fraction of a stage's marker sequence the student has passed.
    ///
    /// No stage context or no catalog entry counts as fully complete; a
    /// stage never started or without a marker counts as untouched; a
    /// recorded marker missing from the canonical sequence is stale data
    /// and yields NaN so aggregates stay indeterminate instead of lying.
    pub fn stage_fraction_completed(&self, stage: Option<i64>) -> f64 {
        let Some(stage) = stage else {
            return 1.0;
        };

        let key = stage.to_string();
        let Some(markers) = self.catalog.markers_for(&key) else {
            return 1.0;
        };
        let Some(record) = self.state.stages.get(&key) else {
            return 0.0;
        };
        let Some(marker) = record.marker.as_deref() else {
            return 0.0;
        };

        match markers.iter().position(|m| m.as_str() == marker) {
            Some(position) => (position + 1) as f64 / markers.len() as f64,
            None => {
                tracing::warn!("Marker '{}' not in catalog for stage {}", marker, stage);
                f64::NAN
            }
        }
    }

    /// Marker-weighted progress across every stage that has a catalog
    /// entry: position within the active stage, full length for stages
    /// already passed, zero for stages not yet reached.
    pub fn total_fraction_completed(&self) -> TotalProgress {
        let current_marker = self.current_marker();
        let mut total = 0usize;
        let mut current = 0.0;

        for key in self.state.stages.keys() {
            let Some(markers) = self.catalog.markers_for(key) else {
                continue;
            };
            total += markers.len();

            current += match key.parse::<i64>().ok() {
                Some(n) if self.state.stage_index == Some(n) => {
                    match markers.iter().position(|m| *m == current_marker) {
                        Some(position) => (position + 1) as f64,
                        None => f64::NAN,
                    }
                }
                Some(n) if self.state.max_stage_index.is_some_and(|max| max > n) => {
                    markers.len() as f64
                }
                _ => 0.0,
            };
        }

        // total == 0 means nothing is measurable, not that nothing was done
        let percent = if current.is_nan() || total == 0 {
            f64::NAN
        } else {
            (100.0 * current / total as f64).floor()
        };

        TotalProgress {
            percent,
            total,
            current,
        }
    }

    /// Total score normalized by the attainable score; NaN when the total
    /// is unknown or no question has been posed yet.
    pub fn score(&self) -> f64 {
        let possible = self.possible_score();
        match (self.state.total_score, possible) {
            (Some(total), possible) if possible > 0 => total / possible as f64,
            _ => f64::NAN,
        }
    }

    /// Sum of earned stage scores over every stage in the snapshot.
    pub fn story_score(&self) -> i64 {
        self.state
            .stages
            .keys()
            .map(|key| self.stage_score(key).score)
            .sum()
    }

    /// Marker at the current stage, or the `"none"` sentinel.
    pub fn current_marker(&self) -> String {
        self.marker_at(self.state.stage_index)
    }

    /// Marker at the highest stage reached, or the `"none"` sentinel.
    pub fn max_marker(&self) -> String {
        self.marker_at(self.state.max_stage_index)
    }

    fn marker_at(&self, stage: Option<i64>) -> String {
        stage
            .and_then(|s| self.state.stages.get(&s.to_string()))
            .and_then(|record| record.marker.clone())
            .unwrap_or_else(|| NO_MARKER.to_string())
    }

    pub fn percent_completion(&self) -> f64 {
        self.total_fraction_completed().percent
    }
}

fn build_stage_map(state: &StoryState) -> BTreeMap<i64, String> {
    let mut map: BTreeMap<i64, String> = state
        .stages
        .keys()
        .filter_map(|key| key.parse::<i64>().ok().map(|n| (n, key.clone())))
        .collect();

    // explicit index fields win over the numeric-key default
    for (key, record) in &state.stages {
        if let Some(index) = record.index {
            map.insert(index, key.clone());
        }
    }
    map
}
