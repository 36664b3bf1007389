use crate::utils::error::{Result, StateError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Canonical marker catalog: for each stage-key, the ordered sub-steps the
/// exercise walks through. Loaded once at startup and shared read-only among
/// every model built against it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerCatalog {
    #[serde(default)]
    pub markers: BTreeMap<String, Vec<String>>,
}

impl MarkerCatalog {
    pub fn from_map(markers: BTreeMap<String, Vec<String>>) -> Self {
        Self { markers }
    }

    /// Load the catalog from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StateError::IoError)?;
        Self::from_str(&content)
    }

    /// Parse the catalog from TOML text.
    pub fn from_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let catalog: MarkerCatalog =
            toml::from_str(&processed_content).map_err(|e| StateError::ConfigValidationError {
                field: "marker_catalog".to_string(),
                message: format!("Catalog TOML parsing error: {}", e),
            })?;
        catalog.validate()?;

        tracing::debug!("Loaded marker catalog for {} stages", catalog.stage_count());
        Ok(catalog)
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate(&self) -> Result<()> {
        for (stage, markers) in &self.markers {
            validate_non_empty_string("markers", stage)?;

            if markers.is_empty() {
                return Err(StateError::ConfigValidationError {
                    field: format!("markers.{}", stage),
                    message: "Marker sequence cannot be empty".to_string(),
                });
            }

            let mut seen: HashSet<&str> = HashSet::new();
            for marker in markers {
                validate_non_empty_string(&format!("markers.{}", stage), marker)?;
                if !seen.insert(marker.as_str()) {
                    return Err(StateError::ConfigValidationError {
                        field: format!("markers.{}", stage),
                        message: format!("Duplicate marker id '{}'", marker),
                    });
                }
            }
        }
        Ok(())
    }

    /// Ordered marker sequence for a stage-key, if the stage tracks markers.
    pub fn markers_for(&self, stage_key: &str) -> Option<&[String]> {
        self.markers.get(stage_key).map(|m| m.as_slice())
    }

    pub fn stage_count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl Validate for MarkerCatalog {
    fn validate(&self) -> Result<()> {
        self.validate()
    }
}
