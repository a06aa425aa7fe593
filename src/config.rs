use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{RelatedError, Result};

pub const DEFAULT_MAX_COUNT: usize = 5;
pub const DEFAULT_MIN_SCORE: f64 = -10.0;
pub const DEFAULT_ACCURACY: f64 = 1.0;

/// Options consumed by `RelatedEngine::build`
///
/// Every field has a default, so a partial YAML mapping deserializes into a
/// config where only the given keys differ from the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedConfig {
    /// cap on related entries per document
    pub max_count: usize,
    /// score floor for inclusion
    pub min_score: f64,
    /// 1.0 = exact TF-IDF, below 1.0 = latent reduction keeping that fraction of dimensions
    pub accuracy: f64,
    /// raw word -> weight multiplier, matched after stemming
    pub weights: IndexMap<String, f64>,
    /// a document's self-correlation is 0, so a non-positive floor would admit it
    pub include_self: bool,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            min_score: DEFAULT_MIN_SCORE,
            accuracy: DEFAULT_ACCURACY,
            weights: IndexMap::new(),
            include_self: false,
        }
    }
}

/// Site-level YAML document; only the `related` section is read
#[derive(Debug, Default, Deserialize)]
struct SiteConfig {
    #[serde(default)]
    related: Option<RelatedConfig>,
}

impl RelatedConfig {
    /// Parse a bare `related` mapping
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a whole site config and merge its `related:` section over the defaults
    pub fn from_site_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let site: SiteConfig = serde_yaml::from_str(yaml)?;
        Ok(site.related.unwrap_or_default())
    }

    pub fn from_site_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| RelatedError::io(path, e))?;
        Self::from_site_yaml(&raw)
    }

    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_weight(mut self, word: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(word.into(), weight);
        self
    }

    pub fn with_include_self(mut self, include_self: bool) -> Self {
        self.include_self = include_self;
        self
    }

    /// true when the latent reduction stage has to run
    #[inline]
    pub fn uses_reduction(&self) -> bool {
        self.accuracy < 1.0
    }

    /// Reject values the build cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.accuracy.is_finite() || self.accuracy <= 0.0 || self.accuracy > 1.0 {
            return Err(RelatedError::InvalidAccuracy(self.accuracy));
        }
        if !self.min_score.is_finite() {
            return Err(RelatedError::InvalidConfig(format!(
                "min_score is not finite: {}",
                self.min_score
            )));
        }
        if let Some((word, weight)) = self.weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(RelatedError::InvalidConfig(format!(
                "weight for {word:?} is not finite: {weight}"
            )));
        }
        Ok(())
    }
}
