use crate::error::{check_params, BucketError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rate and burst ceiling for one bucket, as read from a TOML file:
///
/// ```toml
/// rate = 2.0
/// capacity = 5.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub rate: f64,
    pub capacity: f64,
}

impl BucketConfig {
    pub fn new(rate: f64, capacity: f64) -> Self {
        Self { rate, capacity }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read bucket config {}", path.display()))?;
        let parsed = toml::from_str::<BucketConfig>(&raw).context("parse bucket config")?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), BucketError> {
        check_params(self.rate, self.capacity)
    }
}
