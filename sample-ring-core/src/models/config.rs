use serde::{Deserialize, Serialize};

use super::error::RingError;

/// Configuration for building and looping ring buffers.
///
/// Missing fields fall back to [`RingConfiguration::default`] when parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfiguration {
    /// Maximum number of unread samples (default: 1024). Zero is allowed.
    pub capacity: usize,

    /// Factor used by `RingBuffer::loop_with` (default: 2.0).
    pub loop_factor: f64,
}

impl RingConfiguration {
    pub fn validate(&self) -> Result<(), RingError> {
        if !self.loop_factor.is_finite() || self.loop_factor < 0.0 {
            return Err(RingError::InvalidFactor(self.loop_factor));
        }
        Ok(())
    }

    /// Parse a JSON document and validate the result.
    pub fn from_json(json: &str) -> Result<Self, RingError> {
        let config: RingConfiguration = serde_json::from_str(json)
            .map_err(|e| RingError::ConfigurationFailed(format!("failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for RingConfiguration {
    fn default() -> Self {
        Self {
            capacity: 1024,
            loop_factor: 2.0,
        }
    }
}
