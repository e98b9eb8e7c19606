// src/config.rs

use crate::error::CounterError;
use crate::types::SessionConfig;
use anyhow::{Context, Result};
use std::fs;

impl SessionConfig {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        let config: SessionConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would silently miscount.
    pub fn validate(&self) -> std::result::Result<(), CounterError> {
        if !self.reps.joints.is_empty() && self.reps.low_deg >= self.reps.high_deg {
            return Err(CounterError::InvalidThresholds {
                low: self.reps.low_deg,
                high: self.reps.high_deg,
            });
        }
        if let Some(speed) = &self.speed {
            if speed.pixels_per_meter <= 0.0 {
                return Err(CounterError::InvalidCalibration {
                    pixels_per_meter: speed.pixels_per_meter,
                });
            }
        }
        if let Some(crossing) = &self.crossing {
            if crossing.band <= 0.0 {
                return Err(CounterError::InvalidBand {
                    band: crossing.band,
                });
            }
        }
        Ok(())
    }
}
