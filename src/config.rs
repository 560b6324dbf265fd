use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

/// trading days used by the benchmark compounding convention
pub const BUSINESS_DAYS_PER_YEAR: u32 = 252;

/// engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// compounding divisor for annual to daily conversion
    pub trading_days_per_year: u32,
    /// obligations due within this many days are flagged as due soon
    pub due_soon_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::business_days()
    }
}

impl EngineConfig {
    /// benchmark rates compounded over business days
    pub fn business_days() -> Self {
        Self {
            trading_days_per_year: BUSINESS_DAYS_PER_YEAR,
            due_soon_days: 7,
        }
    }

    /// benchmark rates compounded over calendar days
    pub fn calendar_days() -> Self {
        Self {
            trading_days_per_year: 365,
            due_soon_days: 7,
        }
    }

    pub fn with_due_soon_days(mut self, days: u32) -> Self {
        self.due_soon_days = days;
        self
    }

    /// load and validate from json
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.trading_days_per_year == 0 {
            return Err(EngineError::InvalidConfiguration {
                message: "trading_days_per_year must be positive".to_string(),
            });
        }
        Ok(())
    }
}
