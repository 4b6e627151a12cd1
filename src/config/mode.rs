use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::DashboardError;

/// Environment flag selecting the mock data files over the warehouse.
pub const MOCK_FLAG_ENV: &str = "USE_MOCK_DATA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Mock,
    Live,
}

impl DataMode {
    /// Only a case-insensitive `"true"` selects mock mode. Anything else,
    /// including an unset or empty flag, selects live mode.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(value) if value.eq_ignore_ascii_case("true") => DataMode::Mock,
            _ => DataMode::Live,
        }
    }

    pub fn from_env() -> Self {
        let flag = std::env::var(MOCK_FLAG_ENV).ok();
        Self::from_flag(flag.as_deref())
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataMode::Mock => f.write_str("mock"),
            DataMode::Live => f.write_str("live"),
        }
    }
}

impl FromStr for DataMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(DataMode::Mock),
            "live" => Ok(DataMode::Live),
            _ => Err(DashboardError::InvalidConfigValueError {
                field: "mode".to_string(),
                value: s.to_string(),
                reason: "Expected 'mock' or 'live'".to_string(),
            }),
        }
    }
}
