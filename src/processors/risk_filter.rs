use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SaihError};
use crate::models::{RiskLevel, Station};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Equal,
    #[default]
    #[serde(rename = "greater_equal")]
    GreaterOrEqual,
}

impl FromStr for Comparison {
    type Err = SaihError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" | "eq" | "=" | "==" => Ok(Comparison::Equal),
            "greater_equal" | "greater_or_equal" | "greaterorequal" | "greater-equal" | "ge" | ">=" => {
                Ok(Comparison::GreaterOrEqual)
            }
            _ => Err(SaihError::InvalidComparison(s.to_string())),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Equal => f.write_str("equal"),
            Comparison::GreaterOrEqual => f.write_str("greater_equal"),
        }
    }
}

/// Keeps stations whose alarm level matches a level and comparison.
///
/// Stations without a status code, or with one outside 0..=3, never match.
/// The default filter selects warning or worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFilter {
    pub level: RiskLevel,
    pub comparison: Comparison,
}

impl RiskFilter {
    pub fn new(level: RiskLevel, comparison: Comparison) -> Self {
        Self { level, comparison }
    }

    /// Build a filter from untyped input, rejecting anything out of domain.
    pub fn parse(level: i64, comparison: &str) -> Result<Self> {
        Ok(Self::new(RiskLevel::try_from(level)?, comparison.parse()?))
    }

    pub fn matches(&self, station: &Station) -> bool {
        match station.risk_level() {
            Some(level) => match self.comparison {
                Comparison::Equal => level == self.level,
                Comparison::GreaterOrEqual => level >= self.level,
            },
            None => false,
        }
    }

    /// Matching stations, in input order.
    pub fn filter(&self, stations: &[Station]) -> Vec<Station> {
        stations
            .iter()
            .filter(|station| self.matches(station))
            .cloned()
            .collect()
    }
}

impl Default for RiskFilter {
    fn default() -> Self {
        Self::new(RiskLevel::Warning, Comparison::GreaterOrEqual)
    }
}
