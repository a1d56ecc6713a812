use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const HIGH_RISK_THRESHOLD: u8 = 75;
pub const MEDIUM_RISK_THRESHOLD: u8 = 50;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown risk tier: {0}")]
pub struct UnknownTier(pub String);

/// Display tier of a numeric outbreak-risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn classify(risk: u8) -> Self {
        if risk >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if risk >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub const fn hex(self) -> &'static str {
        match self {
            Self::Low => "#22c55e",
            Self::Medium => "#f97316",
            Self::High => "#ef4444",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Low => (0x22, 0xc5, 0x5e),
            Self::Medium => (0xf9, 0x73, 0x16),
            Self::High => (0xef, 0x44, 0x44),
        }
    }

    /// Map markers are only drawn for MEDIUM and HIGH zones.
    pub const fn is_plotted(self) -> bool {
        !matches!(self, Self::Low)
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = UnknownTier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}
