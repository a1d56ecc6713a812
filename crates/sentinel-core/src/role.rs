use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0} (expected citizen, manager or hospital)")]
pub struct UnknownRole(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Citizen,
    Manager,
    Hospital,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Manager => "manager",
            Self::Hospital => "hospital",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Citizen => "Citizen",
            Self::Manager => "CDC Manager",
            Self::Hospital => "Hospital",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "citizen" => Ok(Self::Citizen),
            "manager" | "cdc" => Ok(Self::Manager),
            "hospital" => Ok(Self::Hospital),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
