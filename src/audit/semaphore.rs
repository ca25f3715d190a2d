use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Traffic-light status attached to every audit dimension.
///
/// `Gray` is reserved for metrics that could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemaphoreColor {
    Green,
    Yellow,
    Red,
    Critical,
    Gray,
}

/// Display-agnostic severity derived from a semaphore color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Healthy,
    Warning,
    Alert,
    Critical,
    Unknown,
}

impl Severity {
    /// Sort key where larger means worse. Unknown sorts below Healthy.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Healthy => 1,
            Self::Warning => 2,
            Self::Alert => 3,
            Self::Critical => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Warning => "Warning",
            Self::Alert => "Alert",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        }
    }
}

impl SemaphoreColor {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Green,
            Self::Yellow,
            Self::Red,
            Self::Critical,
            Self::Gray,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Critical => "critical",
            Self::Gray => "gray",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            Self::Green => Severity::Healthy,
            Self::Yellow => Severity::Warning,
            Self::Red => Severity::Alert,
            Self::Critical => Severity::Critical,
            Self::Gray => Severity::Unknown,
        }
    }

    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#22c55e",
            Self::Yellow => "#eab308",
            Self::Red => "#ef4444",
            Self::Critical => "#991b1b",
            Self::Gray => "#6b7280",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Green => (0x22, 0xc5, 0x5e),
            Self::Yellow => (0xea, 0xb3, 0x08),
            Self::Red => (0xef, 0x44, 0x44),
            Self::Critical => (0x99, 0x1b, 0x1b),
            Self::Gray => (0x6b, 0x72, 0x80),
        }
    }

    pub const fn is_computable(self) -> bool {
        !matches!(self, Self::Gray)
    }
}

impl fmt::Display for SemaphoreColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown semaphore color '{0}'")]
pub struct UnknownColor(pub String);

impl FromStr for SemaphoreColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            "critical" => Ok(Self::Critical),
            "gray" => Ok(Self::Gray),
            _ => Err(UnknownColor(s.to_string())),
        }
    }
}
