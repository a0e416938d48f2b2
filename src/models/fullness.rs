use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How full the stomach felt before the meal, on the 0-3 scale the
/// editor presents. Stored numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Fullness {
    Starving,
    Peckish,
    Content,
    Full,
}

impl Fullness {
    /// Numeric level, 0 (starving) through 3 (full).
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl From<Fullness> for u8 {
    fn from(fullness: Fullness) -> u8 {
        fullness as u8
    }
}

impl TryFrom<u8> for Fullness {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Fullness::Starving),
            1 => Ok(Fullness::Peckish),
            2 => Ok(Fullness::Content),
            3 => Ok(Fullness::Full),
            _ => Err(format!("Invalid fullness level '{}'. Valid range: 0-3", level)),
        }
    }
}

impl fmt::Display for Fullness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fullness::Starving => write!(f, "starving"),
            Fullness::Peckish => write!(f, "peckish"),
            Fullness::Content => write!(f, "content"),
            Fullness::Full => write!(f, "full"),
        }
    }
}

impl FromStr for Fullness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(level) = s.parse::<u8>() {
            return Fullness::try_from(level);
        }
        match s.to_lowercase().as_str() {
            "starving" => Ok(Fullness::Starving),
            "peckish" => Ok(Fullness::Peckish),
            "content" => Ok(Fullness::Content),
            "full" => Ok(Fullness::Full),
            _ => Err(format!(
                "Invalid fullness '{}'. Valid options: 0-3 or starving, peckish, content, full",
                s
            )),
        }
    }
}
