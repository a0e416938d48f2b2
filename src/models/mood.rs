use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Emotional read on the meal, recorded after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Satisfied,
    Neutral,
    Guilt,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Satisfied => write!(f, "satisfied"),
            Mood::Neutral => write!(f, "neutral"),
            Mood::Guilt => write!(f, "guilt"),
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "satisfied" => Ok(Mood::Satisfied),
            "neutral" => Ok(Mood::Neutral),
            "guilt" => Ok(Mood::Guilt),
            _ => Err(format!(
                "Invalid mood '{}'. Valid options: satisfied, neutral, guilt",
                s
            )),
        }
    }
}
