use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why the meal happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Stress,
    Boredom,
    Social,
    Routine,
    Craving,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Stress => write!(f, "stress"),
            Trigger::Boredom => write!(f, "boredom"),
            Trigger::Social => write!(f, "social"),
            Trigger::Routine => write!(f, "routine"),
            Trigger::Craving => write!(f, "craving"),
        }
    }
}

impl FromStr for Trigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stress" => Ok(Trigger::Stress),
            "boredom" => Ok(Trigger::Boredom),
            "social" => Ok(Trigger::Social),
            "routine" => Ok(Trigger::Routine),
            "craving" => Ok(Trigger::Craving),
            _ => Err(format!(
                "Invalid trigger '{}'. Valid options: stress, boredom, social, routine, craving",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_display() {
        assert_eq!(format!("{}", Trigger::Stress), "stress");
        assert_eq!(format!("{}", Trigger::Craving), "craving");
    }

    #[test]
    fn test_trigger_from_str() {
        assert_eq!(Trigger::from_str("stress").unwrap(), Trigger::Stress);
        assert_eq!(Trigger::from_str("SOCIAL").unwrap(), Trigger::Social);
        assert!(Trigger::from_str("hunger").is_err());
        assert!(Trigger::from_str("").is_err());
    }

    #[test]
    fn test_trigger_json_roundtrip() {
        let json = serde_json::to_string(&Trigger::Boredom).unwrap();
        assert_eq!(json, "\"boredom\"");

        let parsed: Trigger = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Trigger::Boredom);
    }
}
