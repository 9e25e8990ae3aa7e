// Zero-elapsed policy value object

use serde::{Deserialize, Serialize};

/// What to do with two consecutive events of one user that carry the same
/// timestamp, where speed is distance divided by zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroElapsedPolicy {
    /// Infinite speed: the later event is flagged regardless of distance.
    #[default]
    Flag,
    /// The pair is ignored.
    Skip,
}

impl ZeroElapsedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZeroElapsedPolicy::Flag => "flag",
            ZeroElapsedPolicy::Skip => "skip",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "flag" => Some(ZeroElapsedPolicy::Flag),
            "skip" => Some(ZeroElapsedPolicy::Skip),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_names_case_insensitively() {
        assert_eq!(ZeroElapsedPolicy::parse("flag"), Some(ZeroElapsedPolicy::Flag));
        assert_eq!(ZeroElapsedPolicy::parse(" SKIP "), Some(ZeroElapsedPolicy::Skip));
        assert_eq!(ZeroElapsedPolicy::parse("ignore"), None);
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for policy in [ZeroElapsedPolicy::Flag, ZeroElapsedPolicy::Skip] {
            assert_eq!(ZeroElapsedPolicy::parse(policy.as_str()), Some(policy));
        }
    }

    #[test]
    fn deserializes_from_lowercase_names() {
        let policy: ZeroElapsedPolicy = serde_json::from_str("\"skip\"").expect("policy");
        assert_eq!(policy, ZeroElapsedPolicy::Skip);
    }
}
