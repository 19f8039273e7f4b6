//! Culling strategy selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::CullError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CullStrategy {
    /// Snapshot order, no protection
    Random,
    /// Hotspot penalty, then priority tiers with kind balancing
    Priority,
}

impl CullStrategy {
    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("random") {
            Some(CullStrategy::Random)
        } else if name.eq_ignore_ascii_case("priority") {
            Some(CullStrategy::Priority)
        } else {
            None
        }
    }
}

impl FromStr for CullStrategy {
    type Err = CullError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CullError::UnknownStrategy(s.to_string()))
    }
}

impl fmt::Display for CullStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CullStrategy::Random => write!(f, "RANDOM"),
            CullStrategy::Priority => write!(f, "PRIORITY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_ignores_case() {
        assert_eq!(CullStrategy::from_name("RANDOM"), Some(CullStrategy::Random));
        assert_eq!(CullStrategy::from_name("Priority"), Some(CullStrategy::Priority));
        assert_eq!(CullStrategy::from_name(" priority "), Some(CullStrategy::Priority));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(CullStrategy::from_name("fastest"), None);
        assert!(matches!(
            "".parse::<CullStrategy>(),
            Err(CullError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for strategy in [CullStrategy::Random, CullStrategy::Priority] {
            assert_eq!(strategy.to_string().parse::<CullStrategy>().unwrap(), strategy);
        }
    }
}
