//! Declarative cluster configuration, behind the `toml_config` feature —
//! the same feature-gating convention the teacher crate uses for its own
//! config-shaped types.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::strategy::Strategy;
use crate::types::Rank;

/// The configuration an `Owner` needs to construct an [`ElectionEngine`](crate::engine::ElectionEngine):
/// this participant's rank, the cluster size, the arbitration strategy, and
/// (for `Strategy::Disallow`) the initial disallow-set.
#[derive(Debug, Clone, Deserialize)]
pub struct ElectionConfig {
    pub rank: Rank,
    pub cluster_size: u32,
    pub strategy: Strategy,
    #[serde(default)]
    pub disallowed_leaders: BTreeSet<Rank>,
}

impl ElectionConfig {
    /// Parses an `ElectionConfig` out of a TOML fragment, e.g. loaded from
    /// the cluster's configuration file.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_classic_config() {
        let cfg = ElectionConfig::from_toml_str(
            r#"
            rank = 1
            cluster_size = 3
            strategy = "Classic"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.rank, 1);
        assert_eq!(cfg.cluster_size, 3);
        assert_eq!(cfg.strategy, Strategy::Classic);
        assert!(cfg.disallowed_leaders.is_empty());
    }

    #[test]
    fn parses_disallow_config_with_leaders() {
        let cfg = ElectionConfig::from_toml_str(
            r#"
            rank = 2
            cluster_size = 5
            strategy = "Disallow"
            disallowed_leaders = [0, 3]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.strategy, Strategy::Disallow);
        assert_eq!(
            cfg.disallowed_leaders,
            BTreeSet::from([0, 3])
        );
    }
}
