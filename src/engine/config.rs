//! Engine configuration.

use serde::{Deserialize, Serialize};

/// How behaviour instances are obtained when a Real node activates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorPolicy {
    /// Build a new instance on every activation.
    #[default]
    Fresh,
    /// Keep one instance per node for the duration of a run.
    Cached,
}

/// Tunables for a [`StateMachine`](super::StateMachine).
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
///
/// # Example
///
/// ```rust
/// use tickgraph::engine::{BehaviorPolicy, EngineConfig};
///
/// let config = EngineConfig::from_json(r#"{ "behavior_policy": "cached" }"#).unwrap();
/// assert_eq!(config.behavior_policy, BehaviorPolicy::Cached);
/// assert_eq!(config.history_limit, Some(256));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub behavior_policy: BehaviorPolicy,

    /// Maximum retained history entries; `None` keeps everything.
    pub history_limit: Option<usize>,

    /// Log nodes that can never run when a run starts.
    pub warn_on_unreachable: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            behavior_policy: BehaviorPolicy::Fresh,
            history_limit: Some(256),
            warn_on_unreachable: true,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn with_policy(mut self, policy: BehaviorPolicy) -> Self {
        self.behavior_policy = policy;
        self
    }

    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn unbounded_history_parses_from_null() {
        let config = EngineConfig::from_json(r#"{ "history_limit": null }"#).unwrap();
        assert_eq!(config.history_limit, None);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = EngineConfig::from_json(r#"{ "behavior_policy": "pooled" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn config_serializes_correctly() {
        let config = EngineConfig::default()
            .with_policy(BehaviorPolicy::Cached)
            .with_history_limit(Some(8));

        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}
