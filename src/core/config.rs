//! Board configuration.
//!
//! Hosts configure a game at startup with a `BoardConfig`:
//! - Team capacity (effort points per turn)
//! - Scrum Master token count
//! - WIP limit per stage
//! - Technical-debt threshold and duration
//!
//! Every field has a default, so a partial config deserializes cleanly.

use serde::{Deserialize, Serialize};

use crate::stages::{Stage, StageMap};

/// Complete board configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Effort points the team can allocate per turn.
    pub team_capacity: u32,

    /// Scrum Master tokens for the whole game.
    pub tokens: u32,

    /// Active-slot limit per stage. `None` for unlimited.
    ///
    /// Funnel and Production are always unlimited regardless of this map.
    pub wip_limits: StageMap<Option<usize>>,

    /// Technical-debt effort per turn needed to activate softening.
    pub technical_debt_threshold: u32,

    /// Turns the softening lasts once activated.
    pub technical_debt_duration: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let mut wip_limits = StageMap::with_default();
        wip_limits[Stage::ProductBacklog] = Some(10);
        wip_limits[Stage::SprintBacklog] = Some(8);
        wip_limits[Stage::Implementation] = Some(3);
        wip_limits[Stage::Integration] = Some(3);
        wip_limits[Stage::Testing] = Some(3);
        wip_limits[Stage::PreDeployment] = Some(2);

        Self {
            team_capacity: 10,
            tokens: 3,
            wip_limits,
            technical_debt_threshold: 3,
            technical_debt_duration: 2,
        }
    }
}

impl BoardConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_team_capacity(mut self, capacity: u32) -> Self {
        self.team_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_tokens(mut self, tokens: u32) -> Self {
        self.tokens = tokens;
        self
    }

    /// Set one stage's WIP limit.
    #[must_use]
    pub fn with_wip_limit(mut self, stage: Stage, limit: usize) -> Self {
        self.wip_limits[stage] = Some(limit);
        self
    }

    /// Remove one stage's WIP limit.
    #[must_use]
    pub fn without_wip_limit(mut self, stage: Stage) -> Self {
        self.wip_limits[stage] = None;
        self
    }

    #[must_use]
    pub fn with_technical_debt(mut self, threshold: u32, duration: u32) -> Self {
        self.technical_debt_threshold = threshold;
        self.technical_debt_duration = duration;
        self
    }

    /// Effective WIP limit for a stage.
    #[must_use]
    pub fn wip_limit(&self, stage: Stage) -> Option<usize> {
        if stage.is_unbounded() {
            None
        } else {
            self.wip_limits[stage]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.team_capacity, 10);
        assert_eq!(config.tokens, 3);
        assert_eq!(config.technical_debt_duration, 2);
        assert_eq!(config.wip_limit(Stage::Implementation), Some(3));
        assert_eq!(config.wip_limit(Stage::Funnel), None);
        assert_eq!(config.wip_limit(Stage::Production), None);
    }

    #[test]
    fn test_builder() {
        let config = BoardConfig::new()
            .with_team_capacity(6)
            .with_tokens(1)
            .with_wip_limit(Stage::Implementation, 2)
            .without_wip_limit(Stage::ProductBacklog)
            .with_technical_debt(4, 3);

        assert_eq!(config.team_capacity, 6);
        assert_eq!(config.tokens, 1);
        assert_eq!(config.wip_limit(Stage::Implementation), Some(2));
        assert_eq!(config.wip_limit(Stage::ProductBacklog), None);
        assert_eq!(config.technical_debt_threshold, 4);
        assert_eq!(config.technical_debt_duration, 3);
    }

    #[test]
    fn test_unbounded_stage_ignores_limit() {
        let config = BoardConfig::new().with_wip_limit(Stage::Production, 1);
        assert_eq!(config.wip_limit(Stage::Production), None);
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: BoardConfig = serde_json::from_str(r#"{"team_capacity": 7}"#).unwrap();
        assert_eq!(config.team_capacity, 7);
        assert_eq!(config.tokens, 3);
        assert_eq!(config.wip_limit(Stage::PreDeployment), Some(2));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = BoardConfig::new().with_wip_limit(Stage::Testing, 1);
        let json = serde_json::to_string(&config).unwrap();
        let back: BoardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
