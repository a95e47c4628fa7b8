use crate::error::{QuorumError, Result};

/// Runtime configuration for the quorum core.
///
/// Everything here has a sensible default; `from_env` layers `QUORUM_*`
/// environment overrides on top for deployments that need them.
#[derive(Debug, Clone)]
pub struct QuorumConfig {
    /// Capacity of the broadcast channel carrying lifecycle events
    pub event_channel_capacity: usize,
    /// Whether the context stack keeps a read-through cache per project
    pub context_cache_enabled: bool,
    /// Upper bound on steps generated for one work item
    pub max_work_item_steps: usize,
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 1000,
            context_cache_enabled: true,
            max_work_item_steps: crate::constants::system::MAX_WORK_ITEM_STEPS,
        }
    }
}

impl QuorumConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(capacity) = std::env::var("QUORUM_EVENT_CHANNEL_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                QuorumError::Validation(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        if let Ok(enabled) = std::env::var("QUORUM_CONTEXT_CACHE_ENABLED") {
            config.context_cache_enabled = enabled.parse().map_err(|e| {
                QuorumError::Validation(format!("Invalid context_cache_enabled: {e}"))
            })?;
        }

        if let Ok(max_steps) = std::env::var("QUORUM_MAX_WORK_ITEM_STEPS") {
            config.max_work_item_steps = max_steps.parse().map_err(|e| {
                QuorumError::Validation(format!("Invalid max_work_item_steps: {e}"))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuorumConfig::default();
        assert_eq!(config.event_channel_capacity, 1000);
        assert!(config.context_cache_enabled);
    }
}
