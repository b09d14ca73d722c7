//! Configuration for a game engine.

/// Configuration for a [`GameEngine`](crate::engine::GameEngine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible rolls.
    pub seed: u64,
    /// Add gold found in treasure and won in combat to the character's purse.
    /// When off, gold is only reported.
    pub credit_gold: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            credit_gold: false,
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Turn gold crediting on or off.
    pub fn with_credit_gold(mut self, credit_gold: bool) -> Self {
        self.credit_gold = credit_gold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.seed, 42);
        assert!(!cfg.credit_gold);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default().with_seed(7).with_credit_gold(true);
        assert_eq!(cfg.seed, 7);
        assert!(cfg.credit_gold);
    }
}
