use serde::Deserialize;

#[derive(Debug, PartialEq, Eq)]
pub enum PoolConfigError {
    /// Configuration could not be read or parsed
    Load(String),
    /// Configuration parsed but holds an unusable value
    Invalid(String),
}

/// Runtime configuration of the buffer pool. Defaults can be overridden by
/// an optional config file and by `POOLDB_`-prefixed environment variables.
#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct PoolConfig {
    /// Number of frames in the pool
    pub pool_size: usize,
    /// The K in LRU-K replacement; 1 degenerates to classical LRU
    pub replacer_k: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            pool_size: 64,
            replacer_k: 2,
        }
    }
}

impl PoolConfig {
    pub fn new(file: &str) -> Result<PoolConfig, PoolConfigError> {
        let defaults = PoolConfig::default();
        let mut cfg = config::Config::builder()
            .set_default("pool_size", defaults.pool_size as u64)
            .map_err(|e| PoolConfigError::Load(e.to_string()))?
            .set_default("replacer_k", defaults.replacer_k as u64)
            .map_err(|e| PoolConfigError::Load(e.to_string()))?;
        if !file.is_empty() {
            cfg = cfg.add_source(config::File::with_name(file));
        }
        cfg = cfg.add_source(config::Environment::with_prefix("POOLDB"));
        let cfg: PoolConfig = cfg
            .build()
            .map_err(|e| PoolConfigError::Load(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PoolConfigError::Load(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), PoolConfigError> {
        if self.pool_size == 0 {
            return Err(PoolConfigError::Invalid(
                "pool_size must be at least 1".to_string(),
            ));
        }
        if self.replacer_k == 0 {
            return Err(PoolConfigError::Invalid(
                "replacer_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
