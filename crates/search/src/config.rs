/// Search configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of cell visits before the search gives up with
    /// `VoyageError::Exhausted`. Guards against runaway searches on large grids.
    pub step_cap: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step_cap: 1_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_config_defaults() {
        assert_eq!(SearchConfig::default().step_cap, 1_000_000);
    }
}
