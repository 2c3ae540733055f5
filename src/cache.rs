use log::debug;

use crate::config::CacheConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    Allocation { lines: usize },
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Allocation { lines } => {
                f.write_fmt(format_args!("unable to allocate {lines} cache lines"))
            }
        }
    }
}

impl std::error::Error for CacheError {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: u64,
    /// Logical clock local to the set: larger means more recently used.
    pub recency: u64,
}

#[derive(Debug, Clone)]
pub struct CacheSet {
    lines: Box<[CacheLine]>,
}

impl CacheSet {
    fn new(lines_per_set: usize) -> Result<Self, CacheError> {
        let allocation_failed = CacheError::Allocation {
            lines: lines_per_set,
        };

        let mut lines = Vec::new();
        lines.try_reserve_exact(lines_per_set).map_err(|_| allocation_failed)?;
        lines.resize(lines_per_set, CacheLine::default());

        Ok(Self {
            lines: lines.into_boxed_slice(),
        })
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    pub fn line(&self, line_index: usize) -> &CacheLine {
        &self.lines[line_index]
    }

    pub fn line_mut(&mut self, line_index: usize) -> &mut CacheLine {
        &mut self.lines[line_index]
    }
}

/// Storage for `2^s` sets of `E` lines. Holds no replacement policy.
#[derive(Debug, Clone)]
pub struct Cache {
    config: CacheConfig,
    sets: Vec<CacheSet>,
}

impl Cache {
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        debug!(
            "allocating cache: {} sets x {} lines, {}B blocks",
            config.set_count(),
            config.lines_per_set(),
            config.block_size()
        );

        let set_count = config.set_count();
        let allocation_failed = CacheError::Allocation {
            lines: config.total_lines(),
        };

        let mut sets = Vec::new();
        sets.try_reserve_exact(set_count).map_err(|_| allocation_failed)?;
        for _ in 0..set_count {
            sets.push(CacheSet::new(config.lines_per_set()).map_err(|_| allocation_failed)?);
        }

        Ok(Self { config, sets })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn set(&self, set_index: usize) -> &CacheSet {
        &self.sets[set_index]
    }

    pub fn set_mut(&mut self, set_index: usize) -> &mut CacheSet {
        &mut self.sets[set_index]
    }

    pub fn line(&self, set_index: usize, line_index: usize) -> &CacheLine {
        self.set(set_index).line(line_index)
    }

    pub fn line_mut(&mut self, set_index: usize, line_index: usize) -> &mut CacheLine {
        self.set_mut(set_index).line_mut(line_index)
    }

    pub fn sets(&self) -> impl Iterator<Item = &CacheSet> {
        self.sets.iter()
    }
}
