/// Address width of the simulated machine.
pub const ADDRESS_BITS: u32 = u64::BITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroSetBits,
    ZeroLines,
    ZeroBlockBits,
    AddressTooNarrow { set_bits: u32, block_bits: u32 },
    TooManyLines { sets: u64, lines_per_set: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroSetBits => f.write_str("number of set index bits (-s) must be positive"),
            ConfigError::ZeroLines => f.write_str("number of lines per set (-E) must be positive"),
            ConfigError::ZeroBlockBits => {
                f.write_str("number of block offset bits (-b) must be positive")
            }
            ConfigError::AddressTooNarrow {
                set_bits,
                block_bits,
            } => f.write_fmt(format_args!(
                "{set_bits} set bits + {block_bits} block bits leave no tag bits in a {ADDRESS_BITS}-bit address"
            )),
            ConfigError::TooManyLines {
                sets,
                lines_per_set,
            } => f.write_fmt(format_args!(
                "{sets} sets of {lines_per_set} lines cannot be addressed on this platform"
            )),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Cache geometry, fixed for the lifetime of a simulation.
///
/// - `set_bits` (`s`): the cache has `2^s` sets
/// - `lines_per_set` (`E`): associativity
/// - `block_bits` (`b`): every line holds `2^b` bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    set_bits: u32,
    lines_per_set: usize,
    block_bits: u32,
}

impl CacheConfig {
    pub fn new(set_bits: u32, lines_per_set: usize, block_bits: u32) -> Result<Self, ConfigError> {
        if set_bits == 0 {
            return Err(ConfigError::ZeroSetBits);
        }
        if lines_per_set == 0 {
            return Err(ConfigError::ZeroLines);
        }
        if block_bits == 0 {
            return Err(ConfigError::ZeroBlockBits);
        }
        if set_bits.saturating_add(block_bits) >= ADDRESS_BITS {
            return Err(ConfigError::AddressTooNarrow {
                set_bits,
                block_bits,
            });
        }

        let sets = 1u64 << set_bits;
        let too_many = || ConfigError::TooManyLines {
            sets,
            lines_per_set,
        };
        usize::try_from(sets)
            .ok()
            .and_then(|sets| sets.checked_mul(lines_per_set))
            .ok_or_else(too_many)?;

        Ok(Self {
            set_bits,
            lines_per_set,
            block_bits,
        })
    }

    pub fn set_bits(&self) -> u32 {
        self.set_bits
    }

    pub fn block_bits(&self) -> u32 {
        self.block_bits
    }

    pub fn lines_per_set(&self) -> usize {
        self.lines_per_set
    }

    pub fn tag_bits(&self) -> u32 {
        ADDRESS_BITS - (self.set_bits + self.block_bits)
    }

    // both fit in usize, checked in `new`
    pub fn set_count(&self) -> usize {
        1usize << self.set_bits
    }

    pub fn block_size(&self) -> u64 {
        1u64 << self.block_bits
    }

    pub fn total_lines(&self) -> usize {
        self.set_count() * self.lines_per_set
    }

    pub fn format_info(&self) -> String {
        [
            "LRU Cache:".to_string(),
            format!("\tSets: {}", self.set_count()),
            format!("\tLines per Set: {}", self.lines_per_set),
            format!("\tBlock-Size: {}B", self.block_size()),
            format!(
                "\t| {} tag bits | {} set bits | {} offset bits |",
                self.tag_bits(),
                self.set_bits,
                self.block_bits
            ),
        ]
        .join("\n")
    }
}
