use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::trace;

use crate::cache::{Cache, CacheError};
use crate::config::CacheConfig;
use crate::trace::{TraceEvent, TraceReader};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CacheHit {
    Hit,
    Miss { evicted: Option<u64> },
}

impl std::fmt::Display for CacheHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheHit::Hit => f.write_str("hit"),
            CacheHit::Miss { evicted: None } => f.write_str("miss"),
            CacheHit::Miss { evicted: Some(_) } => f.write_str("miss eviction"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationResult {
    pub hit_count: u64,
    pub miss_count: u64,
    pub eviction_count: u64,
}

impl SimulationResult {
    pub fn record(&mut self, cache_hit: CacheHit) {
        match cache_hit {
            CacheHit::Hit => self.hit_count += 1,
            CacheHit::Miss { evicted } => {
                self.miss_count += 1;
                if evicted.is_some() {
                    self.eviction_count += 1;
                }
            }
        }
    }

    pub fn accesses(&self) -> u64 {
        self.hit_count + self.miss_count
    }

    pub fn percent_hit(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            n => 100.0 * self.hit_count as f64 / n as f64,
        }
    }

    pub fn percent_miss(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            n => 100.0 * self.miss_count as f64 / n as f64,
        }
    }
}

impl std::fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "hits:{} misses:{} evictions:{}",
            self.hit_count, self.miss_count, self.eviction_count
        ))
    }
}

/// Outcomes of the (at most two) accesses one trace event turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
    accesses: [CacheHit; 2],
    len: usize,
}

impl EventOutcome {
    fn new() -> Self {
        Self {
            accesses: [CacheHit::Hit; 2],
            len: 0,
        }
    }

    fn push(&mut self, cache_hit: CacheHit) {
        self.accesses[self.len] = cache_hit;
        self.len += 1;
    }

    pub fn accesses(&self) -> &[CacheHit] {
        &self.accesses[..self.len]
    }
}

impl std::fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut accesses = self.accesses().iter();
        if let Some(first) = accesses.next() {
            f.write_fmt(format_args!("{first}"))?;
        }
        for cache_hit in accesses {
            f.write_fmt(format_args!(" {cache_hit}"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Simulator {
    cache: Cache,
    result: SimulationResult,
}

impl Simulator {
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        Ok(Self {
            cache: Cache::new(config)?,
            result: SimulationResult::default(),
        })
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn result(&self) -> SimulationResult {
        self.result
    }

    /// Simulates one data access and updates the counters.
    pub fn access(&mut self, address: u64) -> CacheHit {
        let decoded = self.cache.config().decode(address);
        let set = self.cache.set_mut(decoded.set_index);

        let cache_hit = match set.find(decoded.tag) {
            // Cache-Hit: lift the line above every other line in its set
            Some(line_idx) => {
                set.touch(line_idx);
                CacheHit::Hit
            }
            // Cache-Miss: fill an empty line or replace the least recently used one
            None => {
                let placement = set.install(decoded.tag);
                CacheHit::Miss {
                    evicted: placement.evicted(),
                }
            }
        };

        trace!(
            "{address:#x}: tag={:#x} set={} offset={} -> {cache_hit}",
            decoded.tag, decoded.set_index, decoded.block_offset
        );
        self.result.record(cache_hit);
        cache_hit
    }

    /// Replays one trace event as zero, one or two accesses.
    pub fn replay(&mut self, event: &TraceEvent) -> EventOutcome {
        // a modify is a load then a store to the same address
        let mut outcome = EventOutcome::new();
        for _ in 0..event.kind.access_count() {
            outcome.push(self.access(event.address));
        }
        outcome
    }

    /// Replays every well-formed event in `reader`, calling `on_event` after each.
    pub fn simulate_reader(
        &mut self,
        reader: impl BufRead,
        mut on_event: impl FnMut(&TraceEvent, &EventOutcome),
    ) -> SimulationResult {
        for event in TraceReader::new(reader) {
            let outcome = self.replay(&event);
            on_event(&event, &outcome);
        }
        self.result
    }

    pub fn simulate(&mut self, trace: &str) -> SimulationResult {
        self.simulate_reader(trace.as_bytes(), |_, _| {})
    }

    pub fn simulate_file(
        &mut self,
        file: impl AsRef<Path>,
        on_event: impl FnMut(&TraceEvent, &EventOutcome),
    ) -> std::io::Result<SimulationResult> {
        let file = File::open(file)?;
        Ok(self.simulate_reader(BufReader::new(file), on_event))
    }
}
