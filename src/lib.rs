pub mod address;
pub mod cache;
pub mod config;
pub mod lru;
pub mod simulation;
pub mod trace;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use wasm_bindgen::prelude::*;

/// Runs `trace` through a fresh cache and returns the summary line,
/// or the reason the geometry was rejected.
pub fn summarize(trace: &str, set_bits: u32, lines_per_set: usize, block_bits: u32) -> String {
    use config::CacheConfig;
    use simulation::Simulator;

    let config = match CacheConfig::new(set_bits, lines_per_set, block_bits) {
        Ok(config) => config,
        Err(e) => return e.to_string(),
    };
    let mut simulator = match Simulator::new(config) {
        Ok(simulator) => simulator,
        Err(e) => return e.to_string(),
    };

    simulator.simulate(trace).to_string()
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
#[wasm_bindgen]
pub fn run_simulation(trace: &str, set_bits: u32, lines_per_set: usize, block_bits: u32) -> String {
    summarize(trace, set_bits, lines_per_set, block_bits)
}
