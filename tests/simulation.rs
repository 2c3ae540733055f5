use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_log::test;

use csim::config::CacheConfig;
use csim::simulation::{SimulationResult, Simulator};
use csim::trace::{TraceEvent, TraceKind};

const YI_TRACE: &str = " L 10,1
 M 20,1
 L 22,1
 S 18,1
 L 110,1
 L 210,1
 M 12,1
";

fn simulator(s: u32, e: usize, b: u32) -> Simulator {
    Simulator::new(CacheConfig::new(s, e, b).unwrap()).unwrap()
}

fn random_trace(rng: &mut StdRng, events: usize) -> String {
    let mut trace = String::new();
    for _ in 0..events {
        let kind = ['I', 'L', 'S', 'M'][rng.random_range(0..4)];
        // small address space so sets fill up and evict
        let address: u64 = rng.random_range(0..0x400);
        let size: u32 = rng.random_range(1..=8);
        trace.push_str(&format!(" {kind} {address:x},{size}\n"));
    }
    trace
}

fn expected_accesses(trace: &str) -> u64 {
    trace
        .lines()
        .filter_map(|line| TraceEvent::try_from(line).ok())
        .map(|event| event.kind.access_count() as u64)
        .sum()
}

fn temp_trace(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("csim-{}-{name}.trace", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn yi_trace_reference_counts() {
    let cases = [
        ((1, 1, 1), (2, 7, 5)),
        ((4, 2, 4), (4, 5, 2)),
        ((2, 1, 4), (4, 5, 3)),
    ];

    for ((s, e, b), (hits, misses, evictions)) in cases {
        let result = simulator(s, e, b).simulate(YI_TRACE);
        assert_eq!(
            result,
            SimulationResult {
                hit_count: hits,
                miss_count: misses,
                eviction_count: evictions,
            },
            "s={s} E={e} b={b}"
        );
    }
}

#[test]
fn tiny_direct_mapped_example() {
    let result = simulator(1, 1, 1).simulate(" L 0,1\n L 8,1\n L 0,1\n");
    assert_eq!(result.to_string(), "hits:0 misses:3 evictions:2");
}

#[test]
fn malformed_lines_do_not_count() {
    let trace = "garbage\n L 10,1\n X 10,1\n L 10\n\n L 10,1\n";
    let result = simulator(4, 1, 4).simulate(trace);

    assert_eq!(result.hit_count, 1);
    assert_eq!(result.miss_count, 1);
}

#[test]
fn random_traces_balance() {
    let mut rng = StdRng::seed_from_u64(0);

    for _ in 0..50 {
        let s = rng.random_range(1..=4);
        let e = rng.random_range(1..=4);
        let b = rng.random_range(1..=4);
        let trace = random_trace(&mut rng, 500);

        let result = simulator(s, e, b).simulate(&trace);
        assert_eq!(result.accesses(), expected_accesses(&trace));
        assert!(result.eviction_count <= result.miss_count);
    }
}

#[test]
fn replay_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(42);
    let trace = random_trace(&mut rng, 2_000);

    let first = simulator(2, 2, 3).simulate(&trace);
    let second = simulator(2, 2, 3).simulate(&trace);
    assert_eq!(first, second);
}

#[test]
fn fully_cached_working_set_never_evicts() {
    let mut rng = StdRng::seed_from_u64(7);
    // 2 sets x 8 lines of 4B blocks cover 0x00..0x40 entirely
    let mut sim = simulator(1, 8, 2);

    for _ in 0..1_000 {
        sim.access(rng.random_range(0..0x40));
    }
    assert_eq!(sim.result().eviction_count, 0);
    assert_eq!(sim.result().miss_count, 16);
}

#[test]
fn modify_counts_two_accesses() {
    let mut sim = simulator(3, 2, 3);
    let trace = " M 100,8\n M 100,8\n I 100,8\n";

    let mut kinds = Vec::new();
    let result = sim.simulate_reader(trace.as_bytes(), |event, outcome| {
        kinds.push((event.kind, outcome.accesses().len()))
    });

    assert_eq!(
        kinds,
        vec![
            (TraceKind::Modify, 2),
            (TraceKind::Modify, 2),
            (TraceKind::Instruction, 0)
        ]
    );
    assert_eq!(result.miss_count, 1);
    assert_eq!(result.hit_count, 3);
}

#[test]
fn simulate_file_reads_trace() {
    let path = temp_trace("yi", YI_TRACE);
    let mut sim = simulator(4, 2, 4);

    let result = sim.simulate_file(&path, |_, _| {}).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(result.to_string(), "hits:4 misses:5 evictions:2");
}

#[test]
fn missing_file_leaves_counters_zero() {
    let path = std::env::temp_dir().join("csim-this-trace-does-not-exist.trace");
    let mut sim = simulator(4, 2, 4);

    assert!(sim.simulate_file(&path, |_, _| {}).is_err());
    assert_eq!(sim.result().to_string(), "hits:0 misses:0 evictions:0");
}
