//! Market simulation
//!
//! - `market`: random-walk price model and news generation
//! - `engine`: step orchestration across benchmarks and the fund
//! - `snapshot`: per-step and end-of-run reports
//! - `sink`: where reports go (console, JSON lines)

pub mod engine;
pub mod market;
pub mod sink;
pub mod snapshot;

pub use engine::{run, Simulation, FUND_NAME};
pub use market::{MarketModel, MarketState};
pub use sink::{ConsoleReporter, JsonLinesSink, MultiSink, NullSink, SnapshotSink};
pub use snapshot::{FinalValue, SimulationSummary, StepSnapshot};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Independent RNG per consumer: with a seed, each stream is reproducible;
/// without one, each is drawn from entropy.
pub fn seeded_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))),
        None => StdRng::from_entropy(),
    }
}
