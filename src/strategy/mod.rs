pub mod benchmark;

pub use benchmark::{
    default_roster, round2, BenchmarkRecord, BenchmarkStrategy, BenchmarkTrader, HoldStrategy,
    MeanReversionStrategy, RandomStrategy, TrendStrategy,
};
