use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::agent::FundTrace;
use crate::strategy::BenchmarkRecord;

/// Everything that happened in one step, as delivered to a sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSnapshot {
    pub step: u32,
    pub total_steps: u32,
    pub price: f64,
    /// Trailing reporting window, oldest first
    pub history: Vec<f64>,
    pub news: String,
    /// Benchmark traders' post-trade state
    pub decisions: Vec<BenchmarkRecord>,
    /// Fund pipeline trace
    #[serde(rename = "llm")]
    pub fund: FundTrace,
    pub timestamp: DateTime<Utc>,
}

/// Final portfolio value of one participant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalValue {
    pub name: String,
    pub value: f64,
}

/// End-of-run results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub run_id: Uuid,
    pub steps: u32,
    pub final_price: f64,
    /// Benchmarks in roster order, then the fund
    pub participants: Vec<FinalValue>,
}

impl SimulationSummary {
    /// Highest final value; first listed wins ties
    pub fn leader(&self) -> Option<&FinalValue> {
        self.participants
            .iter()
            .fold(None, |best: Option<&FinalValue>, p| match best {
                Some(b) if b.value >= p.value => Some(b),
                _ => Some(p),
            })
    }
}
