//! Step orchestrator
//!
//! One step: advance the market, let every benchmark trade one unit, run the
//! fund pipeline, and assemble a snapshot. Steps run strictly one after
//! another; the only await point is the oracle.

use chrono::Utc;
use tokio::time::{sleep, Duration};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::market::MarketModel;
use super::seeded_rng;
use super::sink::{NullSink, SnapshotSink};
use super::snapshot::{FinalValue, SimulationSummary, StepSnapshot};
use crate::agent::{FallbackOracle, FundPipeline};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::strategy::{default_roster, BenchmarkTrader};

/// RNG stream for the price walk
const MARKET_STREAM: u64 = 0;
/// RNG stream for the random benchmark
const RANDOM_TRADER_STREAM: u64 = 1;

/// Display name of the fund in results
pub const FUND_NAME: &str = "LLMFund";

pub struct Simulation {
    run_id: Uuid,
    config: SimulationConfig,
    market: MarketModel,
    traders: Vec<BenchmarkTrader>,
    fund: FundPipeline,
    step: u32,
    total_steps: u32,
}

impl Simulation {
    pub fn new(config: SimulationConfig, oracle: FallbackOracle, general_analyst: bool) -> Self {
        let market = MarketModel::from_config(&config, seeded_rng(config.seed, MARKET_STREAM));
        let traders = default_roster(
            config.initial_cash,
            seeded_rng(config.seed, RANDOM_TRADER_STREAM),
        );
        let fund = FundPipeline::new(oracle, config.initial_cash, general_analyst);

        Self {
            run_id: Uuid::new_v4(),
            total_steps: config.steps,
            config,
            market,
            traders,
            fund,
            step: 0,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn market(&self) -> &MarketModel {
        &self.market
    }

    /// Advance one step and report it
    pub async fn step(&mut self) -> StepSnapshot {
        self.step += 1;
        self.market.advance();

        let observation = self.market.observe(self.config.decision_window);
        let price = observation.price;

        let decisions = self
            .traders
            .iter_mut()
            .map(|t| t.step(&observation))
            .collect();

        let fund = self.fund.run_step(&observation).await;

        info!(
            step = self.step,
            price,
            fund_action = %fund.manager_decision.final_action,
            fund_value = fund.portfolio.value,
            "Step complete"
        );

        StepSnapshot {
            step: self.step,
            total_steps: self.total_steps,
            price,
            history: self
                .market
                .state()
                .trailing(self.config.snapshot_window)
                .to_vec(),
            news: observation.news,
            decisions,
            fund,
            timestamp: Utc::now(),
        }
    }

    /// Final values at the current price
    pub fn summary(&self) -> SimulationSummary {
        let price = self.market.price();
        let mut participants: Vec<FinalValue> = self
            .traders
            .iter()
            .map(|t| FinalValue {
                name: t.name().to_string(),
                value: t.portfolio_value(price),
            })
            .collect();
        participants.push(FinalValue {
            name: FUND_NAME.to_string(),
            value: self.fund.portfolio().value(price),
        });

        SimulationSummary {
            run_id: self.run_id,
            steps: self.step,
            final_price: price,
            participants,
        }
    }

    /// Run `num_steps` steps, publishing each snapshot and pausing
    /// `step_delay_ms` between steps.
    pub async fn run_with(
        &mut self,
        num_steps: u32,
        sink: &mut dyn SnapshotSink,
    ) -> Result<Vec<StepSnapshot>> {
        self.total_steps = self.step + num_steps;
        let delay = Duration::from_millis(self.config.step_delay_ms);
        let span = info_span!("simulation", run_id = %self.run_id);

        async move {
            info!(num_steps, seed = ?self.config.seed, "Simulation started");
            let mut snapshots = Vec::with_capacity(num_steps as usize);

            for i in 0..num_steps {
                let snapshot = self.step().await;
                sink.publish(&snapshot)?;
                snapshots.push(snapshot);

                if !delay.is_zero() && i + 1 < num_steps {
                    sleep(delay).await;
                }
            }

            let summary = self.summary();
            sink.finish(&summary)?;
            info!(final_price = summary.final_price, "Simulation finished");
            Ok(snapshots)
        }
        .instrument(span)
        .await
    }

    pub async fn run(&mut self, num_steps: u32) -> Vec<StepSnapshot> {
        let mut sink = NullSink;
        // NullSink never fails
        self.run_with(num_steps, &mut sink).await.unwrap_or_default()
    }
}

/// Run a fresh simulation with default settings
pub async fn run(num_steps: u32, seed: Option<u64>, oracle: FallbackOracle) -> Vec<StepSnapshot> {
    let config = SimulationConfig {
        steps: num_steps,
        seed,
        ..SimulationConfig::default()
    };
    Simulation::new(config, oracle, true).run(num_steps).await
}
