//! Benchmark traders
//!
//! Four single-rule strategies that run alongside the fund on the same
//! observation. Each trader owns its own portfolio and trades one unit at a
//! time; infeasible trades are skipped without error.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::domain::{Observation, Portfolio, TradeAction};

/// A per-step decision rule
pub trait BenchmarkStrategy: Send {
    fn name(&self) -> &str;

    fn decide(&mut self, observation: &Observation) -> TradeAction;
}

/// Uniform choice among buy, sell and hold
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl BenchmarkStrategy for RandomStrategy {
    fn name(&self) -> &str {
        "Random"
    }

    fn decide(&mut self, _observation: &Observation) -> TradeAction {
        *TradeAction::ALL
            .choose(&mut self.rng)
            .unwrap_or(&TradeAction::Hold)
    }
}

/// Follows the last price move
pub struct TrendStrategy;

impl BenchmarkStrategy for TrendStrategy {
    fn name(&self) -> &str {
        "Trend"
    }

    fn decide(&mut self, observation: &Observation) -> TradeAction {
        match observation.last_move() {
            Some((prev, last)) if last > prev => TradeAction::Buy,
            Some((prev, last)) if last < prev => TradeAction::Sell,
            _ => TradeAction::Hold,
        }
    }
}

/// Fades moves more than 2% away from the window mean
pub struct MeanReversionStrategy {
    band: f64,
}

impl Default for MeanReversionStrategy {
    fn default() -> Self {
        Self { band: 0.02 }
    }
}

impl BenchmarkStrategy for MeanReversionStrategy {
    fn name(&self) -> &str {
        "MeanReversion"
    }

    fn decide(&mut self, observation: &Observation) -> TradeAction {
        let Some(mean) = observation.mean_price() else {
            return TradeAction::Hold;
        };
        if observation.price > mean * (1.0 + self.band) {
            TradeAction::Sell
        } else if observation.price < mean * (1.0 - self.band) {
            TradeAction::Buy
        } else {
            TradeAction::Hold
        }
    }
}

/// Never trades
pub struct HoldStrategy;

impl BenchmarkStrategy for HoldStrategy {
    fn name(&self) -> &str {
        "Holder"
    }

    fn decide(&mut self, _observation: &Observation) -> TradeAction {
        TradeAction::Hold
    }
}

/// Post-trade state of one benchmark trader
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    pub name: String,
    pub action: TradeAction,
    pub cash: f64,
    pub pos: u32,
    pub value: f64,
}

/// A strategy together with the portfolio it trades
pub struct BenchmarkTrader {
    strategy: Box<dyn BenchmarkStrategy>,
    portfolio: Portfolio,
}

impl BenchmarkTrader {
    pub fn new(strategy: Box<dyn BenchmarkStrategy>, initial_cash: f64) -> Self {
        Self {
            strategy,
            portfolio: Portfolio::new(initial_cash),
        }
    }

    pub fn name(&self) -> &str {
        self.strategy.name()
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn decide(&mut self, observation: &Observation) -> TradeAction {
        self.strategy.decide(observation)
    }

    /// Apply `action` for `quantity` units at `price`, skipping infeasible trades
    pub fn apply_action(&mut self, action: TradeAction, price: f64, quantity: u32) -> bool {
        self.portfolio.apply(action, quantity, price)
    }

    pub fn portfolio_value(&self, price: f64) -> f64 {
        self.portfolio.value(price)
    }

    /// Decide, trade one unit, and report the resulting state
    pub fn step(&mut self, observation: &Observation) -> BenchmarkRecord {
        let action = self.decide(observation);
        self.apply_action(action, observation.price, 1);
        BenchmarkRecord {
            name: self.name().to_string(),
            action,
            cash: round2(self.portfolio.cash),
            pos: self.portfolio.position,
            value: round2(self.portfolio_value(observation.price)),
        }
    }
}

/// Random, Trend, MeanReversion, Holder
pub fn default_roster(initial_cash: f64, rng: StdRng) -> Vec<BenchmarkTrader> {
    vec![
        BenchmarkTrader::new(Box::new(RandomStrategy::new(rng)), initial_cash),
        BenchmarkTrader::new(Box::new(TrendStrategy), initial_cash),
        BenchmarkTrader::new(Box::new(MeanReversionStrategy::default()), initial_cash),
        BenchmarkTrader::new(Box::new(HoldStrategy), initial_cash),
    ]
}

/// Round to cents for reporting
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
