//! Single-asset random-walk market.

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::domain::{NewsBand, Observation};

/// Price state owned by the market model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketState {
    pub price: f64,
    pub history: Vec<f64>,
    pub last_return: f64,
}

impl MarketState {
    pub fn new(initial_price: f64) -> Self {
        Self {
            price: initial_price,
            history: vec![initial_price],
            last_return: 0.0,
        }
    }

    /// Last `window` prices, oldest first
    pub fn trailing(&self, window: usize) -> &[f64] {
        let start = self.history.len().saturating_sub(window);
        &self.history[start..]
    }
}

/// Random walk with a hard price floor
pub struct MarketModel {
    state: MarketState,
    max_step_change: f64,
    price_floor: f64,
    rng: StdRng,
}

impl MarketModel {
    pub fn new(initial_price: f64, max_step_change: f64, price_floor: f64, rng: StdRng) -> Self {
        Self {
            state: MarketState::new(initial_price.max(price_floor)),
            max_step_change,
            price_floor,
            rng,
        }
    }

    pub fn from_config(config: &SimulationConfig, rng: StdRng) -> Self {
        Self::new(
            config.initial_price,
            config.max_step_change,
            config.price_floor,
            rng,
        )
    }

    pub fn state(&self) -> &MarketState {
        &self.state
    }

    pub fn price(&self) -> f64 {
        self.state.price
    }

    /// Move the price one step: uniform perturbation, floored.
    pub fn advance(&mut self) {
        let change = self
            .rng
            .gen_range(-self.max_step_change..=self.max_step_change);
        let new_price = (self.state.price + change).max(self.price_floor);
        self.state.last_return = new_price - self.state.price;
        self.state.price = new_price;
        self.state.history.push(new_price);
    }

    pub fn news_band(&self) -> NewsBand {
        NewsBand::classify(self.state.last_return)
    }

    /// Snapshot of price, the last `window` prices and the news line
    pub fn observe(&self, window: usize) -> Observation {
        Observation {
            price: self.state.price,
            history: self.state.trailing(window).to_vec(),
            news: self.news_band().news(),
        }
    }
}
