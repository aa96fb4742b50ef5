use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TradeAction;

/// Cash plus a whole-unit position in the single asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub position: u32,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

impl Portfolio {
    pub fn new(cash: f64) -> Self {
        Self { cash, position: 0 }
    }

    /// Mark-to-market value at `price`
    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.position as f64 * price
    }

    /// Buy `quantity` units if cash covers the cost. Returns whether it filled.
    pub fn buy(&mut self, quantity: u32, price: f64) -> bool {
        let cost = quantity as f64 * price;
        if self.cash < cost {
            debug!(cash = self.cash, cost, "buy skipped: insufficient cash");
            return false;
        }
        self.cash -= cost;
        self.position += quantity;
        true
    }

    /// Sell `quantity` units if held. Returns whether it filled.
    pub fn sell(&mut self, quantity: u32, price: f64) -> bool {
        if self.position < quantity {
            debug!(position = self.position, quantity, "sell skipped: insufficient position");
            return false;
        }
        self.cash += quantity as f64 * price;
        self.position -= quantity;
        true
    }

    /// Apply an action; infeasible trades are silently skipped.
    pub fn apply(&mut self, action: TradeAction, quantity: u32, price: f64) -> bool {
        match action {
            TradeAction::Buy => self.buy(quantity, price),
            TradeAction::Sell => self.sell(quantity, price),
            TradeAction::Hold => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value() {
        let p = Portfolio { cash: 250.0, position: 3 };
        assert_eq!(p.value(10.0), 280.0);
    }

    #[test]
    fn test_buy_requires_cash() {
        let mut p = Portfolio::new(5.0);
        assert!(!p.buy(1, 10.0));
        assert_eq!(p, Portfolio::new(5.0));

        assert!(p.buy(1, 5.0));
        assert_eq!(p.cash, 0.0);
        assert_eq!(p.position, 1);
    }

    #[test]
    fn test_sell_requires_position() {
        let mut p = Portfolio { cash: 0.0, position: 1 };
        assert!(!p.sell(2, 10.0));
        assert_eq!(p.position, 1);

        assert!(p.sell(1, 10.0));
        assert_eq!(p.cash, 10.0);
        assert_eq!(p.position, 0);
    }

    #[test]
    fn test_value_identity_holds_across_trades() {
        let mut p = Portfolio::new(1000.0);
        let steps = [
            (TradeAction::Buy, 3, 101.2),
            (TradeAction::Sell, 5, 99.0),
            (TradeAction::Hold, 1, 98.0),
            (TradeAction::Sell, 2, 103.4),
            (TradeAction::Buy, 20, 100.0),
        ];
        for (action, qty, price) in steps {
            p.apply(action, qty, price);
            assert_eq!(p.value(price), p.cash + p.position as f64 * price);
        }
        assert_eq!(p.position, 1);
    }
}
