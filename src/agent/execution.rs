//! Applies the manager's decision to the fund portfolio.
//!
//! Affordability is re-checked against the live portfolio, so a fill can be
//! skipped even after the risk panel approved it.

use tracing::{debug, info};

use crate::domain::{ManagerDecision, Portfolio};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionUnit;

impl ExecutionUnit {
    /// Returns whether the trade filled
    pub fn execute(&self, decision: &ManagerDecision, portfolio: &mut Portfolio, price: f64) -> bool {
        if !decision.is_actionable() {
            return false;
        }

        let filled = portfolio.apply(decision.final_action, decision.final_size, price);
        if filled {
            info!(
                action = %decision.final_action,
                size = decision.final_size,
                price,
                "Fund trade executed"
            );
        } else {
            debug!(
                action = %decision.final_action,
                size = decision.final_size,
                "Fund trade skipped: not affordable"
            );
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeAction;

    #[test]
    fn test_insufficient_cash_is_noop() {
        let mut portfolio = Portfolio::new(5.0);
        let decision = ManagerDecision::approve(TradeAction::Buy, 1, "");
        assert!(!ExecutionUnit.execute(&decision, &mut portfolio, 10.0));
        assert_eq!(portfolio, Portfolio::new(5.0));
    }

    #[test]
    fn test_buy_then_sell() {
        let mut portfolio = Portfolio::new(1000.0);
        assert!(ExecutionUnit.execute(
            &ManagerDecision::approve(TradeAction::Buy, 2, ""),
            &mut portfolio,
            100.0
        ));
        assert_eq!(portfolio, Portfolio { cash: 800.0, position: 2 });

        assert!(!ExecutionUnit.execute(
            &ManagerDecision::approve(TradeAction::Sell, 3, ""),
            &mut portfolio,
            110.0
        ));
        assert!(ExecutionUnit.execute(
            &ManagerDecision::approve(TradeAction::Sell, 2, ""),
            &mut portfolio,
            110.0
        ));
        assert_eq!(portfolio, Portfolio { cash: 1020.0, position: 0 });
    }

    #[test]
    fn test_rejected_or_hold_is_noop() {
        let mut portfolio = Portfolio::new(1000.0);
        assert!(!ExecutionUnit.execute(&ManagerDecision::reject("no"), &mut portfolio, 10.0));
        assert!(!ExecutionUnit.execute(
            &ManagerDecision::approve(TradeAction::Buy, 0, ""),
            &mut portfolio,
            10.0
        ));
        assert_eq!(portfolio, Portfolio::new(1000.0));
    }
}
