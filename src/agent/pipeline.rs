//! The fund's per-step decision pipeline
//!
//! research -> proposal -> risk panel -> manager -> execution, run against
//! the fund's own portfolio. Every path yields a complete [`FundTrace`].

use serde::Serialize;
use tracing::{debug, info};

use super::execution::ExecutionUnit;
use super::manager::FundManager;
use super::oracle::FallbackOracle;
use super::research::{BearishResearcher, BullishResearcher, GeneralAnalyst, Researcher};
use super::risk::RiskPanel;
use super::trader::LlmTrader;
use crate::domain::{Evidence, ManagerDecision, Observation, Portfolio, RiskAssessment, TradeProposal};
use crate::strategy::round2;

/// Fund portfolio as reported in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub cash: f64,
    pub pos: u32,
    pub value: f64,
}

impl PortfolioReport {
    pub fn at(portfolio: &Portfolio, price: f64) -> Self {
        Self {
            cash: round2(portfolio.cash),
            pos: portfolio.position,
            value: round2(portfolio.value(price)),
        }
    }
}

/// Everything the fund did in one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundTrace {
    pub bullish: String,
    pub bearish: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_analysis: Option<Evidence>,
    pub proposal: TradeProposal,
    pub risk_assessments: Vec<RiskAssessment>,
    pub manager_decision: ManagerDecision,
    pub executed: bool,
    pub portfolio: PortfolioReport,
}

pub struct FundPipeline {
    bullish: BullishResearcher,
    bearish: BearishResearcher,
    general: Option<GeneralAnalyst>,
    trader: LlmTrader,
    panel: RiskPanel,
    manager: FundManager,
    executor: ExecutionUnit,
    portfolio: Portfolio,
}

impl FundPipeline {
    pub fn new(oracle: FallbackOracle, initial_cash: f64, general_analyst: bool) -> Self {
        Self {
            bullish: BullishResearcher,
            bearish: BearishResearcher,
            general: general_analyst.then(|| GeneralAnalyst::new(oracle.clone())),
            trader: LlmTrader::new(oracle),
            panel: RiskPanel::default(),
            manager: FundManager,
            executor: ExecutionUnit,
            portfolio: Portfolio::new(initial_cash),
        }
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub async fn run_step(&mut self, observation: &Observation) -> FundTrace {
        let price = observation.price;

        let bull = self.bullish.analyze(observation).await;
        let bear = self.bearish.analyze(observation).await;
        let general = match &self.general {
            Some(analyst) => Some(analyst.analyze(observation).await),
            None => None,
        };
        if let Some(g) = &general {
            debug!(stance = %g.stance, "General analysis received");
        }

        let proposal = self
            .trader
            .propose_trade(observation, &bull, &bear, general.as_ref())
            .await;

        let assessments = self.panel.review(&proposal, &self.portfolio, price);
        for a in &assessments {
            debug!(
                reviewer = %a.reviewer,
                approved = a.approved,
                suggested_size = a.suggested_size,
                "{}",
                a.comment
            );
        }

        let decision = self.manager.decide(&proposal, &assessments);
        info!(
            approved = decision.approved,
            action = %decision.final_action,
            size = decision.final_size,
            "{}",
            decision.comment
        );

        let executed = self.executor.execute(&decision, &mut self.portfolio, price);

        FundTrace {
            bullish: bull.text,
            bearish: bear.text,
            general_analysis: general,
            proposal,
            risk_assessments: assessments,
            manager_decision: decision,
            executed,
            portfolio: PortfolioReport::at(&self.portfolio, price),
        }
    }
}
