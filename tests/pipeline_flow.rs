//! Fund pipeline end to end against a scripted oracle.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quorum::agent::{FallbackOracle, FundPipeline, Oracle};
use quorum::domain::{Observation, Stance, TradeAction};
use quorum::error::{QuorumError, Result};

/// Replays canned replies in order; an empty script fails every call.
#[derive(Default)]
struct ScriptedOracle {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn generate(&self, prompt: &str, _model: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| QuorumError::OracleUnavailable("script exhausted".to_string()))
    }
}

fn observation(price: f64) -> Observation {
    Observation {
        price,
        history: vec![99.0, 99.5, price],
        news: "Sentiment: neutral. Headline: Market is stable with no major news.".to_string(),
    }
}

fn pipeline(oracle: Arc<ScriptedOracle>, general: bool) -> FundPipeline {
    FundPipeline::new(FallbackOracle::new(oracle, "llama3"), 1000.0, general)
}

#[tokio::test]
async fn oversized_buy_is_cut_to_the_median() {
    let oracle = ScriptedOracle::new(&["ACTION: BUY\nSIZE: 3\nREASON: Strong uptrend."]);
    let mut fund = pipeline(oracle, false);

    let trace = fund.run_step(&observation(100.0)).await;

    assert_eq!(trace.proposal.action, TradeAction::Buy);
    assert_eq!(trace.proposal.size, 3);

    // 300 of 1000 is over the neutral and conservative caps
    let sizes: Vec<u32> = trace.risk_assessments.iter().map(|a| a.suggested_size).collect();
    let approvals: Vec<bool> = trace.risk_assessments.iter().map(|a| a.approved).collect();
    assert_eq!(sizes, [3, 2, 0]);
    assert_eq!(approvals, [true, true, false]);

    let decision = &trace.manager_decision;
    assert!(decision.approved);
    assert_eq!(decision.final_action, TradeAction::Buy);
    assert_eq!(decision.final_size, 2);
    assert_eq!(decision.comment, "Approved by 2/3 risk agents. Final size=2.");

    assert!(trace.executed);
    assert_eq!(fund.portfolio().cash, 800.0);
    assert_eq!(fund.portfolio().position, 2);
    assert_eq!(trace.portfolio.value, 1000.0);
}

#[tokio::test]
async fn sell_after_buy_flattens_the_position() {
    let oracle = ScriptedOracle::new(&[
        "ACTION: BUY\nSIZE: 3\nREASON: Cheap.",
        "ACTION: SELL\nSIZE: 3\nREASON: Take profit.",
    ]);
    let mut fund = pipeline(oracle, false);

    fund.run_step(&observation(100.0)).await;
    let trace = fund.run_step(&observation(100.0)).await;

    assert_eq!(trace.manager_decision.final_action, TradeAction::Sell);
    assert_eq!(trace.manager_decision.final_size, 2);
    assert!(trace.executed);
    assert_eq!(fund.portfolio().position, 0);
    assert_eq!(fund.portfolio().cash, 1000.0);
}

#[tokio::test]
async fn small_buy_passes_every_reviewer() {
    let oracle = ScriptedOracle::new(&["ACTION: BUY\nSIZE: 1\nREASON: Mild dip."]);
    let mut fund = pipeline(oracle, false);

    let trace = fund.run_step(&observation(50.0)).await;

    assert!(trace.risk_assessments.iter().all(|a| a.approved && a.suggested_size == 1));
    assert_eq!(
        trace.manager_decision.comment,
        "Approved by 3/3 risk agents. Final size=1."
    );
    assert_eq!(fund.portfolio().position, 1);
    assert_eq!(fund.portfolio().cash, 950.0);
}

#[tokio::test]
async fn sell_without_holdings_is_approved_but_not_filled() {
    let oracle = ScriptedOracle::new(&["ACTION: SELL\nSIZE: 1\nREASON: Overbought."]);
    let mut fund = pipeline(oracle, false);

    let trace = fund.run_step(&observation(100.0)).await;

    assert!(trace.manager_decision.approved);
    assert!(!trace.executed);
    assert_eq!(fund.portfolio().position, 0);
    assert_eq!(fund.portfolio().cash, 1000.0);
}

#[tokio::test]
async fn oracle_failure_holds() {
    let oracle = ScriptedOracle::new(&[]);
    let mut fund = pipeline(oracle.clone(), true);

    let trace = fund.run_step(&observation(100.0)).await;

    assert_eq!(trace.proposal.action, TradeAction::Hold);
    assert_eq!(trace.proposal.size, 0);
    assert_eq!(trace.proposal.rationale, "ACTION: HOLD SIZE: 0 REASON: Fallback due to error.");
    assert!(!trace.manager_decision.approved);
    assert_eq!(trace.manager_decision.final_action, TradeAction::Hold);
    assert_eq!(trace.manager_decision.comment, "Proposal rejected or downgraded to HOLD.");
    assert!(!trace.executed);
    assert_eq!(fund.portfolio().cash, 1000.0);

    let general = trace.general_analysis.unwrap();
    assert_eq!(general.stance, Stance::Neutral);
    assert_eq!(oracle.prompts().len(), 2);
}

#[tokio::test]
async fn hold_with_size_is_normalised() {
    let oracle = ScriptedOracle::new(&["ACTION: HOLD\nSIZE: 3\nREASON: Unclear."]);
    let mut fund = pipeline(oracle, false);

    let trace = fund.run_step(&observation(100.0)).await;

    assert_eq!(trace.proposal.action, TradeAction::Hold);
    assert_eq!(trace.proposal.size, 0);
    assert!(!trace.manager_decision.approved);
    assert!(!trace.executed);
}

#[tokio::test]
async fn general_analysis_feeds_the_trader_prompt() {
    let oracle = ScriptedOracle::new(&[
        "STANCE: BEARISH\nANALYSIS: Momentum is fading.",
        "ACTION: HOLD\nSIZE: 0\nREASON: Waiting.",
    ]);
    let mut fund = pipeline(oracle.clone(), true);

    let trace = fund.run_step(&observation(100.0)).await;

    let general = trace.general_analysis.as_ref().unwrap();
    assert_eq!(general.stance, Stance::Bearish);

    let prompts = oracle.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("You are a senior financial market analyst."));
    assert!(prompts[0].contains("Recent price history: [99.00, 99.50, 100.00]"));
    assert!(prompts[1].contains("General market analysis:\nSTANCE: BEARISH"));
    assert!(prompts[1].contains("Bullish research:"));
    assert!(prompts[1].contains("Current price: 100.00"));
}

#[tokio::test]
async fn without_general_analyst_one_call_per_step() {
    let oracle = ScriptedOracle::new(&["ACTION: HOLD\nSIZE: 0\nREASON: Flat."]);
    let mut fund = pipeline(oracle.clone(), false);

    let trace = fund.run_step(&observation(100.0)).await;

    assert!(trace.general_analysis.is_none());
    let prompts = oracle.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(!prompts[0].contains("General market analysis:"));

    let json = serde_json::to_value(&trace).unwrap();
    assert!(json.get("general_analysis").is_none());
    assert_eq!(json["risk_assessments"][0]["name"], "AggressiveRisk");
}
