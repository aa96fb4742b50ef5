//! Fund trader: turns research into a bounded trade proposal via the oracle.

use tracing::debug;

use super::oracle::FallbackOracle;
use crate::domain::{Evidence, Observation, TradeAction, TradeProposal};

/// Render the portfolio-manager prompt
pub fn build_prompt(
    observation: &Observation,
    bullish: &Evidence,
    bearish: &Evidence,
    general: Option<&Evidence>,
) -> String {
    let general_section = general
        .map(|g| format!("\nGeneral market analysis:\n{}\n", g.text))
        .unwrap_or_default();

    format!(
        r#"
You are an experienced portfolio manager in a trading team.

Market context:
- Current price: {price:.2}
- Recent prices: [{history}]
- News: {news}

Bullish research:
{bull}

Bearish research:
{bear}
{general_section}
Task:
1. Decide a trading ACTION among: BUY, SELL, HOLD.
2. Choose a position SIZE between 0 and 3 (integer).
3. Explain your decision in one short sentence.

IMPORTANT RULE:
- If ACTION is HOLD, SIZE must be 0.

Return exactly this format:
ACTION: <BUY/SELL/HOLD>
SIZE: <0-3>
REASON: <short text>
"#,
        price = observation.price,
        history = observation.history_csv(),
        news = observation.news,
        bull = bullish.text,
        bear = bearish.text,
    )
}

/// Parse the oracle's free text into a proposal.
///
/// Lines are matched case-insensitively. An `ACTION:` line picks BUY, then
/// SELL, else HOLD. A `SIZE:` line reads every digit on the line as one
/// number. Anything missing keeps the hold/0 default.
pub fn parse_proposal(raw: &str) -> TradeProposal {
    let mut action = TradeAction::Hold;
    let mut size: u32 = 0;

    for line in raw.lines() {
        let upper = line.to_uppercase();
        if upper.contains("ACTION:") {
            action = if upper.contains("BUY") {
                TradeAction::Buy
            } else if upper.contains("SELL") {
                TradeAction::Sell
            } else {
                TradeAction::Hold
            };
        } else if upper.contains("SIZE:") {
            let digits: String = upper.chars().filter(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                // only overflow can fail here
                size = digits.parse().unwrap_or(u32::MAX);
            }
        }
    }

    TradeProposal::new(action, size, raw.replace('\n', " "))
}

/// Proposal generator for the fund
pub struct LlmTrader {
    oracle: FallbackOracle,
}

impl LlmTrader {
    pub fn new(oracle: FallbackOracle) -> Self {
        Self { oracle }
    }

    pub async fn propose_trade(
        &self,
        observation: &Observation,
        bullish: &Evidence,
        bearish: &Evidence,
        general: Option<&Evidence>,
    ) -> TradeProposal {
        let prompt = build_prompt(observation, bullish, bearish, general);
        let raw = self.oracle.ask(&prompt).await;
        let proposal = parse_proposal(&raw);
        debug!(action = %proposal.action, size = proposal.size, "Trade proposed");
        proposal
    }
}
