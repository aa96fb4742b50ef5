//! Risk review panel
//!
//! Each reviewer caps a single trade at a fraction of the fund's marked
//! value. Oversized trades are scaled down by the aggressive and neutral
//! reviewers and rejected outright by the conservative one.

use serde::{Deserialize, Serialize};

use crate::domain::{Portfolio, RiskAssessment, TradeProposal};

/// Reviewer tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Aggressive,
    Neutral,
    Conservative,
}

impl RiskTier {
    /// Maximum fraction of portfolio value per trade
    pub fn cap(&self) -> f64 {
        match self {
            RiskTier::Aggressive => 0.40,
            RiskTier::Neutral => 0.25,
            RiskTier::Conservative => 0.10,
        }
    }

    /// Smallest size a scaled-down approval may carry; `None` rejects instead
    fn scaled_floor(&self) -> Option<u32> {
        match self {
            RiskTier::Aggressive => Some(1),
            RiskTier::Neutral => Some(0),
            RiskTier::Conservative => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Aggressive => "aggressive",
            RiskTier::Neutral => "neutral",
            RiskTier::Conservative => "conservative",
        }
    }

    fn within_cap_comment(&self) -> &'static str {
        match self {
            RiskTier::Aggressive => "trade size acceptable.",
            RiskTier::Neutral => "trade size is fine.",
            RiskTier::Conservative => "trade acceptable under conservative limits.",
        }
    }

    fn over_cap_comment(&self) -> &'static str {
        match self {
            RiskTier::Aggressive => "trade is quite large, reducing size slightly.",
            RiskTier::Neutral => "trade too large, scaling down to medium size.",
            RiskTier::Conservative => "trade exceeds conservative risk limits, rejecting.",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named reviewer with a fixed tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskReviewer {
    name: String,
    tier: RiskTier,
}

impl RiskReviewer {
    pub fn new(name: impl Into<String>, tier: RiskTier) -> Self {
        Self {
            name: name.into(),
            tier,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(
        &self,
        proposal: &TradeProposal,
        portfolio: &Portfolio,
        price: f64,
    ) -> RiskAssessment {
        let trade_value = proposal.size as f64 * price;
        let total_value = portfolio.value(price);
        let fraction = if total_value > 0.0 {
            trade_value / total_value
        } else {
            0.0
        };
        let cap = self.tier.cap();

        let (approved, suggested_size, outcome) = if fraction > cap {
            match self.tier.scaled_floor() {
                Some(floor) => {
                    // float -> int casts saturate, and fraction > cap implies price > 0
                    let scaled = (cap * total_value / price).floor() as u32;
                    (true, scaled.max(floor), self.tier.over_cap_comment())
                }
                None => (false, 0, self.tier.over_cap_comment()),
            }
        } else {
            (true, proposal.size, self.tier.within_cap_comment())
        };

        RiskAssessment {
            reviewer: self.name.clone(),
            approved,
            suggested_size,
            comment: format!("{} review: {}", self.tier, outcome),
        }
    }
}

/// The three reviewers consulted on every proposal
#[derive(Debug, Clone)]
pub struct RiskPanel {
    reviewers: Vec<RiskReviewer>,
}

impl Default for RiskPanel {
    fn default() -> Self {
        Self {
            reviewers: vec![
                RiskReviewer::new("AggressiveRisk", RiskTier::Aggressive),
                RiskReviewer::new("NeutralRisk", RiskTier::Neutral),
                RiskReviewer::new("ConservativeRisk", RiskTier::Conservative),
            ],
        }
    }
}

impl RiskPanel {
    pub fn reviewers(&self) -> &[RiskReviewer] {
        &self.reviewers
    }

    /// One assessment per reviewer, in panel order
    pub fn review(
        &self,
        proposal: &TradeProposal,
        portfolio: &Portfolio,
        price: f64,
    ) -> Vec<RiskAssessment> {
        self.reviewers
            .iter()
            .map(|r| r.evaluate(proposal, portfolio, price))
            .collect()
    }
}
