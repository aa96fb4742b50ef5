use serde::{Deserialize, Serialize};

/// Trade instruction for a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl TradeAction {
    pub const ALL: [TradeAction; 3] = [TradeAction::Buy, TradeAction::Sell, TradeAction::Hold];

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "buy",
            TradeAction::Sell => "sell",
            TradeAction::Hold => "hold",
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self, TradeAction::Hold)
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Direction an evidence text argues for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stance::Bullish => write!(f, "bullish"),
            Stance::Bearish => write!(f, "bearish"),
            Stance::Neutral => write!(f, "neutral"),
        }
    }
}

/// Stance-tagged research text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub stance: Stance,
    pub text: String,
}

impl Evidence {
    pub fn new(stance: Stance, text: impl Into<String>) -> Self {
        Self {
            stance,
            text: text.into(),
        }
    }
}

/// Largest size the fund may request in one step
pub const MAX_PROPOSAL_SIZE: u32 = 3;

/// The fund's requested trade before risk review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeProposal {
    pub action: TradeAction,
    pub size: u32,
    pub rationale: String,
}

impl TradeProposal {
    /// Build a proposal, clamping size into `[0, MAX_PROPOSAL_SIZE]` and
    /// forcing zero size on hold.
    pub fn new(action: TradeAction, size: u32, rationale: impl Into<String>) -> Self {
        let size = if action.is_hold() {
            0
        } else {
            size.min(MAX_PROPOSAL_SIZE)
        };
        Self {
            action,
            size,
            rationale: rationale.into(),
        }
    }

    pub fn hold(rationale: impl Into<String>) -> Self {
        Self::new(TradeAction::Hold, 0, rationale)
    }
}

/// One reviewer's verdict on a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(rename = "name")]
    pub reviewer: String,
    pub approved: bool,
    #[serde(rename = "size")]
    pub suggested_size: u32,
    pub comment: String,
}

/// Final, possibly downgraded, instruction after aggregating reviews
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerDecision {
    pub approved: bool,
    pub final_action: TradeAction,
    pub final_size: u32,
    pub comment: String,
}

impl ManagerDecision {
    pub fn approve(action: TradeAction, size: u32, comment: impl Into<String>) -> Self {
        Self {
            approved: true,
            final_action: action,
            final_size: size,
            comment: comment.into(),
        }
    }

    pub fn reject(comment: impl Into<String>) -> Self {
        Self {
            approved: false,
            final_action: TradeAction::Hold,
            final_size: 0,
            comment: comment.into(),
        }
    }

    /// True when execution has something to do
    pub fn is_actionable(&self) -> bool {
        self.approved && !self.final_action.is_hold() && self.final_size > 0
    }
}
