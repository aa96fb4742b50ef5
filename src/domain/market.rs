use serde::{Deserialize, Serialize};

/// Sentiment band derived from the last price change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsBand {
    VeryPositive,
    SlightlyPositive,
    VeryNegative,
    SlightlyNegative,
    Neutral,
}

impl NewsBand {
    /// Classify a signed price change.
    ///
    /// Bands are checked in order with strict comparisons, so a return of
    /// exactly `+1.0` is slightly positive and exactly `+0.2` is neutral.
    pub fn classify(last_return: f64) -> Self {
        if last_return > 1.0 {
            NewsBand::VeryPositive
        } else if last_return > 0.2 {
            NewsBand::SlightlyPositive
        } else if last_return < -1.0 {
            NewsBand::VeryNegative
        } else if last_return < -0.2 {
            NewsBand::SlightlyNegative
        } else {
            NewsBand::Neutral
        }
    }

    pub fn sentiment(&self) -> &'static str {
        match self {
            NewsBand::VeryPositive => "very positive",
            NewsBand::SlightlyPositive => "slightly positive",
            NewsBand::VeryNegative => "very negative",
            NewsBand::SlightlyNegative => "slightly negative",
            NewsBand::Neutral => "neutral",
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            NewsBand::VeryPositive => "Strong rally after optimistic earnings reports.",
            NewsBand::SlightlyPositive => "Market moves up on mild positive news.",
            NewsBand::VeryNegative => "Sharp drop after unexpected bad macroeconomic data.",
            NewsBand::SlightlyNegative => "Market declines amid cautious investor sentiment.",
            NewsBand::Neutral => "Market remains relatively stable with no major news.",
        }
    }

    /// News line handed to agents
    pub fn news(&self) -> String {
        format!("Sentiment: {}. Headline: {}", self.sentiment(), self.headline())
    }
}

/// Point-in-time view of the market handed to every agent in a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Current price
    pub price: f64,
    /// Trailing price window, oldest first, ending with `price`
    pub history: Vec<f64>,
    /// Generated news line
    pub news: String,
}

impl Observation {
    /// Last two prices of the window, if present
    pub fn last_move(&self) -> Option<(f64, f64)> {
        match self.history.as_slice() {
            [.., prev, last] => Some((*prev, *last)),
            _ => None,
        }
    }

    /// Mean of the window, `None` when empty
    pub fn mean_price(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.history.iter().sum::<f64>() / self.history.len() as f64)
    }

    /// History as `a, b, c` with two decimals
    pub fn history_csv(&self) -> String {
        self.history
            .iter()
            .map(|p| format!("{:.2}", p))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
