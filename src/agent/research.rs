//! Research team
//!
//! Bullish and bearish researchers are rule-based; the general analyst asks
//! the oracle for a neutral read of the market.

use async_trait::async_trait;

use super::oracle::FallbackOracle;
use crate::domain::{Evidence, Observation, Stance};

#[async_trait]
pub trait Researcher: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, observation: &Observation) -> Evidence;
}

fn bullet_text(observation: &Observation, trend: &str, conclusion: &str) -> String {
    format!(
        "- Current price: {:.2}\n- {}\n- News context: {}\n=> {}",
        observation.price, trend, observation.news, conclusion
    )
}

/// Argues for buying
pub struct BullishResearcher;

impl BullishResearcher {
    pub fn evidence(&self, observation: &Observation) -> Evidence {
        let trend = match observation.last_move() {
            Some((prev, last)) if last > prev => "Recent price trend is upward.",
            _ => "Price shows potential for recovery.",
        };
        Evidence::new(
            Stance::Bullish,
            bullet_text(
                observation,
                trend,
                "Overall, there are arguments in favor of a BUY position.",
            ),
        )
    }
}

#[async_trait]
impl Researcher for BullishResearcher {
    fn name(&self) -> &str {
        "BullishResearcher"
    }

    async fn analyze(&self, observation: &Observation) -> Evidence {
        self.evidence(observation)
    }
}

/// Argues for selling or caution
pub struct BearishResearcher;

impl BearishResearcher {
    pub fn evidence(&self, observation: &Observation) -> Evidence {
        let trend = match observation.last_move() {
            Some((prev, last)) if last < prev => "Recent price trend is downward.",
            _ => "Price may be overvalued compared to recent history.",
        };
        Evidence::new(
            Stance::Bearish,
            bullet_text(
                observation,
                trend,
                "Overall, there are arguments in favor of a SELL or cautious stance.",
            ),
        )
    }
}

#[async_trait]
impl Researcher for BearishResearcher {
    fn name(&self) -> &str {
        "BearishResearcher"
    }

    async fn analyze(&self, observation: &Observation) -> Evidence {
        self.evidence(observation)
    }
}

/// History points shown to the general analyst
const GENERAL_WINDOW: usize = 10;

/// Oracle-backed neutral analyst
pub struct GeneralAnalyst {
    oracle: FallbackOracle,
}

impl GeneralAnalyst {
    pub fn new(oracle: FallbackOracle) -> Self {
        Self { oracle }
    }

    pub fn build_prompt(observation: &Observation) -> String {
        let start = observation.history.len().saturating_sub(GENERAL_WINDOW);
        let recent = observation.history[start..]
            .iter()
            .map(|p| format!("{:.2}", p))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"
You are a senior financial market analyst.

Market data:
- Current price: {:.2}
- Recent price history: [{}]
- News: {}

Task:
1. Analyze the overall market situation.
2. Indicate whether the market is BULLISH, BEARISH, or NEUTRAL.
3. Give a short explanation (2-3 sentences).

Return format:
STANCE: <BULLISH / BEARISH / NEUTRAL>
ANALYSIS: <short explanation>
"#,
            observation.price, recent, observation.news
        )
    }
}

/// "BULLISH" wins over "BEARISH"; neither means neutral
pub fn classify_stance(raw: &str) -> Stance {
    let upper = raw.to_uppercase();
    if upper.contains("BULLISH") {
        Stance::Bullish
    } else if upper.contains("BEARISH") {
        Stance::Bearish
    } else {
        Stance::Neutral
    }
}

#[async_trait]
impl Researcher for GeneralAnalyst {
    fn name(&self) -> &str {
        "GeneralAnalyst"
    }

    async fn analyze(&self, observation: &Observation) -> Evidence {
        let raw = self.oracle.ask(&Self::build_prompt(observation)).await;
        Evidence::new(classify_stance(&raw), raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::oracle::{MockOracle, FALLBACK_RESPONSE};
    use crate::error::QuorumError;
    use std::sync::Arc;

    fn obs(history: Vec<f64>) -> Observation {
        Observation {
            price: *history.last().unwrap_or(&100.0),
            history,
            news: "Sentiment: neutral. Headline: Market remains relatively stable with no major news."
                .to_string(),
        }
    }

    #[test]
    fn test_bullish_text() {
        let evidence = BullishResearcher.evidence(&obs(vec![100.0, 101.25]));
        assert_eq!(evidence.stance, Stance::Bullish);
        assert_eq!(
            evidence.text,
            "- Current price: 101.25\n\
             - Recent price trend is upward.\n\
             - News context: Sentiment: neutral. Headline: Market remains relatively stable with no major news.\n\
             => Overall, there are arguments in favor of a BUY position."
        );

        let flat = BullishResearcher.evidence(&obs(vec![100.0]));
        assert!(flat.text.contains("Price shows potential for recovery."));
    }

    #[test]
    fn test_bearish_text() {
        let down = BearishResearcher.evidence(&obs(vec![100.0, 99.0]));
        assert_eq!(down.stance, Stance::Bearish);
        assert!(down.text.contains("Recent price trend is downward."));
        assert!(down.text.ends_with("SELL or cautious stance."));

        let up = BearishResearcher.evidence(&obs(vec![99.0, 100.0]));
        assert!(up.text.contains("Price may be overvalued compared to recent history."));
    }

    #[test]
    fn test_classify_stance() {
        assert_eq!(classify_stance("STANCE: bullish\nANALYSIS: ok"), Stance::Bullish);
        assert_eq!(classify_stance("Stance: Bearish"), Stance::Bearish);
        assert_eq!(classify_stance("not bullish, not bearish"), Stance::Bullish);
        assert_eq!(classify_stance(FALLBACK_RESPONSE), Stance::Neutral);
    }

    #[test]
    fn test_general_prompt_uses_last_ten_points() {
        let history: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let prompt = GeneralAnalyst::build_prompt(&obs(history));
        assert!(prompt.contains("- Recent price history: [105.00, 106.00,"));
        assert!(prompt.contains("114.00]"));
        assert!(!prompt.contains("104.00"));
        assert!(prompt.contains("STANCE: <BULLISH / BEARISH / NEUTRAL>"));
    }

    #[tokio::test]
    async fn test_general_analyst_maps_oracle_reply() {
        let mut mock = MockOracle::new();
        mock.expect_generate()
            .returning(|_, _| Ok("STANCE: BEARISH\nANALYSIS: Momentum is fading.".to_string()));
        let analyst = GeneralAnalyst::new(FallbackOracle::new(Arc::new(mock), "llama3"));

        let evidence = analyst.analyze(&obs(vec![100.0, 99.0])).await;
        assert_eq!(evidence.stance, Stance::Bearish);
        assert!(evidence.text.contains("Momentum is fading."));
    }

    #[tokio::test]
    async fn test_general_analyst_is_neutral_on_failure() {
        let mut mock = MockOracle::new();
        mock.expect_generate()
            .returning(|_, _| Err(QuorumError::OracleUnavailable("down".into())));
        let analyst = GeneralAnalyst::new(FallbackOracle::new(Arc::new(mock), "llama3"));

        let evidence = analyst.analyze(&obs(vec![100.0])).await;
        assert_eq!(evidence.stance, Stance::Neutral);
        assert_eq!(evidence.text, FALLBACK_RESPONSE);
    }
}
