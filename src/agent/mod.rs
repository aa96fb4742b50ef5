//! The LLM fund
//!
//! This module provides the fund's decision pipeline:
//! - Rule-based bullish/bearish research and an oracle-backed general analyst
//! - Trade proposals generated by the oracle
//! - A three-tier risk panel and a majority-vote manager
//! - Execution against the fund portfolio

pub mod execution;
pub mod manager;
pub mod oracle;
pub mod pipeline;
pub mod research;
pub mod risk;
pub mod trader;

pub use execution::ExecutionUnit;
pub use manager::FundManager;
pub use oracle::{
    build_oracle, FallbackOracle, OfflineOracle, OllamaClient, Oracle, FALLBACK_RESPONSE,
};
pub use pipeline::{FundPipeline, FundTrace, PortfolioReport};
pub use research::{BearishResearcher, BullishResearcher, GeneralAnalyst, Researcher};
pub use risk::{RiskPanel, RiskReviewer, RiskTier};
pub use trader::{build_prompt, parse_proposal, LlmTrader};
