pub mod agent;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod simulation;
pub mod strategy;

pub use agent::{build_oracle, FallbackOracle, FundPipeline, FundTrace, Oracle};
pub use config::AppConfig;
pub use domain::{ManagerDecision, Portfolio, RiskAssessment, TradeAction, TradeProposal};
pub use error::{QuorumError, Result};
pub use simulation::{run, Simulation, SimulationSummary, StepSnapshot};
