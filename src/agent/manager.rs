//! Fund manager: majority vote over the risk panel, median size.

use crate::domain::{ManagerDecision, RiskAssessment, TradeProposal};

/// Approvals needed to pass a proposal
pub const REQUIRED_APPROVALS: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct FundManager;

impl FundManager {
    pub fn decide(
        &self,
        proposal: &TradeProposal,
        assessments: &[RiskAssessment],
    ) -> ManagerDecision {
        let approvals = assessments.iter().filter(|a| a.approved).count();

        if approvals < REQUIRED_APPROVALS || proposal.action.is_hold() || proposal.size == 0 {
            return ManagerDecision::reject("Proposal rejected or downgraded to HOLD.");
        }

        let mut sizes: Vec<u32> = assessments.iter().map(|a| a.suggested_size).collect();
        sizes.sort_unstable();
        let median = sizes[sizes.len() / 2];

        if median == 0 {
            return ManagerDecision::reject("Median size is zero, downgraded to HOLD.");
        }

        ManagerDecision::approve(
            proposal.action,
            median,
            format!(
                "Approved by {}/{} risk agents. Final size={}.",
                approvals,
                assessments.len(),
                median
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeAction;

    fn review(approved: bool, size: u32) -> RiskAssessment {
        RiskAssessment {
            reviewer: "R".to_string(),
            approved,
            suggested_size: size,
            comment: String::new(),
        }
    }

    #[test]
    fn test_median_of_mixed_panel() {
        let proposal = TradeProposal::new(TradeAction::Buy, 2, "");
        let decision = FundManager.decide(
            &proposal,
            &[review(true, 2), review(true, 1), review(false, 0)],
        );
        assert!(decision.approved);
        assert_eq!(decision.final_action, TradeAction::Buy);
        assert_eq!(decision.final_size, 1);
        assert_eq!(decision.comment, "Approved by 2/3 risk agents. Final size=1.");
    }

    #[test]
    fn test_median_not_minimum() {
        let proposal = TradeProposal::new(TradeAction::Sell, 3, "");
        let decision = FundManager.decide(
            &proposal,
            &[review(true, 3), review(true, 3), review(true, 1)],
        );
        assert!(decision.approved);
        assert_eq!(decision.final_action, TradeAction::Sell);
        assert_eq!(decision.final_size, 3);
    }

    #[test]
    fn test_zero_median_downgrades() {
        let proposal = TradeProposal::new(TradeAction::Buy, 1, "");
        let decision = FundManager.decide(
            &proposal,
            &[review(true, 1), review(true, 0), review(false, 0)],
        );
        assert_eq!(decision, ManagerDecision::reject("Median size is zero, downgraded to HOLD."));
    }

    #[test]
    fn test_single_approval_rejects() {
        let proposal = TradeProposal::new(TradeAction::Buy, 2, "");
        let decision = FundManager.decide(
            &proposal,
            &[review(true, 2), review(false, 0), review(false, 0)],
        );
        assert!(!decision.approved);
        assert_eq!(decision.final_action, TradeAction::Hold);
        assert_eq!(decision.final_size, 0);
        assert_eq!(decision.comment, "Proposal rejected or downgraded to HOLD.");
    }

    #[test]
    fn test_hold_proposal_rejects_even_when_approved() {
        let proposal = TradeProposal::hold("");
        let decision = FundManager.decide(
            &proposal,
            &[review(true, 0), review(true, 0), review(true, 0)],
        );
        assert!(!decision.approved);
        assert_eq!(decision.comment, "Proposal rejected or downgraded to HOLD.");
    }

    #[test]
    fn test_empty_panel_rejects() {
        let proposal = TradeProposal::new(TradeAction::Buy, 1, "");
        assert!(!FundManager.decide(&proposal, &[]).approved);
    }
}
