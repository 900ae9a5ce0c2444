//! Proposal lifecycle: propose, vote, execute.
//!
//! Each proposal carries a candidate set of risk weights and a fixed
//! timeline derived at creation: voting opens after the delay, stays
//! open for the period, and the proposal expires a fixed window after
//! creation whether or not it passed. Weights are validated against the
//! same admissible ranges the risk engine enforces, so an executed
//! proposal can always be applied.

use std::collections::{BTreeMap, BTreeSet};

use ancora_fixed::Fixed;
use ancora_risk::params::{GAMMA_MAX, GAMMA_MIN, WEIGHT_MAX, WEIGHT_MIN};
use ancora_types::{short_id, AccountId, SECS_PER_DAY};
use serde::{Deserialize, Serialize};

use crate::{GovernanceError, Result};

/// Voting opens this long after a proposal is created.
pub const DEFAULT_VOTING_DELAY: u64 = SECS_PER_DAY;

/// Voting stays open this long once it has opened.
pub const DEFAULT_VOTING_PERIOD: u64 = 3 * SECS_PER_DAY;

/// A proposal expires this long after creation.
pub const DEFAULT_EXECUTION_WINDOW: u64 = 14 * SECS_PER_DAY;

/// Default quorum: for-votes must exceed 10% of the token supply.
pub const DEFAULT_QUORUM_FRACTION: Fixed = Fixed::from_raw(100_000_000_000_000_000);

/// Admissible range for the quorum fraction: [0.01, 1.0].
pub const QUORUM_MIN: Fixed = Fixed::from_raw(10_000_000_000_000_000);
pub const QUORUM_MAX: Fixed = Fixed::ONE;

/// A single governance proposal over the risk weights.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    #[serde(with = "ancora_types::hexid")]
    pub proposer: AccountId,
    pub description: String,
    /// Candidate sentiment weight.
    pub alpha: Fixed,
    /// Candidate volatility weight.
    pub beta: Fixed,
    /// Candidate order-book-imbalance weight.
    pub gamma: Fixed,
    pub created_at: u64,
    /// First timestamp at which votes are accepted.
    pub voting_starts_at: u64,
    /// Last timestamp at which votes are accepted.
    pub voting_ends_at: u64,
    /// Last timestamp at which execution is accepted.
    pub execution_deadline: u64,
    pub for_votes: Fixed,
    pub against_votes: Fixed,
    pub executed: bool,
    #[serde(skip)]
    voters: BTreeSet<AccountId>,
}

impl Proposal {
    /// Whether `voter` has already cast a vote.
    pub fn has_voted(&self, voter: &AccountId) -> bool {
        self.voters.contains(voter)
    }
}

/// All proposals and the governance timing policy.
#[derive(Clone, Debug)]
pub struct ProposalBook {
    proposals: BTreeMap<u64, Proposal>,
    next_id: u64,
    voting_delay: u64,
    voting_period: u64,
    execution_window: u64,
    quorum_fraction: Fixed,
}

impl Default for ProposalBook {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalBook {
    /// Create an empty book with the default schedule and quorum.
    pub fn new() -> Self {
        Self {
            proposals: BTreeMap::new(),
            next_id: 1,
            voting_delay: DEFAULT_VOTING_DELAY,
            voting_period: DEFAULT_VOTING_PERIOD,
            execution_window: DEFAULT_EXECUTION_WINDOW,
            quorum_fraction: DEFAULT_QUORUM_FRACTION,
        }
    }

    /// Create an empty book with a specific schedule and quorum.
    ///
    /// # Errors
    ///
    /// - [`GovernanceError::InvalidSchedule`] if the voting period is zero
    ///   or the execution window closes before voting can end
    /// - [`GovernanceError::ParameterOutOfRange`] if the quorum fraction
    ///   lies outside `[0.01, 1.0]`
    pub fn with_schedule(
        voting_delay: u64,
        voting_period: u64,
        execution_window: u64,
        quorum_fraction: Fixed,
    ) -> Result<Self> {
        if voting_period == 0 {
            return Err(GovernanceError::InvalidSchedule(
                "voting period must be positive".to_string(),
            ));
        }
        if execution_window < voting_delay + voting_period {
            return Err(GovernanceError::InvalidSchedule(format!(
                "execution window {execution_window}s closes before voting ends at {}s",
                voting_delay + voting_period
            )));
        }
        if quorum_fraction < QUORUM_MIN || quorum_fraction > QUORUM_MAX {
            return Err(GovernanceError::ParameterOutOfRange {
                name: "quorum_fraction",
                value: quorum_fraction,
                min: QUORUM_MIN,
                max: QUORUM_MAX,
            });
        }
        Ok(Self {
            quorum_fraction,
            voting_delay,
            voting_period,
            execution_window,
            ..Self::new()
        })
    }

    /// The proposal under `id`, if any.
    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    /// Number of proposals ever created.
    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Create a proposal carrying candidate risk weights.
    ///
    /// Returns the new proposal's id. The weights are validated here so
    /// that execution can never produce an inapplicable parameter set.
    ///
    /// # Errors
    ///
    /// [`GovernanceError::ParameterOutOfRange`] naming the offending
    /// weight.
    pub fn propose(
        &mut self,
        proposer: AccountId,
        description: impl Into<String>,
        alpha: Fixed,
        beta: Fixed,
        gamma: Fixed,
        now: u64,
    ) -> Result<u64> {
        check_weight("alpha", alpha, WEIGHT_MIN, WEIGHT_MAX)?;
        check_weight("beta", beta, WEIGHT_MIN, WEIGHT_MAX)?;
        check_weight("gamma", gamma, GAMMA_MIN, GAMMA_MAX)?;

        let id = self.next_id;
        self.next_id += 1;
        let voting_starts_at = now + self.voting_delay;
        let proposal = Proposal {
            id,
            proposer,
            description: description.into(),
            alpha,
            beta,
            gamma,
            created_at: now,
            voting_starts_at,
            voting_ends_at: voting_starts_at + self.voting_period,
            execution_deadline: now + self.execution_window,
            for_votes: Fixed::ZERO,
            against_votes: Fixed::ZERO,
            executed: false,
            voters: BTreeSet::new(),
        };
        tracing::info!(
            id,
            proposer = %short_id(&proposer),
            alpha = %alpha,
            beta = %beta,
            gamma = %gamma,
            "proposal created"
        );
        self.proposals.insert(id, proposal);
        Ok(id)
    }

    /// Record a vote with the voter's token balance as weight.
    ///
    /// # Errors
    ///
    /// - [`GovernanceError::UnknownProposal`] for a bad id
    /// - [`GovernanceError::VotingClosed`] outside the voting window
    /// - [`GovernanceError::AlreadyVoted`] on a second vote
    /// - [`GovernanceError::Math`] on tally overflow
    pub fn cast_vote(
        &mut self,
        voter: AccountId,
        id: u64,
        support: bool,
        weight: Fixed,
        now: u64,
    ) -> Result<()> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::UnknownProposal { id })?;
        if now < proposal.voting_starts_at || now > proposal.voting_ends_at {
            return Err(GovernanceError::VotingClosed { id });
        }
        if proposal.voters.contains(&voter) {
            return Err(GovernanceError::AlreadyVoted { id });
        }
        if support {
            proposal.for_votes = proposal.for_votes.checked_add(weight)?;
        } else {
            proposal.against_votes = proposal.against_votes.checked_add(weight)?;
        }
        proposal.voters.insert(voter);
        tracing::debug!(
            id,
            voter = %short_id(&voter),
            support,
            weight = %weight,
            "vote cast"
        );
        Ok(())
    }

    /// Execute a passed proposal, returning the weights to apply.
    ///
    /// Succeeds only after the voting window has closed, within the
    /// execution window, and when for-votes exceed both the against-votes
    /// and the quorum (`total_supply · quorum_fraction`, strictly).
    ///
    /// # Errors
    ///
    /// - [`GovernanceError::UnknownProposal`] for a bad id
    /// - [`GovernanceError::AlreadyExecuted`] on re-execution
    /// - [`GovernanceError::VotingClosed`] before the window ends
    /// - [`GovernanceError::ProposalExpired`] past the deadline
    /// - [`GovernanceError::ProposalNotSucceeded`] on a failed tally
    /// - [`GovernanceError::Math`] on quorum arithmetic overflow
    pub fn execute(
        &mut self,
        id: u64,
        now: u64,
        total_supply: Fixed,
    ) -> Result<(Fixed, Fixed, Fixed)> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::UnknownProposal { id })?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted { id });
        }
        if now <= proposal.voting_ends_at {
            return Err(GovernanceError::VotingClosed { id });
        }
        if now > proposal.execution_deadline {
            return Err(GovernanceError::ProposalExpired { id });
        }
        let quorum = total_supply.checked_mul(self.quorum_fraction)?;
        if proposal.for_votes <= quorum || proposal.for_votes <= proposal.against_votes {
            return Err(GovernanceError::ProposalNotSucceeded { id });
        }
        proposal.executed = true;
        tracing::info!(
            id,
            alpha = %proposal.alpha,
            beta = %proposal.beta,
            gamma = %proposal.gamma,
            for_votes = %proposal.for_votes,
            against_votes = %proposal.against_votes,
            "proposal executed"
        );
        Ok((proposal.alpha, proposal.beta, proposal.gamma))
    }
}

fn check_weight(name: &'static str, value: Fixed, min: Fixed, max: Fixed) -> Result<()> {
    if value < min || value > max {
        return Err(GovernanceError::ParameterOutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROPOSER: AccountId = [1; 32];
    const ALICE: AccountId = [2; 32];
    const BOB: AccountId = [3; 32];
    const T0: u64 = 1_700_000_000;

    fn fx(s: &str) -> Fixed {
        s.parse().expect("test value should parse")
    }

    /// One million tokens, the governance token's initial supply.
    fn supply() -> Fixed {
        Fixed::from_int(1_000_000)
    }

    fn propose(book: &mut ProposalBook) -> u64 {
        book.propose(PROPOSER, "retune weights", fx("0.4"), fx("0.4"), fx("0.2"), T0)
            .expect("propose")
    }

    #[test]
    fn test_propose_assigns_sequential_ids() {
        let mut book = ProposalBook::new();
        assert_eq!(propose(&mut book), 1);
        assert_eq!(propose(&mut book), 2);
        assert_eq!(book.proposal_count(), 2);
    }

    #[test]
    fn test_propose_validates_weights() {
        let mut book = ProposalBook::new();
        let err = book
            .propose(PROPOSER, "bad alpha", fx("0.05"), fx("0.5"), fx("0.1"), T0)
            .expect_err("alpha below range");
        assert!(matches!(
            err,
            GovernanceError::ParameterOutOfRange { name: "alpha", .. }
        ));
        let err = book
            .propose(PROPOSER, "bad gamma", fx("0.5"), fx("0.5"), fx("0.6"), T0)
            .expect_err("gamma above range");
        assert!(matches!(
            err,
            GovernanceError::ParameterOutOfRange { name: "gamma", .. }
        ));
    }

    #[test]
    fn test_proposal_timeline() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        let p = book.proposal(id).expect("proposal");
        assert_eq!(p.voting_starts_at, T0 + SECS_PER_DAY);
        assert_eq!(p.voting_ends_at, T0 + 4 * SECS_PER_DAY);
        assert_eq!(p.execution_deadline, T0 + 14 * SECS_PER_DAY);
    }

    #[test]
    fn test_vote_before_window_opens() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        let err = book
            .cast_vote(ALICE, id, true, fx("100"), T0)
            .expect_err("window not open");
        assert!(matches!(err, GovernanceError::VotingClosed { .. }));
    }

    #[test]
    fn test_vote_window_boundaries() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        let starts = T0 + SECS_PER_DAY;
        let ends = T0 + 4 * SECS_PER_DAY;
        book.cast_vote(ALICE, id, true, fx("1"), starts)
            .expect("first valid second");
        book.cast_vote(BOB, id, true, fx("1"), ends)
            .expect("last valid second");
        let err = book
            .cast_vote([4; 32], id, true, fx("1"), ends + 1)
            .expect_err("window closed");
        assert!(matches!(err, GovernanceError::VotingClosed { .. }));
    }

    #[test]
    fn test_votes_tally_by_weight() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        let t = T0 + SECS_PER_DAY;
        book.cast_vote(ALICE, id, true, fx("150000"), t).expect("for");
        book.cast_vote(BOB, id, false, fx("40000"), t).expect("against");
        let p = book.proposal(id).expect("proposal");
        assert_eq!(p.for_votes, fx("150000"));
        assert_eq!(p.against_votes, fx("40000"));
        assert!(p.has_voted(&ALICE));
        assert!(!p.has_voted(&[9; 32]));
    }

    #[test]
    fn test_double_vote_rejected() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        let t = T0 + SECS_PER_DAY;
        book.cast_vote(ALICE, id, true, fx("10"), t).expect("first");
        let err = book
            .cast_vote(ALICE, id, false, fx("10"), t)
            .expect_err("second vote");
        assert!(matches!(err, GovernanceError::AlreadyVoted { .. }));
    }

    #[test]
    fn test_vote_on_unknown_proposal() {
        let mut book = ProposalBook::new();
        let err = book
            .cast_vote(ALICE, 99, true, fx("10"), T0)
            .expect_err("no such proposal");
        assert!(matches!(
            err,
            GovernanceError::UnknownProposal { id: 99 }
        ));
    }

    #[test]
    fn test_execute_before_voting_ends() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        let t = T0 + SECS_PER_DAY;
        book.cast_vote(ALICE, id, true, fx("200000"), t).expect("vote");
        // Still inside the window, even on its last second.
        let err = book
            .execute(id, T0 + 4 * SECS_PER_DAY, supply())
            .expect_err("voting still open");
        assert!(matches!(err, GovernanceError::VotingClosed { .. }));
    }

    #[test]
    fn test_execute_passed_proposal() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        book.cast_vote(ALICE, id, true, fx("200000"), T0 + SECS_PER_DAY)
            .expect("vote");
        let (alpha, beta, gamma) = book
            .execute(id, T0 + 4 * SECS_PER_DAY + 1, supply())
            .expect("execute");
        assert_eq!(alpha, fx("0.4"));
        assert_eq!(beta, fx("0.4"));
        assert_eq!(gamma, fx("0.2"));
        assert!(book.proposal(id).expect("proposal").executed);
    }

    #[test]
    fn test_execute_requires_strict_quorum() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        // Exactly 10% of supply is not enough; quorum must be exceeded.
        book.cast_vote(ALICE, id, true, fx("100000"), T0 + SECS_PER_DAY)
            .expect("vote");
        let err = book
            .execute(id, T0 + 5 * SECS_PER_DAY, supply())
            .expect_err("at quorum, not above");
        assert!(matches!(err, GovernanceError::ProposalNotSucceeded { .. }));

        let id = propose(&mut book);
        book.cast_vote(ALICE, id, true, fx("100000.000000000000000001"), T0 + SECS_PER_DAY)
            .expect("vote");
        book.execute(id, T0 + 5 * SECS_PER_DAY, supply())
            .expect("just above quorum");
    }

    #[test]
    fn test_execute_requires_majority() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        let t = T0 + SECS_PER_DAY;
        book.cast_vote(ALICE, id, true, fx("200000"), t).expect("for");
        book.cast_vote(BOB, id, false, fx("200000"), t).expect("against");
        let err = book
            .execute(id, T0 + 5 * SECS_PER_DAY, supply())
            .expect_err("tie fails");
        assert!(matches!(err, GovernanceError::ProposalNotSucceeded { .. }));
    }

    #[test]
    fn test_execute_twice_rejected() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        book.cast_vote(ALICE, id, true, fx("200000"), T0 + SECS_PER_DAY)
            .expect("vote");
        book.execute(id, T0 + 5 * SECS_PER_DAY, supply()).expect("first");
        let err = book
            .execute(id, T0 + 5 * SECS_PER_DAY, supply())
            .expect_err("second");
        assert!(matches!(err, GovernanceError::AlreadyExecuted { .. }));
    }

    #[test]
    fn test_execute_expiry_boundary() {
        let mut book = ProposalBook::new();
        let id = propose(&mut book);
        book.cast_vote(ALICE, id, true, fx("200000"), T0 + SECS_PER_DAY)
            .expect("vote");
        let deadline = T0 + 14 * SECS_PER_DAY;
        let err = book
            .execute(id, deadline + 1, supply())
            .expect_err("past deadline");
        assert!(matches!(err, GovernanceError::ProposalExpired { .. }));
        // The deadline second itself still executes.
        book.execute(id, deadline, supply()).expect("at deadline");
    }

    #[test]
    fn test_schedule_validation() {
        let err = ProposalBook::with_schedule(SECS_PER_DAY, 0, 14 * SECS_PER_DAY, fx("0.1"))
            .expect_err("zero period");
        assert!(matches!(err, GovernanceError::InvalidSchedule(_)));
        let err =
            ProposalBook::with_schedule(SECS_PER_DAY, 3 * SECS_PER_DAY, SECS_PER_DAY, fx("0.1"))
                .expect_err("window too short");
        assert!(matches!(err, GovernanceError::InvalidSchedule(_)));
        let err = ProposalBook::with_schedule(
            SECS_PER_DAY,
            3 * SECS_PER_DAY,
            14 * SECS_PER_DAY,
            fx("0.001"),
        )
        .expect_err("quorum below range");
        assert!(matches!(err, GovernanceError::ParameterOutOfRange { .. }));
    }
}
