//! Integration test: governance proposal lifecycle.
//!
//! Walks proposals through the full schedule against a live core:
//! 1. Propose, vote, execute; the risk weights change and the fee
//!    lands in the treasury
//! 2. The voting window rejects early, late and duplicate votes
//! 3. Quorum is a strict bound and a failed tally leaves parameters
//!    untouched
//!
//! Default schedule: one day delay, three day voting period, fourteen
//! day execution window, 10% quorum of the one million token supply.

use ancora_core::{CoreError, ProtocolConfig, StabilityCore};
use ancora_fixed::Fixed;
use ancora_governance::GovernanceError;
use ancora_risk::RiskParameters;
use ancora_types::{AccountId, GOVERNANCE_TREASURY};

const BASE_TIME: u64 = 1_700_000_000;
const DAY: u64 = 86_400;

const ADMIN: AccountId = [0xAA; 32];
const ALICE: AccountId = [0x01; 32];
const BOB: AccountId = [0x02; 32];
const CAROL: AccountId = [0x03; 32];

fn fx(s: &str) -> Fixed {
    s.parse().expect("test value should parse")
}

fn new_core() -> StabilityCore {
    ancora_integration_tests::init_tracing();
    StabilityCore::new(ADMIN, &ProtocolConfig::default(), BASE_TIME)
        .expect("core should assemble")
}

#[test]
fn proposal_lifecycle_applies_new_weights() {
    let mut core = new_core();

    // ======================================================
    // Step 1: distribute voting power
    // ======================================================
    core.transfer_governance_token(ADMIN, ALICE, fx("300000"), BASE_TIME)
        .expect("fund alice");
    core.transfer_governance_token(ADMIN, BOB, fx("150000"), BASE_TIME)
        .expect("fund bob");

    // ======================================================
    // Step 2: Alice proposes new weights, paying the fee
    // ======================================================
    let id = core
        .propose(
            ALICE,
            "retune weights toward volatility",
            fx("0.4"),
            fx("0.4"),
            fx("0.2"),
            BASE_TIME,
        )
        .expect("propose");
    assert_eq!(id, 1);
    assert_eq!(core.governance_token().balance_of(&ALICE), fx("299990"));
    assert_eq!(
        core.governance_token().balance_of(&GOVERNANCE_TREASURY),
        fx("10")
    );

    // ======================================================
    // Step 3: votes land inside the window, weighted by balance
    // ======================================================
    let voting_day = BASE_TIME + DAY;
    core.cast_vote(ALICE, id, true, voting_day).expect("for");
    core.cast_vote(BOB, id, false, voting_day).expect("against");
    let proposal = core.proposals().proposal(id).expect("proposal exists");
    assert_eq!(proposal.for_votes, fx("299990"));
    assert_eq!(proposal.against_votes, fx("150000"));

    // ======================================================
    // Step 4: anyone may execute once voting closes
    // ======================================================
    let after_voting = BASE_TIME + 4 * DAY + 1;
    core.execute_proposal(BOB, id, after_voting).expect("execute");

    let params = core.risk_parameters();
    assert_eq!(params.alpha, fx("0.4"));
    assert_eq!(params.beta, fx("0.4"));
    assert_eq!(params.gamma, fx("0.2"));
    // Bands are retained from the standing parameters.
    assert_eq!(params.cushion, fx("0.01"));
    assert_eq!(params.wall, fx("0.02"));
    assert!(core.proposals().proposal(id).expect("proposal").executed);

    // ======================================================
    // Step 5: replay and bad ids are rejected
    // ======================================================
    let err = core
        .execute_proposal(BOB, id, after_voting + 1)
        .expect_err("replay");
    assert!(matches!(
        err,
        CoreError::Governance(GovernanceError::AlreadyExecuted { id: 1 })
    ));
    let err = core
        .execute_proposal(BOB, 42, after_voting + 1)
        .expect_err("unknown id");
    assert!(matches!(
        err,
        CoreError::Governance(GovernanceError::UnknownProposal { id: 42 })
    ));
}

#[test]
fn voting_window_rejects_out_of_schedule_actions() {
    let mut core = new_core();
    let id = core
        .propose(ADMIN, "early bird", fx("0.3"), fx("0.3"), fx("0.1"), BASE_TIME)
        .expect("propose");

    // Before the delay elapses no votes are accepted.
    let err = core
        .cast_vote(ADMIN, id, true, BASE_TIME)
        .expect_err("too early");
    assert!(matches!(
        err,
        CoreError::Governance(GovernanceError::VotingClosed { id: 1 })
    ));

    // Execution is rejected while voting is still open.
    let err = core
        .execute_proposal(ADMIN, id, BASE_TIME + 2 * DAY)
        .expect_err("voting still open");
    assert!(matches!(
        err,
        CoreError::Governance(GovernanceError::VotingClosed { id: 1 })
    ));

    // Inside the window the vote lands; a second one does not.
    core.cast_vote(ADMIN, id, true, BASE_TIME + DAY).expect("vote");
    let err = core
        .cast_vote(ADMIN, id, true, BASE_TIME + DAY + 1)
        .expect_err("double vote");
    assert!(matches!(
        err,
        CoreError::Governance(GovernanceError::AlreadyVoted { id: 1 })
    ));

    // After the window closes no further votes are accepted.
    let err = core
        .cast_vote(BOB, id, false, BASE_TIME + 4 * DAY + 1)
        .expect_err("too late");
    assert!(matches!(
        err,
        CoreError::Governance(GovernanceError::VotingClosed { id: 1 })
    ));

    // Past the execution deadline the proposal has expired.
    let err = core
        .execute_proposal(ADMIN, id, BASE_TIME + 18 * DAY + 1)
        .expect_err("expired");
    assert!(matches!(
        err,
        CoreError::Governance(GovernanceError::ProposalExpired { id: 1 })
    ));
}

#[test]
fn quorum_is_a_strict_bound() {
    let mut core = new_core();

    // Carol ends up with exactly the quorum: 10% of one million.
    core.transfer_governance_token(ADMIN, CAROL, fx("100010"), BASE_TIME)
        .expect("fund carol");
    let id = core
        .propose(CAROL, "minority report", fx("0.2"), fx("0.6"), fx("0.1"), BASE_TIME)
        .expect("propose");
    assert_eq!(core.governance_token().balance_of(&CAROL), fx("100000"));

    core.cast_vote(CAROL, id, true, BASE_TIME + DAY).expect("vote");

    // 100000 for-votes do not strictly exceed the 100000 quorum.
    let err = core
        .execute_proposal(CAROL, id, BASE_TIME + 4 * DAY + 1)
        .expect_err("at quorum, not over it");
    assert!(matches!(
        err,
        CoreError::Governance(GovernanceError::ProposalNotSucceeded { id: 1 })
    ));

    // The failed tally left the parameters untouched.
    assert_eq!(core.risk_parameters(), RiskParameters::default());
    assert!(!core.proposals().proposal(id).expect("proposal").executed);
}
