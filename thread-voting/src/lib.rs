#![no_std]

multiversx_sc::imports!();

pub mod escrow;
pub mod proposal_book;
pub mod types;

use types::{Proposal, ThreadState};

// ============================================================
// Contract
// ============================================================

/// One governance campaign bound to a single ESDT governance token.
///
/// Voters back a proposal by attaching governance tokens to `vote`; the
/// tokens stay in the thread until the voting period is finished. After
/// that, voters of the winning proposal redeem exactly what they locked.
/// Stakes on losing proposals are never returned.
#[multiversx_sc::contract]
pub trait ThreadVoting: proposal_book::ProposalBookModule + escrow::EscrowModule {
    // ========================================================
    // Init / Upgrade
    // ========================================================

    #[init]
    fn init(
        &self,
        governance_token: TokenIdentifier,
        description: ManagedBuffer,
        start_time: u64,
        end_time: u64,
    ) {
        require!(
            governance_token.is_valid_esdt_identifier(),
            "Invalid governance token"
        );
        require!(start_time < end_time, "Invalid voting period");

        self.governance_token().set(&governance_token);
        self.description().set(&description);
        self.start_time().set(start_time);
        self.end_time().set(end_time);
        self.ended().set(false);
        self.winning_proposal_id().set(0u64);
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // ENDPOINT: createProposal
    // Open to anyone, in any state.
    // ========================================================

    #[endpoint(createProposal)]
    fn create_proposal(&self, description: ManagedBuffer) -> u64 {
        let caller = self.blockchain().get_caller();
        let proposal_id = self.create_proposal_record(&caller, &description);

        self.proposal_created_event(proposal_id, &caller, &description);

        proposal_id
    }

    // ========================================================
    // ENDPOINT: vote
    // Weight = governance tokens attached. Repeat votes on the
    // same proposal add up; a voter cannot switch proposals.
    // Proposal existence is checked by add_votes.
    // ========================================================

    #[endpoint(vote)]
    #[payable("*")]
    fn vote(&self, proposal_id: u64) {
        self.require_voting_open();

        // A zero-weight vote reaches the contract as a call with no payment.
        let payments = self.call_value().all_esdt_transfers();
        require!(!payments.is_empty(), "Must vote with at least 1 token");
        require!(payments.len() == 1, "Invalid governance token");

        let payment = payments.get(0);
        require!(
            payment.token_identifier == self.governance_token().get() && payment.token_nonce == 0,
            "Invalid governance token"
        );
        let amount = payment.amount.clone();

        let caller = self.blockchain().get_caller();
        self.lock_stake(&caller, proposal_id, &amount);
        self.add_votes(proposal_id, &caller, &amount);

        self.vote_cast_event(proposal_id, &caller, &amount);
    }

    // ========================================================
    // ENDPOINT: finishVotingPeriod
    // One-shot. Not gated on end_time: finishing early closes
    // the vote for everyone.
    // ========================================================

    #[endpoint(finishVotingPeriod)]
    fn finish_voting_period(&self) -> u64 {
        require!(!self.ended().get(), "Thread was ended");

        self.ended().set(true);
        let winner = self.leading_proposal();
        self.winning_proposal_id().set(winner);

        let now = self.blockchain().get_block_timestamp();
        self.voting_finished_event(winner, now);

        winner
    }

    // ========================================================
    // ENDPOINT: withdrawTokens
    // Winning-side voters get their own stake back, once.
    // ========================================================

    #[endpoint(withdrawTokens)]
    fn withdraw_tokens(&self) -> BigUint {
        require!(self.ended().get(), "Voting period not ended");

        let winner = self.winning_proposal_id().get();
        require!(winner != 0, "Thread not ended or no winning proposal");

        let caller = self.blockchain().get_caller();
        require!(
            self.is_committed_to(&caller, winner),
            "User not voted to winning proposal"
        );

        let token_id = self.governance_token().get();
        let amount = self.release_stake(&caller, &token_id);

        self.tokens_withdrawn_event(&caller, winner, &amount);

        amount
    }

    // ========================================================
    // INTERNAL: lifecycle
    // ========================================================

    fn thread_state(&self) -> ThreadState {
        if self.ended().get() {
            return ThreadState::Finalized;
        }

        let now = self.blockchain().get_block_timestamp();
        if now < self.start_time().get() {
            ThreadState::Pending
        } else if now < self.end_time().get() {
            ThreadState::Open
        } else {
            ThreadState::Closed
        }
    }

    fn require_voting_open(&self) {
        match self.thread_state() {
            ThreadState::Open => {}
            ThreadState::Pending => sc_panic!("Voting period not started"),
            ThreadState::Closed => sc_panic!("Voting period has ended"),
            ThreadState::Finalized => sc_panic!("Thread was ended"),
        }
    }

    // ========================================================
    // VIEWS: read-only queries
    // ========================================================

    #[view(getProposal)]
    fn get_proposal(&self, id: u64) -> Proposal<Self::Api> {
        self.require_proposal_exists(id);
        self.proposals(id).get()
    }

    #[view(getProposals)]
    fn get_proposals(&self, from: u64, count: u64) -> MultiValueEncoded<Proposal<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        let total = self.proposal_count().get();
        if count == 0 || total == 0 {
            return result;
        }
        let start = if from == 0 { 1u64 } else { from };
        if start > total {
            return result;
        }
        let end = core::cmp::min(start.saturating_add(count - 1), total);

        for id in start..=end {
            result.push(self.proposals(id).get());
        }
        result
    }

    #[view(getProposalCount)]
    fn get_proposal_count(&self) -> u64 {
        self.proposal_count().get()
    }

    #[view(getUserVote)]
    fn get_user_vote(&self, proposal_id: u64, voter: &ManagedAddress) -> BigUint {
        self.user_votes(proposal_id, voter).get()
    }

    #[view(winningProposal)]
    fn winning_proposal(&self) -> u64 {
        self.winning_proposal_id().get()
    }

    #[view(governanceToken)]
    fn get_governance_token(&self) -> TokenIdentifier {
        self.governance_token().get()
    }

    #[view(description)]
    fn get_description(&self) -> ManagedBuffer {
        self.description().get()
    }

    #[view(startTime)]
    fn get_start_time(&self) -> u64 {
        self.start_time().get()
    }

    #[view(endTime)]
    fn get_end_time(&self) -> u64 {
        self.end_time().get()
    }

    #[view(isEnded)]
    fn is_ended(&self) -> bool {
        self.ended().get()
    }

    #[view(getThreadState)]
    fn get_thread_state(&self) -> ThreadState {
        self.thread_state()
    }

    /// 0 if the voter never voted.
    #[view(getVoterChoice)]
    fn get_voter_choice(&self, voter: &ManagedAddress) -> u64 {
        self.voter_choice(voter).get()
    }

    #[view(getLockedAmount)]
    fn get_locked_amount(&self, voter: &ManagedAddress) -> BigUint {
        self.locked_amount(voter).get()
    }

    #[view(hasWithdrawn)]
    fn has_withdrawn(&self, voter: &ManagedAddress) -> bool {
        self.withdrawn(voter).get()
    }

    #[view(getEscrowedTotal)]
    fn get_escrowed_total(&self) -> BigUint {
        self.total_escrowed().get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("proposalCreated")]
    fn proposal_created_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] proposer: &ManagedAddress,
        description: &ManagedBuffer,
    );

    #[event("voteCast")]
    fn vote_cast_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] voter: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("votingFinished")]
    fn voting_finished_event(
        &self,
        #[indexed] winning_proposal_id: u64,
        #[indexed] finished_at: u64,
    );

    #[event("tokensWithdrawn")]
    fn tokens_withdrawn_event(
        &self,
        #[indexed] voter: &ManagedAddress,
        #[indexed] proposal_id: u64,
        amount: &BigUint,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    // ── Configuration ──

    #[storage_mapper("governanceToken")]
    fn governance_token(&self) -> SingleValueMapper<TokenIdentifier>;

    #[storage_mapper("description")]
    fn description(&self) -> SingleValueMapper<ManagedBuffer>;

    #[storage_mapper("startTime")]
    fn start_time(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("endTime")]
    fn end_time(&self) -> SingleValueMapper<u64>;

    // ── Outcome ──

    #[storage_mapper("ended")]
    fn ended(&self) -> SingleValueMapper<bool>;

    #[storage_mapper("winningProposal")]
    fn winning_proposal_id(&self) -> SingleValueMapper<u64>;
}
