multiversx_sc::imports!();

use crate::types::Proposal;

/// Append-only, 1-indexed proposal registry. Id 0 is never assigned and
/// stands for "no winner".
#[multiversx_sc::module]
pub trait ProposalBookModule {
    fn create_proposal_record(
        &self,
        proposer: &ManagedAddress,
        description: &ManagedBuffer,
    ) -> u64 {
        let proposal_id = self.proposal_count().get() + 1u64;

        let proposal = Proposal {
            id: proposal_id,
            proposer: proposer.clone(),
            description: description.clone(),
            total_votes: BigUint::zero(),
            created_at: self.blockchain().get_block_timestamp(),
        };

        self.proposals(proposal_id).set(&proposal);
        self.proposal_count().set(proposal_id);

        proposal_id
    }

    fn require_proposal_exists(&self, proposal_id: u64) {
        require!(
            proposal_id >= 1 && proposal_id <= self.proposal_count().get(),
            "Proposal does not exist"
        );
    }

    fn add_votes(&self, proposal_id: u64, voter: &ManagedAddress, amount: &BigUint) {
        self.require_proposal_exists(proposal_id);

        self.proposals(proposal_id)
            .update(|proposal| proposal.total_votes += amount);
        self.user_votes(proposal_id, voter)
            .update(|weight| *weight += amount);
    }

    /// First proposal with the strictly greatest total wins; later equal
    /// totals do not displace it. Returns 0 when nothing received a vote.
    fn leading_proposal(&self) -> u64 {
        let count = self.proposal_count().get();
        let mut winner = 0u64;
        let mut winning_votes = BigUint::zero();

        for proposal_id in 1..=count {
            let total_votes = self.proposals(proposal_id).get().total_votes;
            if total_votes > winning_votes {
                winning_votes = total_votes;
                winner = proposal_id;
            }
        }

        winner
    }

    // ── Storage ──

    #[storage_mapper("proposalCount")]
    fn proposal_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, id: u64) -> SingleValueMapper<Proposal<Self::Api>>;

    #[storage_mapper("userVotes")]
    fn user_votes(&self, proposal_id: u64, voter: &ManagedAddress) -> SingleValueMapper<BigUint>;
}
