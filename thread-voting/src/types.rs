multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Thread State: computed from block time and the ended flag
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ThreadState {
    /// Voting window has not opened yet.
    Pending,
    /// Inside [start_time, end_time) and not finalized. Votes accepted.
    Open,
    /// Window elapsed, winner not computed yet.
    Closed,
    /// finishVotingPeriod ran. Terminal state.
    Finalized,
}

// ============================================================
// Proposal: one option of the thread
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    pub proposer: ManagedAddress<M>,
    pub description: ManagedBuffer<M>,
    /// Sum of every ballot cast on this proposal; never decreases
    pub total_votes: BigUint<M>,
    pub created_at: u64,
}
