multiversx_sc::imports!();

/// Custody of the governance tokens attached to votes.
///
/// `total_escrowed` always equals the thread's balance of the governance
/// token: it is credited only after the payment has landed and debited
/// before any token leaves. A voter is bound to the first proposal they
/// back, and can be released at most once.
#[multiversx_sc::module]
pub trait EscrowModule {
    fn lock_stake(&self, voter: &ManagedAddress, proposal_id: u64, amount: &BigUint) {
        require!(*amount > 0u64, "Must vote with at least 1 token");

        let choice = self.voter_choice(voter);
        if choice.is_empty() {
            choice.set(proposal_id);
        } else {
            require!(
                choice.get() == proposal_id,
                "Already voted for another proposal"
            );
        }

        self.locked_amount(voter).update(|locked| *locked += amount);
        self.total_escrowed().update(|total| *total += amount);
    }

    fn release_stake(&self, voter: &ManagedAddress, token_id: &TokenIdentifier) -> BigUint {
        require!(
            !self.withdrawn(voter).get(),
            "Tokens have already been withdrawn"
        );

        // All bookkeeping settles before the transfer goes out.
        self.withdrawn(voter).set(true);
        let amount = self.locked_amount(voter).take();
        self.total_escrowed().update(|total| *total -= &amount);

        if amount > 0u64 {
            self.send().direct_esdt(voter, token_id, 0, &amount);
        }

        amount
    }

    fn is_committed_to(&self, voter: &ManagedAddress, proposal_id: u64) -> bool {
        let choice = self.voter_choice(voter);
        !choice.is_empty() && choice.get() == proposal_id
    }

    // ── Storage ──

    #[storage_mapper("voterChoice")]
    fn voter_choice(&self, voter: &ManagedAddress) -> SingleValueMapper<u64>;

    #[storage_mapper("lockedAmount")]
    fn locked_amount(&self, voter: &ManagedAddress) -> SingleValueMapper<BigUint>;

    #[storage_mapper("withdrawn")]
    fn withdrawn(&self, voter: &ManagedAddress) -> SingleValueMapper<bool>;

    #[storage_mapper("totalEscrowed")]
    fn total_escrowed(&self) -> SingleValueMapper<BigUint>;
}
