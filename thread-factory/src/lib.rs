#![no_std]

multiversx_sc::imports!();

pub mod thread_factory_proxy;
pub mod thread_voting_proxy;

// ============================================================
// Contract
// ============================================================

/// Deploys thread voting contracts from an already deployed
/// implementation and keeps the lookup tables indexers rely on.
///
/// A thread is keyed by (implementation, governance token): one governance
/// process per token and implementation, whatever its description or
/// voting window.
#[multiversx_sc::contract]
pub trait ThreadFactory {
    #[init]
    fn init(&self) {}

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // ENDPOINT: createThread
    // ========================================================

    #[endpoint(createThread)]
    fn create_thread(
        &self,
        implementation: ManagedAddress,
        governance_token: TokenIdentifier,
        description: ManagedBuffer,
        start_time: u64,
        end_time: u64,
    ) -> ManagedAddress {
        require!(
            self.blockchain().is_smart_contract(&implementation),
            "Implementation is not a contract"
        );
        require!(
            self.deployed_thread(&implementation, &governance_token)
                .is_empty(),
            "Thread is deployed already."
        );

        let thread_address = self
            .tx()
            .typed(thread_voting_proxy::ThreadVotingProxy)
            .init(governance_token.clone(), description, start_time, end_time)
            .from_source(implementation.clone())
            .code_metadata(CodeMetadata::UPGRADEABLE | CodeMetadata::READABLE)
            .returns(ReturnsNewManagedAddress)
            .sync_call();

        self.deployed_thread(&implementation, &governance_token)
            .set(&thread_address);
        self.thread_key(&thread_address)
            .set((implementation.clone(), governance_token.clone()));
        self.threads().push(&thread_address);

        self.thread_voting_created_event(&thread_address, &implementation, &governance_token);

        thread_address
    }

    // ========================================================
    // VIEWS: read-only queries
    // ========================================================

    #[view(getThread)]
    fn get_thread(
        &self,
        implementation: ManagedAddress,
        governance_token: TokenIdentifier,
    ) -> OptionalValue<ManagedAddress> {
        let mapper = self.deployed_thread(&implementation, &governance_token);
        if mapper.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(mapper.get())
        }
    }

    /// Winning proposal id of the thread behind a key, read from the
    /// thread itself. 0 until it is finished or if nothing won.
    ///
    /// Plain sync call: `winningProposal` writes nothing and query state is
    /// discarded anyway.
    #[view(getThreadWinner)]
    fn get_thread_winner(
        &self,
        implementation: ManagedAddress,
        governance_token: TokenIdentifier,
    ) -> u64 {
        let mapper = self.deployed_thread(&implementation, &governance_token);
        require!(!mapper.is_empty(), "Thread not found");

        let thread_address = mapper.get();
        self.tx()
            .to(&thread_address)
            .typed(thread_voting_proxy::ThreadVotingProxy)
            .winning_proposal()
            .returns(ReturnsResult)
            .sync_call()
    }

    #[view(getThreadKey)]
    fn get_thread_key(
        &self,
        thread_address: ManagedAddress,
    ) -> MultiValue2<ManagedAddress, TokenIdentifier> {
        let mapper = self.thread_key(&thread_address);
        require!(!mapper.is_empty(), "Thread not found");
        mapper.get().into()
    }

    #[view(getThreads)]
    fn get_threads(&self) -> MultiValueEncoded<ManagedAddress> {
        let mut result = MultiValueEncoded::new();
        for thread_address in self.threads().iter() {
            result.push(thread_address);
        }
        result
    }

    #[view(getThreadCount)]
    fn get_thread_count(&self) -> u64 {
        self.threads().len() as u64
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("threadVotingCreated")]
    fn thread_voting_created_event(
        &self,
        #[indexed] thread_address: &ManagedAddress,
        #[indexed] implementation: &ManagedAddress,
        #[indexed] governance_token: &TokenIdentifier,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("deployedThread")]
    fn deployed_thread(
        &self,
        implementation: &ManagedAddress,
        governance_token: &TokenIdentifier,
    ) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("threadKey")]
    fn thread_key(
        &self,
        thread_address: &ManagedAddress,
    ) -> SingleValueMapper<(ManagedAddress, TokenIdentifier)>;

    #[storage_mapper("threads")]
    fn threads(&self) -> VecMapper<ManagedAddress>;
}
