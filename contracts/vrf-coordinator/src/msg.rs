use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{CoordinatorConfig, RandomnessRequest, Subscription};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub chain_hash: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
    pub max_num_words: u32,
    pub min_callback_gas_limit: u64,
    pub max_callback_gas_limit: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Open a subscription owned by the sender.
    CreateSubscription {},
    /// Register a consumer contract. Subscription owner only.
    AddConsumer {
        subscription_id: u64,
        consumer: String,
    },
    /// Deregister a consumer contract. Subscription owner only.
    RemoveConsumer {
        subscription_id: u64,
        consumer: String,
    },
    /// Request random words. Called by a registered consumer.
    RequestRandomWords {
        subscription_id: u64,
        request_confirmations: u64,
        callback_gas_limit: u64,
        num_words: u32,
    },
    /// Fulfill a pending request with the beacon of its target round.
    /// Operators only.
    FulfillRandomWords {
        request_id: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(CoordinatorConfig)]
    Config {},

    #[returns(Subscription)]
    Subscription { subscription_id: u64 },

    #[returns(Option<RandomnessRequest>)]
    Request { request_id: u64 },

    /// The drand round published at `time` (unix seconds).
    #[returns(u64)]
    RoundAt { time: u64 },
}
