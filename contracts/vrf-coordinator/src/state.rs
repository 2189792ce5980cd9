use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<CoordinatorConfig> = Item::new("config");
pub const NEXT_REQUEST_ID: Item<u64> = Item::new("next_request_id");
pub const NEXT_SUBSCRIPTION_ID: Item<u64> = Item::new("next_subscription_id");
pub const SUBSCRIPTIONS: Map<u64, Subscription> = Map::new("subscriptions");
/// Pending requests only. Fulfilled requests are removed.
pub const REQUESTS: Map<u64, RandomnessRequest> = Map::new("requests");

#[cw_serde]
pub struct CoordinatorConfig {
    pub admin: Addr,
    /// Accounts allowed to deliver beacons for pending requests
    pub operators: Vec<Addr>,
    /// Quicknet public key, 96 bytes (G2 point)
    pub drand_pubkey: Vec<u8>,
    /// Chain hash identifying the drand network. Informational only,
    /// verification uses `drand_pubkey`.
    pub chain_hash: String,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    /// Period between rounds in seconds (3 for quicknet)
    pub period_seconds: u64,
    pub max_num_words: u32,
    /// Smallest callback budget accepted. A callback that runs out of gas
    /// reverts every fulfillment, so the request could never complete.
    pub min_callback_gas_limit: u64,
    pub max_callback_gas_limit: u64,
}

#[cw_serde]
pub struct Subscription {
    pub id: u64,
    pub owner: Addr,
    /// Contracts allowed to request randomness against this subscription
    pub consumers: Vec<Addr>,
    /// Requests made against this subscription so far. Informational only.
    pub request_count: u64,
}

#[cw_serde]
pub struct RandomnessRequest {
    pub request_id: u64,
    pub subscription_id: u64,
    pub consumer: Addr,
    pub num_words: u32,
    pub callback_gas_limit: u64,
    /// The drand round whose signature fulfills this request
    pub target_round: u64,
    pub requested_at: Timestamp,
}
