use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Timestamp, Uint256};

use crate::state::{RaffleConfig, RaffleState};

#[cw_serde]
pub struct InstantiateMsg {
    /// Exact amount and denom every entrant pays
    pub entrance_fee: Coin,
    /// Minimum seconds between the start of a round and its draw
    pub interval_seconds: u64,
    pub vrf_coordinator: String,
    pub subscription_id: u64,
    pub callback_gas_limit: u64,
    pub request_confirmations: u64,
    pub num_words: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Join the current round. Attach at least the entrance fee.
    EnterRaffle {},
    /// Close the round and request randomness. Anyone can call; only
    /// accepted while `CheckUpkeep` holds.
    PerformUpkeep {},
    /// Randomness delivery. Coordinator only.
    RawFulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
    /// Re-send a prize whose transfer failed. Anyone can call.
    RetryPayout { winner: String },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RaffleConfig)]
    Config {},
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep {},
    #[returns(Coin)]
    EntranceFee {},
    #[returns(u64)]
    Interval {},
    #[returns(RaffleState)]
    RaffleState {},
    #[returns(Addr)]
    Player { index: u64 },
    #[returns(u64)]
    NumberOfPlayers {},
    #[returns(Option<Addr>)]
    RecentWinner {},
    #[returns(Timestamp)]
    LastTimestamp {},
    #[returns(Option<u64>)]
    PendingRequest {},
    #[returns(Coin)]
    PoolBalance {},
    #[returns(Option<Coin>)]
    PendingPayout { winner: String },
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    pub is_open: bool,
    pub time_passed: bool,
    pub has_players: bool,
    pub has_balance: bool,
}
