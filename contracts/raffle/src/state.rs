use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<RaffleConfig> = Item::new("config");
pub const ROUND: Item<RoundState> = Item::new("round");
/// Entrants of the current round, in entry order
pub const PLAYERS: Item<Vec<Addr>> = Item::new("players");
/// Prize amounts (in the entrance fee denom) whose transfer to the winner failed
pub const PENDING_PAYOUTS: Map<&Addr, Uint128> = Map::new("pending_payouts");

/// Fixed at instantiation. There is no entry point that changes it.
#[cw_serde]
pub struct RaffleConfig {
    pub entrance_fee: Coin,
    pub interval_seconds: u64,
    pub vrf_coordinator: Addr,
    pub subscription_id: u64,
    pub callback_gas_limit: u64,
    /// drand rounds the coordinator waits before the request can be fulfilled
    pub request_confirmations: u64,
    pub num_words: u32,
}

#[cw_serde]
pub enum RaffleState {
    Open,
    /// Waiting for the coordinator to deliver `request_id`
    Calculating { request_id: u64 },
}

impl RaffleState {
    pub fn is_open(&self) -> bool {
        matches!(self, RaffleState::Open)
    }

    pub fn pending_request(&self) -> Option<u64> {
        match self {
            RaffleState::Open => None,
            RaffleState::Calculating { request_id } => Some(*request_id),
        }
    }
}

impl fmt::Display for RaffleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleState::Open => write!(f, "open"),
            RaffleState::Calculating { .. } => write!(f, "calculating"),
        }
    }
}

#[cw_serde]
pub struct RoundState {
    pub state: RaffleState,
    /// Sum of entrance payments collected since the last settlement
    pub pool: Uint128,
    pub last_timestamp: Timestamp,
    pub recent_winner: Option<Addr>,
}

/// A prize transfer in flight, carried as the payout reply payload.
#[cw_serde]
pub struct PendingPayout {
    pub winner: Addr,
    pub amount: Coin,
}
