use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("entrance fee must be a non-zero amount")]
    InvalidEntranceFee,

    #[error("round interval must be greater than zero")]
    InvalidInterval,

    #[error("at least one random word must be requested")]
    InvalidNumWords,

    #[error("callback gas limit must be greater than zero")]
    InvalidCallbackGasLimit,

    #[error("request_confirmations must be between 1 and {max}, got {got}")]
    InvalidRequestConfirmations { got: u64, max: u64 },

    #[error("insufficient payment: entrance fee is {required}, sent {sent}")]
    InsufficientPayment { required: String, sent: String },

    #[error("unexpected denom {denom}: only the entrance fee denom is accepted")]
    UnexpectedDenom { denom: String },

    #[error("raffle is not open")]
    RaffleNotOpen,

    #[error("upkeep not needed (balance: {balance}, players: {num_players}, state: {state})")]
    UpkeepNotNeeded {
        balance: Uint128,
        num_players: u64,
        state: String,
    },

    #[error("unknown randomness request {request_id}")]
    UnknownRequest { request_id: u64 },

    #[error("randomness callback carried no words")]
    NoRandomWords,

    #[error("no player at index {index} (players: {len})")]
    IndexOutOfRange { index: u64, len: u64 },

    #[error("payout to {winner} failed: {reason}")]
    PayoutFailed { winner: String, reason: String },

    #[error("no pending payout for {winner}")]
    NoPendingPayout { winner: String },

    #[error("randomness request {request_id} is already outstanding")]
    RequestAlreadyPending { request_id: u64 },

    #[error("cannot settle a round without players")]
    EmptyRound,

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },

    #[error("coordinator response carried no request id")]
    MissingRequestId,
}
