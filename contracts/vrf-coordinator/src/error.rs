use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("drand period must be greater than zero")]
    InvalidPeriod,

    #[error("BLS verification failed for round {round}: {reason}")]
    VerificationFailed { round: u64, reason: String },

    #[error("subscription {subscription_id} not found")]
    SubscriptionNotFound { subscription_id: u64 },

    #[error("{consumer} is not a consumer of subscription {subscription_id}")]
    InvalidConsumer {
        subscription_id: u64,
        consumer: String,
    },

    #[error("{consumer} is not registered on subscription {subscription_id}")]
    ConsumerNotRegistered {
        subscription_id: u64,
        consumer: String,
    },

    #[error("num_words must be between 1 and {max}, got {got}")]
    InvalidNumWords { got: u32, max: u32 },

    #[error("callback gas limits must satisfy 0 < min <= max, got min {min} and max {max}")]
    InvalidCallbackGasLimits { min: u64, max: u64 },

    #[error("callback gas limit {got} is below minimum {min}")]
    GasLimitTooSmall { got: u64, min: u64 },

    #[error("callback gas limit {got} exceeds maximum {max}")]
    GasLimitTooBig { got: u64, max: u64 },

    #[error("request_confirmations must be between 1 and {max}, got {got}")]
    InvalidRequestConfirmations { got: u64, max: u64 },

    #[error("nonexistent request {request_id}")]
    RequestNotFound { request_id: u64 },
}
