use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Event, Uint256};

/// Event type emitted by the coordinator when it accepts a request.
/// On chain the type is reported with a `wasm-` prefix.
pub const RANDOM_WORDS_REQUESTED_EVENT: &str = "vrf_random_words_requested";

/// Upper bound on the drand rounds a request may wait for.
pub const MAX_REQUEST_CONFIRMATIONS: u64 = 200;

/// The part of the coordinator's execute interface a consumer calls.
/// Mirrors `ExecuteMsg::RequestRandomWords` of the coordinator contract.
#[cw_serde]
pub enum CoordinatorExecuteMsg {
    RequestRandomWords {
        subscription_id: u64,
        /// Number of drand rounds to wait before the request can be fulfilled
        request_confirmations: u64,
        /// Gas budget for the consumer callback
        callback_gas_limit: u64,
        num_words: u32,
    },
}

/// Data returned by the coordinator for an accepted request.
#[cw_serde]
pub struct RequestRandomWordsResponse {
    pub request_id: u64,
}

/// The callback every consumer contract must accept from the coordinator.
#[cw_serde]
pub enum ConsumerExecuteMsg {
    RawFulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}

/// Extract the request id from the events of a `RequestRandomWords` execution.
///
/// Only events emitted by `coordinator` (their `_contract_address` attribute)
/// are considered. Accepts both the bare event type and the `wasm-` prefixed
/// form the chain reports to sub-message replies.
pub fn parse_request_id(events: &[Event], coordinator: &str) -> Option<u64> {
    events
        .iter()
        .filter(|e| e.ty.trim_start_matches("wasm-") == RANDOM_WORDS_REQUESTED_EVENT)
        .filter(|e| {
            e.attributes
                .iter()
                .any(|a| a.key == "_contract_address" && a.value == coordinator)
        })
        .flat_map(|e| e.attributes.iter())
        .find(|a| a.key == "request_id")
        .and_then(|a| a.value.parse().ok())
}
