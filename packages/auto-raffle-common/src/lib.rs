pub mod vrf;

pub use vrf::{
    parse_request_id, ConsumerExecuteMsg, CoordinatorExecuteMsg, RequestRandomWordsResponse,
    MAX_REQUEST_CONFIRMATIONS, RANDOM_WORDS_REQUESTED_EVENT,
};
