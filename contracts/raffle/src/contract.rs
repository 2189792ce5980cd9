use auto_raffle_common::MAX_REQUEST_CONFIRMATIONS;
use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute::{
    self, PAYOUT_REPLY_ID, REQUEST_RANDOMNESS_REPLY_ID, RETRY_PAYOUT_REPLY_ID,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{RaffleConfig, RaffleState, RoundState, CONFIG, PLAYERS, ROUND};

const CONTRACT_NAME: &str = "crates.io:auto-raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.entrance_fee.amount.is_zero() || msg.entrance_fee.denom.is_empty() {
        return Err(ContractError::InvalidEntranceFee);
    }
    if msg.interval_seconds == 0 {
        return Err(ContractError::InvalidInterval);
    }
    if msg.num_words == 0 {
        return Err(ContractError::InvalidNumWords);
    }
    // Either would make every draw fail at the coordinator, leaving the
    // round stuck in Calculating
    if msg.callback_gas_limit == 0 {
        return Err(ContractError::InvalidCallbackGasLimit);
    }
    if msg.request_confirmations == 0 || msg.request_confirmations > MAX_REQUEST_CONFIRMATIONS {
        return Err(ContractError::InvalidRequestConfirmations {
            got: msg.request_confirmations,
            max: MAX_REQUEST_CONFIRMATIONS,
        });
    }

    let config = RaffleConfig {
        entrance_fee: msg.entrance_fee,
        interval_seconds: msg.interval_seconds,
        vrf_coordinator: deps.api.addr_validate(&msg.vrf_coordinator)?,
        subscription_id: msg.subscription_id,
        callback_gas_limit: msg.callback_gas_limit,
        request_confirmations: msg.request_confirmations,
        num_words: msg.num_words,
    };
    CONFIG.save(deps.storage, &config)?;

    let round = RoundState {
        state: RaffleState::Open,
        pool: Uint128::zero(),
        last_timestamp: env.block.time,
        recent_winner: None,
    };
    ROUND.save(deps.storage, &round)?;
    PLAYERS.save(deps.storage, &vec![])?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "raffle")
        .add_attribute("entrance_fee", config.entrance_fee.to_string())
        .add_attribute("interval_seconds", config.interval_seconds.to_string())
        .add_attribute("vrf_coordinator", config.vrf_coordinator.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::EnterRaffle {} => execute::enter_raffle(deps, env, info),
        ExecuteMsg::PerformUpkeep {} => execute::perform_upkeep(deps, env, info),
        ExecuteMsg::RawFulfillRandomWords {
            request_id,
            random_words,
        } => execute::fulfill_random_words(deps, env, info, request_id, random_words),
        ExecuteMsg::RetryPayout { winner } => execute::retry_payout(deps, env, info, winner),
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        REQUEST_RANDOMNESS_REPLY_ID => execute::handle_randomness_requested(deps, env, msg),
        PAYOUT_REPLY_ID => execute::handle_payout_failed(deps, env, msg),
        RETRY_PAYOUT_REPLY_ID => execute::handle_retry_failed(msg),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::CheckUpkeep {} => query::query_check_upkeep(deps, env),
        QueryMsg::EntranceFee {} => query::query_entrance_fee(deps),
        QueryMsg::Interval {} => query::query_interval(deps),
        QueryMsg::RaffleState {} => query::query_raffle_state(deps),
        QueryMsg::Player { index } => query::query_player(deps, index),
        QueryMsg::NumberOfPlayers {} => query::query_number_of_players(deps),
        QueryMsg::RecentWinner {} => query::query_recent_winner(deps),
        QueryMsg::LastTimestamp {} => query::query_last_timestamp(deps),
        QueryMsg::PendingRequest {} => query::query_pending_request(deps),
        QueryMsg::PoolBalance {} => query::query_pool_balance(deps),
        QueryMsg::PendingPayout { winner } => query::query_pending_payout(deps, winner),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
