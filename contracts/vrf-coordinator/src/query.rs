use cosmwasm_std::{to_json_binary, Binary, Deps};

use crate::beacon::round_at;
use crate::error::ContractError;
use crate::state::{CONFIG, REQUESTS, SUBSCRIPTIONS};

pub fn query_config(deps: Deps) -> Result<Binary, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(to_json_binary(&config)?)
}

pub fn query_subscription(deps: Deps, subscription_id: u64) -> Result<Binary, ContractError> {
    let subscription = SUBSCRIPTIONS
        .may_load(deps.storage, subscription_id)?
        .ok_or(ContractError::SubscriptionNotFound { subscription_id })?;
    Ok(to_json_binary(&subscription)?)
}

pub fn query_request(deps: Deps, request_id: u64) -> Result<Binary, ContractError> {
    let request = REQUESTS.may_load(deps.storage, request_id)?;
    Ok(to_json_binary(&request)?)
}

pub fn query_round_at(deps: Deps, time: u64) -> Result<Binary, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(to_json_binary(&round_at(
        config.genesis_time,
        config.period_seconds,
        time,
    ))?)
}
