use cosmwasm_std::{to_json_binary, Binary, Coin, Deps, Env, Timestamp};

use crate::error::ContractError;
use crate::msg::CheckUpkeepResponse;
use crate::state::{RaffleConfig, RoundState, CONFIG, PENDING_PAYOUTS, PLAYERS, ROUND};

/// The upkeep predicate. Every condition is required.
pub fn check_upkeep(
    config: &RaffleConfig,
    round: &RoundState,
    num_players: usize,
    now: Timestamp,
) -> CheckUpkeepResponse {
    let is_open = round.state.is_open();
    let elapsed = now.seconds().saturating_sub(round.last_timestamp.seconds());
    let time_passed = elapsed >= config.interval_seconds;
    let has_players = num_players > 0;
    let has_balance = !round.pool.is_zero();

    CheckUpkeepResponse {
        upkeep_needed: is_open && time_passed && has_players && has_balance,
        is_open,
        time_passed,
        has_players,
        has_balance,
    }
}

pub fn query_config(deps: Deps) -> Result<Binary, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(to_json_binary(&config)?)
}

pub fn query_check_upkeep(deps: Deps, env: Env) -> Result<Binary, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let round = ROUND.load(deps.storage)?;
    let players = PLAYERS.load(deps.storage)?;
    Ok(to_json_binary(&check_upkeep(
        &config,
        &round,
        players.len(),
        env.block.time,
    ))?)
}

pub fn query_entrance_fee(deps: Deps) -> Result<Binary, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(to_json_binary(&config.entrance_fee)?)
}

pub fn query_interval(deps: Deps) -> Result<Binary, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(to_json_binary(&config.interval_seconds)?)
}

pub fn query_raffle_state(deps: Deps) -> Result<Binary, ContractError> {
    let round = ROUND.load(deps.storage)?;
    Ok(to_json_binary(&round.state)?)
}

pub fn query_player(deps: Deps, index: u64) -> Result<Binary, ContractError> {
    let players = PLAYERS.load(deps.storage)?;
    let player = usize::try_from(index)
        .ok()
        .and_then(|i| players.get(i))
        .ok_or(ContractError::IndexOutOfRange {
            index,
            len: players.len() as u64,
        })?;
    Ok(to_json_binary(player)?)
}

pub fn query_number_of_players(deps: Deps) -> Result<Binary, ContractError> {
    let players = PLAYERS.load(deps.storage)?;
    Ok(to_json_binary(&(players.len() as u64))?)
}

pub fn query_recent_winner(deps: Deps) -> Result<Binary, ContractError> {
    let round = ROUND.load(deps.storage)?;
    Ok(to_json_binary(&round.recent_winner)?)
}

pub fn query_last_timestamp(deps: Deps) -> Result<Binary, ContractError> {
    let round = ROUND.load(deps.storage)?;
    Ok(to_json_binary(&round.last_timestamp)?)
}

pub fn query_pending_request(deps: Deps) -> Result<Binary, ContractError> {
    let round = ROUND.load(deps.storage)?;
    Ok(to_json_binary(&round.state.pending_request())?)
}

pub fn query_pool_balance(deps: Deps) -> Result<Binary, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let round = ROUND.load(deps.storage)?;
    Ok(to_json_binary(&Coin {
        denom: config.entrance_fee.denom,
        amount: round.pool,
    })?)
}

pub fn query_pending_payout(deps: Deps, winner: String) -> Result<Binary, ContractError> {
    let winner = deps.api.addr_validate(&winner)?;
    let config = CONFIG.load(deps.storage)?;
    let owed = PENDING_PAYOUTS
        .may_load(deps.storage, &winner)?
        .map(|amount| Coin {
            denom: config.entrance_fee.denom,
            amount,
        });
    Ok(to_json_binary(&owed)?)
}
