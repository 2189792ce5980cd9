use auto_raffle_common::{parse_request_id, CoordinatorExecuteMsg};
use cosmwasm_std::{
    from_json, to_json_binary, BankMsg, Coin, DepsMut, Env, Event, MessageInfo, Reply, Response,
    StdError, SubMsg, SubMsgResult, Uint128, Uint256, WasmMsg,
};

use crate::error::ContractError;
use crate::query::check_upkeep;
use crate::state::{PendingPayout, RaffleState, CONFIG, PENDING_PAYOUTS, PLAYERS, ROUND};

pub const REQUEST_RANDOMNESS_REPLY_ID: u64 = 1;
pub const PAYOUT_REPLY_ID: u64 = 2;
pub const RETRY_PAYOUT_REPLY_ID: u64 = 3;

/// Index of the winner among `num_players` entrants: `word mod num_players`.
///
/// The modulo bias over a 256-bit word is negligible for any realistic
/// player count and is kept so that winners are reproducible from the word.
pub fn winner_index(word: Uint256, num_players: usize) -> Option<usize> {
    if num_players == 0 {
        return None;
    }
    let index = word.checked_rem(Uint256::from(num_players as u64)).ok()?;
    // index < num_players, so it fits in the low 8 bytes
    let bytes = index.to_be_bytes();
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[24..]);
    usize::try_from(u64::from_be_bytes(low)).ok()
}

/// Join the current round.
pub fn enter_raffle(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let fee = &config.entrance_fee;

    let paid = info
        .funds
        .iter()
        .find(|c| c.denom == fee.denom)
        .map(|c| c.amount)
        .unwrap_or(Uint128::zero());
    if paid < fee.amount {
        return Err(ContractError::InsufficientPayment {
            required: fee.to_string(),
            sent: Coin::new(paid, fee.denom.clone()).to_string(),
        });
    }
    if let Some(other) = info.funds.iter().find(|c| c.denom != fee.denom) {
        return Err(ContractError::UnexpectedDenom {
            denom: other.denom.clone(),
        });
    }

    let mut round = ROUND.load(deps.storage)?;
    if !round.state.is_open() {
        return Err(ContractError::RaffleNotOpen);
    }

    let mut players = PLAYERS.load(deps.storage)?;
    players.push(info.sender.clone());
    PLAYERS.save(deps.storage, &players)?;

    // Overpayment stays in the pool
    round.pool += paid;
    ROUND.save(deps.storage, &round)?;

    Ok(Response::new()
        .add_attribute("action", "enter_raffle")
        .add_attribute("player", info.sender.to_string())
        .add_event(
            Event::new("raffle_enter")
                .add_attribute("player", info.sender.to_string())
                .add_attribute("amount", paid.to_string())
                .add_attribute("num_players", players.len().to_string())
                .add_attribute("pool", round.pool.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Phase 1: close the round and ask the coordinator for randomness.
///
/// The upkeep predicate is evaluated again here, so a stale or racing
/// trigger is rejected. The state moves to `Calculating` in the reply to the
/// request sub-message, once the coordinator has assigned a request id.
/// Both run in the same transaction.
pub fn perform_upkeep(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let round = ROUND.load(deps.storage)?;
    let players = PLAYERS.load(deps.storage)?;

    let upkeep = check_upkeep(&config, &round, players.len(), env.block.time);
    if !upkeep.upkeep_needed {
        return Err(ContractError::UpkeepNotNeeded {
            balance: round.pool,
            num_players: players.len() as u64,
            state: round.state.to_string(),
        });
    }

    let request = SubMsg::reply_on_success(
        WasmMsg::Execute {
            contract_addr: config.vrf_coordinator.to_string(),
            msg: to_json_binary(&CoordinatorExecuteMsg::RequestRandomWords {
                subscription_id: config.subscription_id,
                request_confirmations: config.request_confirmations,
                callback_gas_limit: config.callback_gas_limit,
                num_words: config.num_words,
            })?,
            funds: vec![],
        },
        REQUEST_RANDOMNESS_REPLY_ID,
    );

    Ok(Response::new()
        .add_submessage(request)
        .add_attribute("action", "perform_upkeep")
        .add_attribute("num_players", players.len().to_string())
        .add_attribute("pool", round.pool.to_string()))
}

/// Record the request id the coordinator assigned and enter `Calculating`.
pub fn handle_randomness_requested(
    deps: DepsMut,
    env: Env,
    reply: Reply,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let response = reply.result.into_result().map_err(StdError::generic_err)?;
    let request_id = parse_request_id(&response.events, config.vrf_coordinator.as_str())
        .ok_or(ContractError::MissingRequestId)?;

    let mut round = ROUND.load(deps.storage)?;
    if let Some(pending) = round.state.pending_request() {
        return Err(ContractError::RequestAlreadyPending {
            request_id: pending,
        });
    }
    let players = PLAYERS.load(deps.storage)?;
    if players.is_empty() {
        return Err(ContractError::EmptyRound);
    }

    round.state = RaffleState::Calculating { request_id };
    ROUND.save(deps.storage, &round)?;

    Ok(Response::new()
        .add_attribute("action", "request_randomness")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("raffle_requested_winner")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("num_players", players.len().to_string())
                .add_attribute("pool", round.pool.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Phase 2: settle the round with the delivered randomness. Coordinator only.
///
/// All round bookkeeping is written before the prize transfer is dispatched.
/// The transfer replies on error, so a refused payout is recorded for retry
/// instead of unwinding the settlement.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.vrf_coordinator {
        return Err(ContractError::Unauthorized {
            reason: "only the VRF coordinator can fulfill".to_string(),
        });
    }

    let mut round = ROUND.load(deps.storage)?;
    if round.state.pending_request() != Some(request_id) {
        return Err(ContractError::UnknownRequest { request_id });
    }
    let word = *random_words.first().ok_or(ContractError::NoRandomWords)?;

    let players = PLAYERS.load(deps.storage)?;
    let index = winner_index(word, players.len()).ok_or(ContractError::EmptyRound)?;
    let winner = players[index].clone();
    let prize = Coin {
        denom: config.entrance_fee.denom.clone(),
        amount: round.pool,
    };

    round.state = RaffleState::Open;
    round.recent_winner = Some(winner.clone());
    round.last_timestamp = env.block.time;
    round.pool = Uint128::zero();
    ROUND.save(deps.storage, &round)?;
    PLAYERS.save(deps.storage, &vec![])?;

    let mut response = Response::new()
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_event(
            Event::new("raffle_winner_picked")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("winner", winner.to_string())
                .add_attribute("winner_index", index.to_string())
                .add_attribute("num_players", players.len().to_string())
                .add_attribute("prize", prize.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        );

    if !prize.amount.is_zero() {
        let payout = PendingPayout {
            winner: winner.clone(),
            amount: prize.clone(),
        };
        let send = SubMsg::reply_on_error(
            BankMsg::Send {
                to_address: winner.to_string(),
                amount: vec![prize],
            },
            PAYOUT_REPLY_ID,
        )
        .with_payload(to_json_binary(&payout)?);
        response = response.add_submessage(send);
    }

    Ok(response)
}

/// The prize transfer of a settlement failed. Keep the settlement and record
/// what is owed so `RetryPayout` can send it later.
pub fn handle_payout_failed(
    deps: DepsMut,
    env: Env,
    reply: Reply,
) -> Result<Response, ContractError> {
    let SubMsgResult::Err(reason) = reply.result else {
        return Ok(Response::new());
    };
    let payout: PendingPayout = from_json(&reply.payload)?;

    let owed = PENDING_PAYOUTS
        .may_load(deps.storage, &payout.winner)?
        .unwrap_or(Uint128::zero());
    let owed = owed + payout.amount.amount;
    PENDING_PAYOUTS.save(deps.storage, &payout.winner, &owed)?;

    let failure = ContractError::PayoutFailed {
        winner: payout.winner.to_string(),
        reason,
    };

    Ok(Response::new()
        .add_attribute("action", "payout_failed")
        .add_attribute("winner", payout.winner.to_string())
        .add_event(
            Event::new("raffle_payout_failed")
                .add_attribute("winner", payout.winner.to_string())
                .add_attribute("amount", payout.amount.to_string())
                .add_attribute("total_owed", owed.to_string())
                .add_attribute("reason", failure.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Re-send a prize recorded by a failed payout. Anyone can call.
pub fn retry_payout(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    winner: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let winner = deps.api.addr_validate(&winner)?;

    let amount = PENDING_PAYOUTS
        .may_load(deps.storage, &winner)?
        .ok_or(ContractError::NoPendingPayout {
            winner: winner.to_string(),
        })?;
    PENDING_PAYOUTS.remove(deps.storage, &winner);

    let payout = PendingPayout {
        winner: winner.clone(),
        amount: Coin {
            denom: config.entrance_fee.denom,
            amount,
        },
    };
    let send = SubMsg::reply_on_error(
        BankMsg::Send {
            to_address: winner.to_string(),
            amount: vec![payout.amount.clone()],
        },
        RETRY_PAYOUT_REPLY_ID,
    )
    .with_payload(to_json_binary(&payout)?);

    Ok(Response::new()
        .add_submessage(send)
        .add_attribute("action", "retry_payout")
        .add_attribute("winner", winner.to_string())
        .add_event(
            Event::new("raffle_payout_retried")
                .add_attribute("winner", winner.to_string())
                .add_attribute("amount", payout.amount.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// A retried transfer failed again. Failing here reverts the retry, which
/// restores the pending payout record.
pub fn handle_retry_failed(reply: Reply) -> Result<Response, ContractError> {
    let SubMsgResult::Err(reason) = reply.result else {
        return Ok(Response::new());
    };
    let payout: PendingPayout = from_json(&reply.payload)?;
    Err(ContractError::PayoutFailed {
        winner: payout.winner.to_string(),
        reason,
    })
}
