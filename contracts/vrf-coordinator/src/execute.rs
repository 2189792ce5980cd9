use auto_raffle_common::{
    ConsumerExecuteMsg, RequestRandomWordsResponse, MAX_REQUEST_CONFIRMATIONS,
    RANDOM_WORDS_REQUESTED_EVENT,
};
use cosmwasm_std::{
    to_json_binary, Addr, DepsMut, Env, Event, MessageInfo, Response, Storage, SubMsg, WasmMsg,
};

use crate::beacon::{expand_random_words, round_at, verify_beacon};
use crate::error::ContractError;
use crate::state::{
    RandomnessRequest, Subscription, CONFIG, NEXT_REQUEST_ID, NEXT_SUBSCRIPTION_ID, REQUESTS,
    SUBSCRIPTIONS,
};

pub fn create_subscription(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let subscription_id = NEXT_SUBSCRIPTION_ID.load(deps.storage)?;
    NEXT_SUBSCRIPTION_ID.save(deps.storage, &(subscription_id + 1))?;

    let subscription = Subscription {
        id: subscription_id,
        owner: info.sender.clone(),
        consumers: vec![],
        request_count: 0,
    };
    SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;

    Ok(Response::new()
        .set_data(to_json_binary(&subscription_id)?)
        .add_attribute("action", "create_subscription")
        .add_attribute("subscription_id", subscription_id.to_string())
        .add_event(
            Event::new("vrf_subscription_created")
                .add_attribute("subscription_id", subscription_id.to_string())
                .add_attribute("owner", info.sender.to_string()),
        ))
}

fn load_owned_subscription(
    storage: &dyn Storage,
    sender: &Addr,
    subscription_id: u64,
) -> Result<Subscription, ContractError> {
    let subscription = SUBSCRIPTIONS
        .may_load(storage, subscription_id)?
        .ok_or(ContractError::SubscriptionNotFound { subscription_id })?;
    if subscription.owner != *sender {
        return Err(ContractError::Unauthorized {
            reason: "only the subscription owner can manage consumers".to_string(),
        });
    }
    Ok(subscription)
}

pub fn add_consumer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    subscription_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let mut subscription = load_owned_subscription(deps.storage, &info.sender, subscription_id)?;
    let consumer = deps.api.addr_validate(&consumer)?;

    if !subscription.consumers.contains(&consumer) {
        subscription.consumers.push(consumer.clone());
        SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;
    }

    Ok(Response::new()
        .add_attribute("action", "add_consumer")
        .add_attribute("subscription_id", subscription_id.to_string())
        .add_attribute("consumer", consumer.to_string()))
}

pub fn remove_consumer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    subscription_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let mut subscription = load_owned_subscription(deps.storage, &info.sender, subscription_id)?;
    let consumer = deps.api.addr_validate(&consumer)?;

    if !subscription.consumers.contains(&consumer) {
        return Err(ContractError::ConsumerNotRegistered {
            subscription_id,
            consumer: consumer.to_string(),
        });
    }
    subscription.consumers.retain(|c| c != &consumer);
    SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;

    Ok(Response::new()
        .add_attribute("action", "remove_consumer")
        .add_attribute("subscription_id", subscription_id.to_string())
        .add_attribute("consumer", consumer.to_string()))
}

/// Accept a randomness request from a registered consumer.
///
/// The request is bound to the drand round `request_confirmations` rounds
/// after the current one, so the randomness is unknown to everybody at
/// request time and the operator has no say in which beacon is used.
pub fn request_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    subscription_id: u64,
    request_confirmations: u64,
    callback_gas_limit: u64,
    num_words: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut subscription = SUBSCRIPTIONS
        .may_load(deps.storage, subscription_id)?
        .ok_or(ContractError::SubscriptionNotFound { subscription_id })?;
    if !subscription.consumers.contains(&info.sender) {
        return Err(ContractError::InvalidConsumer {
            subscription_id,
            consumer: info.sender.to_string(),
        });
    }

    if num_words == 0 || num_words > config.max_num_words {
        return Err(ContractError::InvalidNumWords {
            got: num_words,
            max: config.max_num_words,
        });
    }
    if callback_gas_limit < config.min_callback_gas_limit {
        return Err(ContractError::GasLimitTooSmall {
            got: callback_gas_limit,
            min: config.min_callback_gas_limit,
        });
    }
    if callback_gas_limit > config.max_callback_gas_limit {
        return Err(ContractError::GasLimitTooBig {
            got: callback_gas_limit,
            max: config.max_callback_gas_limit,
        });
    }
    if request_confirmations == 0 || request_confirmations > MAX_REQUEST_CONFIRMATIONS {
        return Err(ContractError::InvalidRequestConfirmations {
            got: request_confirmations,
            max: MAX_REQUEST_CONFIRMATIONS,
        });
    }

    let current_round = round_at(
        config.genesis_time,
        config.period_seconds,
        env.block.time.seconds(),
    );
    let target_round = current_round + request_confirmations;

    let request_id = NEXT_REQUEST_ID.load(deps.storage)?;
    NEXT_REQUEST_ID.save(deps.storage, &(request_id + 1))?;

    let request = RandomnessRequest {
        request_id,
        subscription_id,
        consumer: info.sender.clone(),
        num_words,
        callback_gas_limit,
        target_round,
        requested_at: env.block.time,
    };
    REQUESTS.save(deps.storage, request_id, &request)?;

    subscription.request_count += 1;
    SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;

    Ok(Response::new()
        .set_data(to_json_binary(&RequestRandomWordsResponse { request_id })?)
        .add_attribute("action", "request_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new(RANDOM_WORDS_REQUESTED_EVENT)
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("subscription_id", subscription_id.to_string())
                .add_attribute("consumer", info.sender.to_string())
                .add_attribute("num_words", num_words.to_string())
                .add_attribute("target_round", target_round.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Fulfill a pending request. Only operators can call this.
///
/// The signature must be the drand beacon of the request's target round.
/// The request is removed before the consumer callback is dispatched; if the
/// callback fails the whole transaction reverts and the request stays pending.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can fulfill requests".to_string(),
        });
    }

    let request = REQUESTS
        .may_load(deps.storage, request_id)?
        .ok_or(ContractError::RequestNotFound { request_id })?;

    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;
    let randomness = verify_beacon(&config.drand_pubkey, request.target_round, &signature)?;
    let random_words = expand_random_words(&randomness, request_id, request.num_words);

    REQUESTS.remove(deps.storage, request_id);

    let callback = SubMsg::new(WasmMsg::Execute {
        contract_addr: request.consumer.to_string(),
        msg: to_json_binary(&ConsumerExecuteMsg::RawFulfillRandomWords {
            request_id,
            random_words,
        })?,
        funds: vec![],
    })
    .with_gas_limit(request.callback_gas_limit);

    Ok(Response::new()
        .add_submessage(callback)
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("fulfilled_by", info.sender.to_string())
        .add_event(
            Event::new("vrf_random_words_fulfilled")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("consumer", request.consumer.to_string())
                .add_attribute("drand_round", request.target_round.to_string())
                .add_attribute("randomness", hex::encode(randomness))
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.operators.retain(|a| a != &addr);
    }
    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.operators.contains(&addr) {
            config.operators.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}
