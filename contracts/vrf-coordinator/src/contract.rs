use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{CoordinatorConfig, CONFIG, NEXT_REQUEST_ID, NEXT_SUBSCRIPTION_ID};

const CONTRACT_NAME: &str = "crates.io:auto-raffle-vrf-coordinator";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let drand_pubkey = hex::decode(&msg.quicknet_pubkey_hex).map_err(|_| {
        ContractError::InvalidHex {
            field: "quicknet_pubkey_hex".to_string(),
        }
    })?;
    if drand_pubkey.len() != 96 {
        return Err(ContractError::InvalidPubkeyLength {
            got: drand_pubkey.len(),
        });
    }
    if msg.period_seconds == 0 {
        return Err(ContractError::InvalidPeriod);
    }
    if msg.min_callback_gas_limit == 0
        || msg.min_callback_gas_limit > msg.max_callback_gas_limit
    {
        return Err(ContractError::InvalidCallbackGasLimits {
            min: msg.min_callback_gas_limit,
            max: msg.max_callback_gas_limit,
        });
    }

    let mut operators = Vec::new();
    for op in &msg.operators {
        operators.push(deps.api.addr_validate(op)?);
    }

    let config = CoordinatorConfig {
        admin: info.sender.clone(),
        operators,
        drand_pubkey,
        chain_hash: msg.chain_hash,
        genesis_time: msg.genesis_time,
        period_seconds: msg.period_seconds,
        max_num_words: msg.max_num_words,
        min_callback_gas_limit: msg.min_callback_gas_limit,
        max_callback_gas_limit: msg.max_callback_gas_limit,
    };
    CONFIG.save(deps.storage, &config)?;

    // Ids start at 1 so that 0 never names a real request
    NEXT_REQUEST_ID.save(deps.storage, &1u64)?;
    NEXT_SUBSCRIPTION_ID.save(deps.storage, &1u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "vrf-coordinator")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateSubscription {} => execute::create_subscription(deps, env, info),
        ExecuteMsg::AddConsumer {
            subscription_id,
            consumer,
        } => execute::add_consumer(deps, env, info, subscription_id, consumer),
        ExecuteMsg::RemoveConsumer {
            subscription_id,
            consumer,
        } => execute::remove_consumer(deps, env, info, subscription_id, consumer),
        ExecuteMsg::RequestRandomWords {
            subscription_id,
            request_confirmations,
            callback_gas_limit,
            num_words,
        } => execute::request_random_words(
            deps,
            env,
            info,
            subscription_id,
            request_confirmations,
            callback_gas_limit,
            num_words,
        ),
        ExecuteMsg::FulfillRandomWords {
            request_id,
            signature_hex,
        } => execute::fulfill_random_words(deps, env, info, request_id, signature_hex),
        ExecuteMsg::UpdateOperators { add, remove } => {
            execute::update_operators(deps, env, info, add, remove)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Subscription { subscription_id } => {
            query::query_subscription(deps, subscription_id)
        }
        QueryMsg::Request { request_id } => query::query_request(deps, request_id),
        QueryMsg::RoundAt { time } => query::query_round_at(deps, time),
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
