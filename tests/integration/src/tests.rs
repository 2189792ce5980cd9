//! Integration tests for the auto-raffle contracts.
//!
//! Both contracts run through their entry points on `cosmwasm_std::testing`
//! mocks. Messages and replies between them are relayed by hand the way the
//! chain would deliver them, so a full round can be played against a real
//! drand quicknet beacon.
//!
//! Run:
//! ```bash
//! cargo test -p auto-raffle-integration-tests
//! ```

use auto_raffle::execute::winner_index;
use auto_raffle::state::RaffleState;
use auto_raffle_vrf_coordinator::beacon::{expand_random_words, QUICKNET_PK_HEX};
use auto_raffle_vrf_coordinator::state::RandomnessRequest;
use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coin, coins, from_json, Addr, BankMsg, CosmosMsg, Env, Event, MemoryStorage, OwnedDeps, Reply,
    Response, SubMsg, SubMsgResponse, SubMsgResult, Timestamp, WasmMsg,
};

type MockDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

const GENESIS_TIME: u64 = 1692803367;
const PERIOD: u64 = 3;

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

const DENOM: &str = "uatom";
const FEE: u128 = 1_000_000;
const INTERVAL: u64 = 30;
const CONFIRMATIONS: u64 = 3;

// ─── Helpers ───

/// Block time at which `round` is the latest published beacon.
fn env_at_round(round: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(GENESIS_TIME + (round - 1) * PERIOD);
    env
}

/// The draw is triggered at this time, so with three confirmations the
/// coordinator targets the test round.
fn draw_env() -> Env {
    env_at_round(TEST_ROUND - CONFIRMATIONS)
}

fn round_start_env() -> Env {
    let mut env = draw_env();
    env.block.time = env.block.time.minus_seconds(INTERVAL + 1);
    env
}

fn addr(name: &str) -> Addr {
    MockApi::default().addr_make(name)
}

fn setup_coordinator(deps: &mut MockDeps) {
    let admin = addr("admin");
    let owner = addr("owner");
    auto_raffle_vrf_coordinator::contract::instantiate(
        deps.as_mut(),
        mock_env(),
        message_info(&admin, &[]),
        auto_raffle_vrf_coordinator::msg::InstantiateMsg {
            operators: vec![addr("operator").to_string()],
            quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
            chain_hash: "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971"
                .to_string(),
            genesis_time: GENESIS_TIME,
            period_seconds: PERIOD,
            max_num_words: 10,
            min_callback_gas_limit: 100_000,
            max_callback_gas_limit: 2_500_000,
        },
    )
    .unwrap();

    auto_raffle_vrf_coordinator::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&owner, &[]),
        auto_raffle_vrf_coordinator::msg::ExecuteMsg::CreateSubscription {},
    )
    .unwrap();
    auto_raffle_vrf_coordinator::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&owner, &[]),
        auto_raffle_vrf_coordinator::msg::ExecuteMsg::AddConsumer {
            subscription_id: 1,
            consumer: addr("raffle").to_string(),
        },
    )
    .unwrap();
}

fn raffle_instantiate_msg() -> auto_raffle::msg::InstantiateMsg {
    auto_raffle::msg::InstantiateMsg {
        entrance_fee: coin(FEE, DENOM),
        interval_seconds: INTERVAL,
        vrf_coordinator: addr("coordinator").to_string(),
        subscription_id: 1,
        callback_gas_limit: 500_000,
        request_confirmations: CONFIRMATIONS,
        num_words: 1,
    }
}

fn setup_raffle(deps: &mut MockDeps) {
    let admin = addr("admin");
    auto_raffle::contract::instantiate(
        deps.as_mut(),
        round_start_env(),
        message_info(&admin, &[]),
        raffle_instantiate_msg(),
    )
    .unwrap();
}

fn enter(deps: &mut MockDeps, name: &str) {
    auto_raffle::contract::execute(
        deps.as_mut(),
        round_start_env(),
        message_info(&addr(name), &coins(FEE, DENOM)),
        auto_raffle::msg::ExecuteMsg::EnterRaffle {},
    )
    .unwrap();
}

fn raffle_query<T: serde::de::DeserializeOwned>(
    deps: &MockDeps,
    msg: auto_raffle::msg::QueryMsg,
) -> T {
    serde_json::from_slice(&auto_raffle::contract::query(deps.as_ref(), mock_env(), msg).unwrap())
        .unwrap()
}

/// Split a wasm execute sub-message into its target and payload.
fn unwrap_execute<T: serde::de::DeserializeOwned>(sub: &SubMsg) -> (String, T) {
    match &sub.msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr,
            msg,
            funds,
        }) => {
            assert!(funds.is_empty());
            (contract_addr.clone(), from_json(msg).unwrap())
        }
        other => panic!("expected a wasm execute, got {:?}", other),
    }
}

/// The reply the chain hands back to the caller of a successful sub-message.
/// Custom events carry the `wasm-` prefix and the emitting contract's address
/// once emitted.
#[allow(deprecated)]
fn success_reply(sub: &SubMsg, emitter: &Addr, res: &Response) -> Reply {
    let events = res
        .events
        .iter()
        .map(|e| {
            Event::new(format!("wasm-{}", e.ty))
                .add_attribute("_contract_address", emitter.to_string())
                .add_attributes(e.attributes.clone())
        })
        .collect();
    Reply {
        id: sub.id,
        payload: sub.payload.clone(),
        gas_used: 0,
        result: SubMsgResult::Ok(SubMsgResponse {
            events,
            data: res.data.clone(),
            msg_responses: vec![],
        }),
    }
}

/// Play phase 1: the keeper triggers the draw and the coordinator accepts
/// the request. Returns the request id the raffle now waits for.
fn trigger_draw(raffle: &mut MockDeps, coordinator: &mut MockDeps) -> u64 {
    let res = auto_raffle::contract::execute(
        raffle.as_mut(),
        draw_env(),
        message_info(&addr("keeper"), &[]),
        auto_raffle::msg::ExecuteMsg::PerformUpkeep {},
    )
    .unwrap();
    assert_eq!(res.messages.len(), 1);
    let sub = &res.messages[0];

    let (target, request): (String, auto_raffle_vrf_coordinator::msg::ExecuteMsg) =
        unwrap_execute(sub);
    assert_eq!(target, addr("coordinator").to_string());

    let coordinator_res = auto_raffle_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        draw_env(),
        message_info(&addr("raffle"), &[]),
        request,
    )
    .unwrap();

    auto_raffle::contract::reply(
        raffle.as_mut(),
        draw_env(),
        success_reply(sub, &addr("coordinator"), &coordinator_res),
    )
    .unwrap();

    let pending: Option<u64> =
        raffle_query(raffle, auto_raffle::msg::QueryMsg::PendingRequest {});
    pending.unwrap()
}

/// Play phase 2 up to the callback: an operator submits the beacon and the
/// coordinator produces the sub-message addressed to the raffle.
fn deliver_beacon(coordinator: &mut MockDeps, request_id: u64) -> SubMsg {
    let res = auto_raffle_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        env_at_round(TEST_ROUND),
        message_info(&addr("operator"), &[]),
        auto_raffle_vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords {
            request_id,
            signature_hex: TEST_SIG_HEX.to_string(),
        },
    )
    .unwrap();
    assert_eq!(res.messages.len(), 1);
    res.messages[0].clone()
}

fn expected_words(request_id: u64) -> Vec<cosmwasm_std::Uint256> {
    let randomness: [u8; 32] = hex::decode(TEST_RANDOMNESS_HEX)
        .unwrap()
        .try_into()
        .unwrap();
    expand_random_words(&randomness, request_id, 1)
}

// ─── Tests ───

#[test]
fn test_full_round_with_drand_beacon() {
    let mut coordinator = mock_dependencies();
    let mut raffle = mock_dependencies();
    setup_coordinator(&mut coordinator);
    setup_raffle(&mut raffle);

    let names = ["alice", "bob", "carol"];
    for name in names {
        enter(&mut raffle, name);
    }

    let request_id = trigger_draw(&mut raffle, &mut coordinator);
    assert_eq!(request_id, 1);
    let state: RaffleState = raffle_query(&raffle, auto_raffle::msg::QueryMsg::RaffleState {});
    assert_eq!(state, RaffleState::Calculating { request_id: 1 });

    let request: Option<RandomnessRequest> = serde_json::from_slice(
        &auto_raffle_vrf_coordinator::contract::query(
            coordinator.as_ref(),
            mock_env(),
            auto_raffle_vrf_coordinator::msg::QueryMsg::Request { request_id },
        )
        .unwrap(),
    )
    .unwrap();
    let request = request.unwrap();
    assert_eq!(request.target_round, TEST_ROUND);
    assert_eq!(request.consumer, addr("raffle"));

    let callback = deliver_beacon(&mut coordinator, request_id);
    assert_eq!(callback.gas_limit, Some(500_000));
    let (target, msg): (String, auto_raffle::msg::ExecuteMsg) = unwrap_execute(&callback);
    assert_eq!(target, addr("raffle").to_string());

    let res = auto_raffle::contract::execute(
        raffle.as_mut(),
        env_at_round(TEST_ROUND),
        message_info(&addr("coordinator"), &[]),
        msg,
    )
    .unwrap();

    let index = winner_index(expected_words(request_id)[0], names.len()).unwrap();
    let winner = addr(names[index]);

    let recent: Option<Addr> = raffle_query(&raffle, auto_raffle::msg::QueryMsg::RecentWinner {});
    assert_eq!(recent, Some(winner.clone()));
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Bank(BankMsg::Send {
            to_address: winner.to_string(),
            amount: coins(3 * FEE, DENOM),
        })
    );

    let state: RaffleState = raffle_query(&raffle, auto_raffle::msg::QueryMsg::RaffleState {});
    assert_eq!(state, RaffleState::Open);
    let players: u64 = raffle_query(&raffle, auto_raffle::msg::QueryMsg::NumberOfPlayers {});
    assert_eq!(players, 0);
    let last: Timestamp = raffle_query(&raffle, auto_raffle::msg::QueryMsg::LastTimestamp {});
    assert_eq!(last, env_at_round(TEST_ROUND).block.time);
}

#[test]
fn test_callback_replay_is_rejected() {
    let mut coordinator = mock_dependencies();
    let mut raffle = mock_dependencies();
    setup_coordinator(&mut coordinator);
    setup_raffle(&mut raffle);
    enter(&mut raffle, "alice");
    enter(&mut raffle, "bob");

    let request_id = trigger_draw(&mut raffle, &mut coordinator);
    let callback = deliver_beacon(&mut coordinator, request_id);
    let (_, msg): (String, auto_raffle::msg::ExecuteMsg) = unwrap_execute(&callback);

    auto_raffle::contract::execute(
        raffle.as_mut(),
        env_at_round(TEST_ROUND),
        message_info(&addr("coordinator"), &[]),
        msg.clone(),
    )
    .unwrap();

    // The coordinator dropped the request and the raffle moved on
    let err = auto_raffle_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        env_at_round(TEST_ROUND),
        message_info(&addr("operator"), &[]),
        auto_raffle_vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords {
            request_id,
            signature_hex: TEST_SIG_HEX.to_string(),
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), format!("nonexistent request {}", request_id));

    let err = auto_raffle::contract::execute(
        raffle.as_mut(),
        env_at_round(TEST_ROUND),
        message_info(&addr("coordinator"), &[]),
        msg,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        auto_raffle::ContractError::UnknownRequest { .. }
    ));
}

#[test]
fn test_unregistered_consumer_cannot_request() {
    let mut coordinator = mock_dependencies();
    let mut raffle = mock_dependencies();
    setup_coordinator(&mut coordinator);
    setup_raffle(&mut raffle);
    enter(&mut raffle, "alice");

    let res = auto_raffle::contract::execute(
        raffle.as_mut(),
        draw_env(),
        message_info(&addr("keeper"), &[]),
        auto_raffle::msg::ExecuteMsg::PerformUpkeep {},
    )
    .unwrap();
    let (_, request): (String, auto_raffle_vrf_coordinator::msg::ExecuteMsg) =
        unwrap_execute(&res.messages[0]);

    // Sent from a contract the subscription does not know, the request
    // fails and the whole transaction reverts, so no reply reaches the raffle
    let err = auto_raffle_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        draw_env(),
        message_info(&addr("impostor"), &[]),
        request,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        auto_raffle_vrf_coordinator::ContractError::InvalidConsumer { .. }
    ));

    let state: RaffleState = raffle_query(&raffle, auto_raffle::msg::QueryMsg::RaffleState {});
    assert_eq!(state, RaffleState::Open);
}

#[test]
fn test_unusable_callback_budget_is_rejected_up_front() {
    let mut coordinator = mock_dependencies();
    let mut raffle = mock_dependencies();
    setup_coordinator(&mut coordinator);

    // A zero budget would make every fulfillment revert and strand the round
    let mut msg = raffle_instantiate_msg();
    msg.callback_gas_limit = 0;
    let err = auto_raffle::contract::instantiate(
        raffle.as_mut(),
        round_start_env(),
        message_info(&addr("admin"), &[]),
        msg,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        auto_raffle::ContractError::InvalidCallbackGasLimit
    ));

    // Below the coordinator minimum, the request itself fails and the
    // raffle never leaves Open
    let mut msg = raffle_instantiate_msg();
    msg.callback_gas_limit = 50_000;
    auto_raffle::contract::instantiate(
        raffle.as_mut(),
        round_start_env(),
        message_info(&addr("admin"), &[]),
        msg,
    )
    .unwrap();
    enter(&mut raffle, "alice");

    let res = auto_raffle::contract::execute(
        raffle.as_mut(),
        draw_env(),
        message_info(&addr("keeper"), &[]),
        auto_raffle::msg::ExecuteMsg::PerformUpkeep {},
    )
    .unwrap();
    let (_, request): (String, auto_raffle_vrf_coordinator::msg::ExecuteMsg) =
        unwrap_execute(&res.messages[0]);
    let err = auto_raffle_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        draw_env(),
        message_info(&addr("raffle"), &[]),
        request,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        auto_raffle_vrf_coordinator::ContractError::GasLimitTooSmall { got: 50_000, .. }
    ));

    let state: RaffleState = raffle_query(&raffle, auto_raffle::msg::QueryMsg::RaffleState {});
    assert_eq!(state, RaffleState::Open);
}
