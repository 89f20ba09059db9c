extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env};

use crate::{ContractError, PoolStakingContract, PoolStakingContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, PoolStakingContractClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(PoolStakingContract, ());
    let client = PoolStakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &token, &1_000);

    (env, client, admin, token)
}

// ── Two-step transfer ────────────────────────────────────────────────────────

#[test]
fn test_propose_and_accept_admin() {
    let (env, client, admin, _token) = setup();
    let successor = Address::generate(&env);

    client.propose_admin(&admin, &successor);
    assert_eq!(client.get_pending_admin(), Some(successor.clone()));
    // Nothing changes until the successor accepts.
    assert_eq!(client.get_admin(), admin);

    client.accept_admin(&successor);
    assert_eq!(client.get_admin(), successor);
    assert_eq!(client.get_pending_admin(), None);
}

#[test]
fn test_propose_by_non_admin_fails() {
    let (env, client, _admin, _token) = setup();
    let intruder = Address::generate(&env);

    let result = client.try_propose_admin(&intruder, &intruder);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_accept_by_wrong_address_fails() {
    let (env, client, admin, _token) = setup();
    let successor = Address::generate(&env);
    let intruder = Address::generate(&env);

    client.propose_admin(&admin, &successor);

    let result = client.try_accept_admin(&intruder);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_admin(), admin);
}

#[test]
fn test_accept_without_proposal_fails() {
    let (env, client, _admin, _token) = setup();
    let someone = Address::generate(&env);

    assert_eq!(
        client.try_accept_admin(&someone),
        Err(Ok(ContractError::InvalidInput))
    );
}

#[test]
fn test_cancel_admin_transfer() {
    let (env, client, admin, _token) = setup();
    let successor = Address::generate(&env);

    assert_eq!(
        client.try_cancel_admin_transfer(&admin),
        Err(Ok(ContractError::InvalidInput))
    );

    client.propose_admin(&admin, &successor);
    client.cancel_admin_transfer(&admin);

    assert_eq!(client.get_pending_admin(), None);
    assert_eq!(
        client.try_accept_admin(&successor),
        Err(Ok(ContractError::InvalidInput))
    );
}

#[test]
fn test_second_nomination_replaces_first() {
    let (env, client, admin, _token) = setup();
    let first = Address::generate(&env);
    let second = Address::generate(&env);

    client.propose_admin(&admin, &first);
    client.propose_admin(&admin, &second);
    assert_eq!(client.get_pending_admin(), Some(second.clone()));

    assert_eq!(
        client.try_accept_admin(&first),
        Err(Ok(ContractError::Unauthorized))
    );
    client.accept_admin(&second);
    assert_eq!(client.get_admin(), second);
}

// ── Privileges follow the admin ──────────────────────────────────────────────

#[test]
fn test_privileges_move_with_admin() {
    let (env, client, admin, token) = setup();
    let successor = Address::generate(&env);

    client.propose_admin(&admin, &successor);
    client.accept_admin(&successor);

    assert_eq!(
        client.try_add_new_staking_pool(&admin, &0, &1, &token, &0),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_change_auto_compounding_fee(&admin, &0),
        Err(Ok(ContractError::Unauthorized))
    );

    assert_eq!(client.add_new_staking_pool(&successor, &0, &1, &token, &0), 0);
    client.change_auto_compounding_fee(&successor, &500);
    assert_eq!(client.get_auto_compounding_fee(), 500);
}
