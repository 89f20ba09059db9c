#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pool_staking::{PoolStakingContract, PoolStakingContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

const POOLS: u32 = 2;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { user: u8, pool: u8, amount: u64 },
    Withdraw { user: u8, pool: u8, amount: u64 },
    EmergencyWithdraw { user: u8, pool: u8 },
    Claim { user: u8, pool: u8 },
    ClaimAll { user: u8 },
    AutoCompound { pool: u8 },
    SetRate { pool: u8, rate: u32 },
    Advance { ledgers: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| {
        li.min_persistent_entry_ttl = 1_000_000;
        li.min_temp_entry_ttl = 1_000_000;
    });

    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(PoolStakingContract, ());
    let client = PoolStakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &token, &1_000);
    for _ in 0..POOLS {
        client.add_new_staking_pool(&admin, &1, &10_000_000_000i128, &token, &0);
    }

    let minter = StellarAssetClient::new(&env, &token);
    minter.mint(&contract_id, &i128::from(u64::MAX));

    let mut users = vec![];
    for _ in 0..4 {
        let user = Address::generate(&env);
        minter.mint(&user, &i128::from(u64::MAX));
        users.push(user);
    }
    let keeper = Address::generate(&env);

    // Errors are expected for invalid input; only panics and broken
    // invariants are findings.
    for action in actions.into_iter().take(64) {
        match action {
            FuzzAction::Stake { user, pool, amount } => {
                let user = &users[user as usize % users.len()];
                let _ = client.try_stake(user, &(pool as u32 % POOLS), &i128::from(amount));
            }
            FuzzAction::Withdraw { user, pool, amount } => {
                let user = &users[user as usize % users.len()];
                let _ = client.try_withdraw(user, &(pool as u32 % POOLS), &i128::from(amount));
            }
            FuzzAction::EmergencyWithdraw { user, pool } => {
                let user = &users[user as usize % users.len()];
                let _ = client.try_emergency_withdraw(user, &(pool as u32 % POOLS));
            }
            FuzzAction::Claim { user, pool } => {
                let user = &users[user as usize % users.len()];
                let _ = client.try_claim_reward(user, &(pool as u32 % POOLS));
            }
            FuzzAction::ClaimAll { user } => {
                let user = &users[user as usize % users.len()];
                let _ = client.try_claim_all_reward(user);
            }
            FuzzAction::AutoCompound { pool } => {
                let _ = client.try_auto_compound(&keeper, &(pool as u32 % POOLS));
            }
            FuzzAction::SetRate { pool, rate } => {
                let _ = client.try_set_staking_pool(
                    &admin,
                    &(pool as u32 % POOLS),
                    &1,
                    &i128::from(rate),
                    &0,
                );
            }
            FuzzAction::Advance { ledgers } => {
                let next = env.ledger().sequence() + u32::from(ledgers);
                env.ledger().set_sequence_number(next);
            }
        }

        let mut principal = 0i128;
        for pool in 0..POOLS {
            let total = client.get_pool_info(&pool).total_staked;
            let mut sum = 0i128;
            for user in &users {
                let staked = client.get_staked_amount(&pool, user);
                let position = client.has_user_in_pool(user, &pool);
                assert!(staked >= 0);
                assert_eq!(staked > 0, position > 0);
                if position > 0 {
                    assert_eq!(client.list_user_in_pool(&pool, &(position - 1)), *user);
                }
                sum += staked;
            }
            assert_eq!(total, sum);
            principal += total;
        }
        assert!(TokenClient::new(&env, &token).balance(&contract_id) >= principal);
    }
});
