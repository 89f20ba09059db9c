#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based state machine tests for the PoolStaking contract.
//!
//! Arbitrary sequences of operations run against two pools and four users;
//! after every step the following must hold:
//! - `total_staked` equals the sum of every user's stake in that pool
//! - no stake or total is ever negative
//! - a user is in the active registry iff their stake is positive, and the
//!   slot recorded for them points back at them
//! - the registry length equals the number of users with positive stake
//! - the contract always holds at least the principal it owes

use pool_staking::ContractError;
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::Address;

use crate::common::{setup_test_env, TestContext, MIN_STAKE, RATE};

const USERS: usize = 4;
const POOLS: u32 = 2;
const USER_FUNDS: i128 = 1_000_000_000_000_000_000;

#[derive(Arbitrary, Clone, Debug)]
enum Op {
    Stake {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
        #[proptest(strategy = "0u32..POOLS")]
        pool: u32,
        #[proptest(strategy = "1_000i128..=20_000_000_000_000_000i128")]
        amount: i128,
    },
    Withdraw {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
        #[proptest(strategy = "0u32..POOLS")]
        pool: u32,
        #[proptest(strategy = "1u32..=100u32")]
        percent: u32,
    },
    EmergencyWithdraw {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
        #[proptest(strategy = "0u32..POOLS")]
        pool: u32,
    },
    Claim {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
        #[proptest(strategy = "0u32..POOLS")]
        pool: u32,
    },
    ClaimAll {
        #[proptest(strategy = "0usize..USERS")]
        user: usize,
    },
    AutoCompound {
        #[proptest(strategy = "0u32..POOLS")]
        pool: u32,
    },
    Advance {
        #[proptest(strategy = "0u32..300u32")]
        ledgers: u32,
    },
}

fn apply(ctx: &TestContext, users: &[Address], keeper: &Address, op: &Op) {
    match *op {
        Op::Stake { user, pool, amount } => {
            let result = ctx.client.try_stake(&users[user], &pool, &amount);
            if amount < MIN_STAKE {
                assert_eq!(result, Err(Ok(ContractError::AmountTooSmall)));
            } else {
                assert!(result.is_ok());
            }
        }
        Op::Withdraw { user, pool, percent } => {
            let staked = ctx.client.get_staked_amount(&pool, &users[user]);
            let amount = staked * percent as i128 / 100;
            let result = ctx.client.try_withdraw(&users[user], &pool, &amount);
            if amount == 0 {
                assert_eq!(result, Err(Ok(ContractError::InvalidAmount)));
            } else {
                assert!(result.is_ok());
            }
        }
        Op::EmergencyWithdraw { user, pool } => {
            let staked = ctx.client.get_staked_amount(&pool, &users[user]);
            assert_eq!(ctx.client.emergency_withdraw(&users[user], &pool), staked);
            assert_eq!(ctx.client.get_amount_reward_in_pool(&pool, &users[user]), 0);
        }
        Op::Claim { user, pool } => {
            let owed = ctx.client.get_amount_reward_in_pool(&pool, &users[user]);
            assert_eq!(ctx.client.claim_reward(&users[user], &pool), owed);
        }
        Op::ClaimAll { user } => {
            let before = ctx.balance(&users[user]);
            let paid = ctx.client.claim_all_reward(&users[user]);
            assert_eq!(ctx.balance(&users[user]), before + paid);
        }
        Op::AutoCompound { pool } => {
            let before = ctx.balance(keeper);
            let fee = ctx.client.auto_compound(keeper, &pool);
            assert_eq!(ctx.balance(keeper), before + fee);
        }
        Op::Advance { ledgers } => ctx.advance(ledgers),
    }
}

fn check_invariants(ctx: &TestContext, users: &[Address]) {
    let mut owed_principal = 0i128;

    for pool in 0..POOLS {
        let info = ctx.client.get_pool_info(&pool);
        let mut sum = 0i128;
        let mut active = 0u32;

        for user in users {
            let staked = ctx.client.get_staked_amount(&pool, user);
            assert!(staked >= 0);
            sum += staked;

            let position = ctx.client.has_user_in_pool(user, &pool);
            if staked > 0 {
                active += 1;
                assert!(position > 0);
                assert_eq!(ctx.client.list_user_in_pool(&pool, &(position - 1)), *user);
            } else {
                assert_eq!(position, 0);
            }
        }

        assert!(info.total_staked >= 0);
        assert_eq!(info.total_staked, sum);
        assert_eq!(ctx.client.get_active_staker_count(&pool), active);
        owed_principal += info.total_staked;
    }

    let contract = ctx.client.address.clone();
    assert!(ctx.balance(&contract) >= owed_principal);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_ledger_invariants_hold(ops in proptest::collection::vec(any::<Op>(), 1..40)) {
        let ctx = setup_test_env(1_000);
        for _ in 0..POOLS {
            ctx.add_pool(RATE);
        }
        let users: Vec<Address> = (0..USERS).map(|_| ctx.funded_user(USER_FUNDS)).collect();
        let keeper = ctx.new_user();

        for op in &ops {
            apply(&ctx, &users, &keeper, op);
            check_invariants(&ctx, &users);
        }
    }
}
