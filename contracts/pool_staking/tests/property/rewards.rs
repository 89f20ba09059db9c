#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for reward accrual.
//!
//! Invariants tested:
//! - Pending reward equals `rate × staked × elapsed / 1e18` exactly
//! - Pending reward never decreases while nothing settles the position
//! - A second claim in the same ledger always pays zero
//! - Auto-compound fee plus reinvested amount equals the harvested reward

use pool_staking::REWARD_SCALE;
use proptest::prelude::*;

use crate::common::{setup_test_env, RATE};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Reward after `elapsed` ledgers matches the fixed-point formula.
    #[test]
    fn prop_reward_matches_formula(
        amount in 10_000i128..=1_000_000_000_000_000_000i128,
        elapsed in 0u32..=5_000u32,
    ) {
        let ctx = setup_test_env(1_000);
        ctx.add_pool(RATE);
        let staker = ctx.funded_user(amount);

        ctx.client.stake(&staker, &0, &amount);
        ctx.advance(elapsed);

        let expected = RATE * amount * elapsed as i128 / REWARD_SCALE;
        prop_assert_eq!(ctx.client.get_amount_reward_in_pool(&0, &staker), expected);
    }

    /// Without an intervening settlement, pending reward is monotone in time.
    #[test]
    fn prop_accrual_is_monotonic(
        amount in 10_000i128..=1_000_000_000_000_000_000i128,
        steps in proptest::collection::vec(0u32..500u32, 1..10),
    ) {
        let ctx = setup_test_env(1_000);
        ctx.add_pool(RATE);
        let staker = ctx.funded_user(amount);
        ctx.client.stake(&staker, &0, &amount);

        let mut previous = 0i128;
        for step in steps {
            ctx.advance(step);
            let pending = ctx.client.get_amount_reward_in_pool(&0, &staker);
            prop_assert!(pending >= previous);
            prop_assert!(pending >= 0);
            previous = pending;
        }
    }

    /// Claiming twice in the same ledger pays nothing the second time.
    #[test]
    fn prop_second_claim_is_zero(
        amount in 10_000i128..=10_000_000_000_000_000i128,
        elapsed in 0u32..=3_000u32,
    ) {
        let ctx = setup_test_env(1_000);
        ctx.add_pool(RATE);
        let staker = ctx.funded_user(amount);

        ctx.client.stake(&staker, &0, &amount);
        ctx.advance(elapsed);

        let first = ctx.client.claim_reward(&staker, &0);
        prop_assert_eq!(ctx.balance(&staker), first);
        prop_assert_eq!(ctx.client.claim_reward(&staker, &0), 0);
        prop_assert_eq!(ctx.balance(&staker), first);
    }

    /// Compounding splits the harvest into fee and stake with nothing lost.
    #[test]
    fn prop_compound_conserves_harvest(
        amount in 1_000_000_000_000i128..=10_000_000_000_000_000i128,
        elapsed in 1u32..=3_000u32,
        fee in 0u32..=10_000u32,
    ) {
        let ctx = setup_test_env(fee);
        ctx.add_pool(RATE);
        let staker = ctx.funded_user(amount);
        let keeper = ctx.new_user();

        ctx.client.stake(&staker, &0, &amount);
        ctx.advance(elapsed);

        let harvest = ctx.client.get_amount_reward_in_pool(&0, &staker);
        let paid = ctx.client.auto_compound(&keeper, &0);
        let grown = ctx.client.get_staked_amount(&0, &staker) - amount;

        prop_assert_eq!(paid + grown, harvest);
        prop_assert_eq!(paid, harvest * fee as i128 / 10_000);
        prop_assert_eq!(ctx.balance(&keeper), paid);
    }
}
