#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub auto_compounding_fee: u32,
    pub ledger: u32,
}

/// Fired when a pool is created or reconfigured.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfiguredEvent {
    pub pool_id: u32,
    pub min_stake_amount: i128,
    pub reward_per_block: i128,
    pub token: Address,
    pub params: u32,
    pub ledger: u32,
}

/// Fired when a user deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub entry_index: u32,
    pub new_total_staked: i128,
    pub ledger: u32,
}

/// Fired when a user withdraws principal (with settled reward).
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub reward: i128,
    pub new_total_staked: i128,
    pub ledger: u32,
}

/// Fired when a user exits a pool through the emergency path.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawnEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub forfeited_reward: i128,
    pub ledger: u32,
}

/// Fired when a user claims reward from a pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub ledger: u32,
}

/// Fired for every staker whose reward is reinvested by `auto_compound`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompoundedEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub harvested: i128,
    pub fee: i128,
    pub new_staked: i128,
    pub ledger: u32,
}

/// Fired once per `auto_compound` call.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AutoCompoundedEvent {
    pub pool_id: u32,
    pub caller: Address,
    pub stakers: u32,
    pub total_fee: i128,
    pub ledger: u32,
}

/// Fired when the admin sweeps forfeited reward.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForfeitedClaimedEvent {
    pub admin: Address,
    pub amount: i128,
    pub ledger: u32,
}

/// Fired when an admin transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
    pub ledger: u32,
}

/// Fired when an admin transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub ledger: u32,
}

/// Fired when a pending admin transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub admin: Address,
    pub cancelled_proposed: Address,
    pub ledger: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address, reward_token: Address, fee: u32) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            auto_compounding_fee: fee,
            ledger: env.ledger().sequence(),
        },
    );
}

fn pool_configured_payload(env: &Env, pool: &crate::PoolInfo) -> PoolConfiguredEvent {
    PoolConfiguredEvent {
        pool_id: pool.id,
        min_stake_amount: pool.min_stake_amount,
        reward_per_block: pool.reward_per_block,
        token: pool.token.clone(),
        params: pool.params,
        ledger: env.ledger().sequence(),
    }
}

pub fn publish_pool_created(env: &Env, pool: &crate::PoolInfo) {
    env.events().publish(
        (symbol_short!("POOL_NEW"), pool.id),
        pool_configured_payload(env, pool),
    );
}

pub fn publish_pool_updated(env: &Env, pool: &crate::PoolInfo) {
    env.events().publish(
        (symbol_short!("POOL_SET"), pool.id),
        pool_configured_payload(env, pool),
    );
}

pub fn publish_fee_changed(env: &Env, fee: u32) {
    env.events().publish(
        (symbol_short!("AC_FEE"),),
        (fee, env.ledger().sequence()),
    );
}

pub fn publish_reward_token_set(env: &Env, token: Address) {
    env.events().publish(
        (symbol_short!("RWD_TOK"),),
        (token, env.ledger().sequence()),
    );
}

pub fn publish_staked(
    env: &Env,
    pool_id: u32,
    staker: Address,
    amount: i128,
    entry_index: u32,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("STAKED"), pool_id, staker.clone()),
        StakedEvent {
            pool_id,
            staker,
            amount,
            entry_index,
            new_total_staked,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    pool_id: u32,
    staker: Address,
    amount: i128,
    reward: i128,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), pool_id, staker.clone()),
        WithdrawnEvent {
            pool_id,
            staker,
            amount,
            reward,
            new_total_staked,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_emergency_withdrawn(
    env: &Env,
    pool_id: u32,
    staker: Address,
    amount: i128,
    forfeited_reward: i128,
) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), pool_id, staker.clone()),
        EmergencyWithdrawnEvent {
            pool_id,
            staker,
            amount,
            forfeited_reward,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, pool_id: u32, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), pool_id, staker.clone()),
        RewardClaimedEvent {
            pool_id,
            staker,
            amount,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_compounded(
    env: &Env,
    pool_id: u32,
    staker: Address,
    harvested: i128,
    fee: i128,
    new_staked: i128,
) {
    env.events().publish(
        (symbol_short!("COMPOUND"), pool_id, staker.clone()),
        CompoundedEvent {
            pool_id,
            staker,
            harvested,
            fee,
            new_staked,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_auto_compounded(
    env: &Env,
    pool_id: u32,
    caller: Address,
    stakers: u32,
    total_fee: i128,
) {
    env.events().publish(
        (symbol_short!("AUTO_CMP"), pool_id, caller.clone()),
        AutoCompoundedEvent {
            pool_id,
            caller,
            stakers,
            total_fee,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_forfeited_claimed(env: &Env, admin: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("FORFEIT"), admin.clone()),
        ForfeitedClaimedEvent {
            admin,
            amount,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
            ledger: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, admin: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), admin.clone()),
        AdminTransferCancelledEvent {
            admin,
            cancelled_proposed,
            ledger: env.ledger().sequence(),
        },
    );
}
