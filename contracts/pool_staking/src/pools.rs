use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{extend_persistent, ContractError};

// ── Storage key constants ───────────────────────────────────────────────────

/// Number of pools created so far; also the id of the next pool.
const POOL_CTR: Symbol = symbol_short!("POOL_CTR");

// ── Types ───────────────────────────────────────────────────────────────────

/// Configuration and running totals of a single staking pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    /// Sequential identifier, starting at 0.
    pub id: u32,
    /// Smallest deposit `stake` accepts.
    pub min_stake_amount: i128,
    /// Reward per ledger per staked unit, scaled by `REWARD_SCALE`.
    pub reward_per_block: i128,
    /// Token this pool accepts as principal.
    pub token: Address,
    /// Opaque configuration value supplied by the admin. Stored and
    /// reported, never read by reward accrual.
    pub params: u32,
    /// Sum of every position's `current_staked` in this pool.
    pub total_staked: i128,
    /// Ledger sequence at creation.
    pub created_at: u32,
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn pool_key(id: u32) -> (Symbol, u32) {
    (symbol_short!("POOL"), id)
}

pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_CTR).unwrap_or(0u32)
}

/// Allocate the next id and persist a fresh pool with `total_staked = 0`.
pub fn create(
    env: &Env,
    min_stake_amount: i128,
    reward_per_block: i128,
    token: Address,
    params: u32,
) -> Result<PoolInfo, ContractError> {
    let id = pool_count(env);
    let next = id.checked_add(1).ok_or(ContractError::ArithmeticOverflow)?;

    let pool = PoolInfo {
        id,
        min_stake_amount,
        reward_per_block,
        token,
        params,
        total_staked: 0,
        created_at: env.ledger().sequence(),
    };

    store(env, &pool);
    env.storage().instance().set(&POOL_CTR, &next);

    Ok(pool)
}

/// Load a pool, failing with `InvalidPool` for ids that were never created.
pub fn load(env: &Env, id: u32) -> Result<PoolInfo, ContractError> {
    env.storage()
        .persistent()
        .get(&pool_key(id))
        .ok_or(ContractError::InvalidPool)
}

pub fn exists(env: &Env, id: u32) -> bool {
    id < pool_count(env)
}

pub fn store(env: &Env, pool: &PoolInfo) {
    let key = pool_key(pool.id);
    env.storage().persistent().set(&key, pool);
    extend_persistent(env, &key);
}
