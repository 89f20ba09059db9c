use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::pools::PoolInfo;
use crate::{extend_persistent, rewards, ContractError};

// ── Types ───────────────────────────────────────────────────────────────────

/// One deposit in a (pool, user) history.
///
/// Entries are numbered from 1 and never rewritten. `staked_amount` is the
/// running total of the position right after the deposit, not the delta.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeEntry {
    pub staked_amount: i128,
    /// Ledger sequence of the deposit.
    pub ledger: u32,
}

/// Live state of a (pool, user) pair.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPosition {
    pub current_staked: i128,
    /// Baseline ledger for the next accrual.
    pub last_settlement: u32,
    /// Reward settled but not yet paid out.
    pub accrued_unclaimed: i128,
    /// Number of entries in the deposit log.
    pub entry_count: u32,
}

impl UserPosition {
    /// Reward earned since `last_settlement`, excluding what is already
    /// settled.
    pub fn unsettled(&self, pool: &PoolInfo, now: u32) -> Result<i128, ContractError> {
        let elapsed = rewards::elapsed_since(self.last_settlement, now);
        rewards::pending(self.current_staked, pool.reward_per_block, elapsed)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Everything the user could claim at `now`.
    pub fn pending_reward(&self, pool: &PoolInfo, now: u32) -> Result<i128, ContractError> {
        self.accrued_unclaimed
            .checked_add(self.unsettled(pool, now)?)
            .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Checkpoint: fold unsettled reward into `accrued_unclaimed` and move
    /// the baseline to `now`, even when nothing accrued.
    pub fn settle(&mut self, pool: &PoolInfo, now: u32) -> Result<(), ContractError> {
        self.accrued_unclaimed = self.pending_reward(pool, now)?;
        self.last_settlement = now;
        Ok(())
    }

    /// Take the settled reward, leaving zero behind.
    pub fn take_accrued(&mut self) -> i128 {
        core::mem::take(&mut self.accrued_unclaimed)
    }

    /// Amount lost if the position exits without settling. Saturates.
    pub fn forfeitable(&self, pool: &PoolInfo, now: u32) -> i128 {
        let elapsed = rewards::elapsed_since(self.last_settlement, now);
        self.accrued_unclaimed.saturating_add(rewards::pending_saturating(
            self.current_staked,
            pool.reward_per_block,
            elapsed,
        ))
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn position_key(pool_id: u32, user: &Address) -> (Symbol, u32, Address) {
    (symbol_short!("POS"), pool_id, user.clone())
}

fn entry_key(pool_id: u32, user: &Address, index: u32) -> (Symbol, u32, Address, u32) {
    (symbol_short!("ENTRY"), pool_id, user.clone(), index)
}

fn user_pools_key(user: &Address) -> (Symbol, Address) {
    (symbol_short!("U_POOLS"), user.clone())
}

/// Position for (pool, user); an untouched pair reads as all zeros.
pub fn load_position(env: &Env, pool_id: u32, user: &Address) -> UserPosition {
    env.storage()
        .persistent()
        .get(&position_key(pool_id, user))
        .unwrap_or_default()
}

pub fn store_position(env: &Env, pool_id: u32, user: &Address, position: &UserPosition) {
    let key = position_key(pool_id, user);
    env.storage().persistent().set(&key, position);
    extend_persistent(env, &key);
}

/// Append an entry recording the position's current total and return its
/// 1-based index.
pub fn append_entry(
    env: &Env,
    pool_id: u32,
    user: &Address,
    position: &mut UserPosition,
) -> Result<u32, ContractError> {
    let index = position
        .entry_count
        .checked_add(1)
        .ok_or(ContractError::ArithmeticOverflow)?;

    let entry = StakeEntry {
        staked_amount: position.current_staked,
        ledger: env.ledger().sequence(),
    };
    let key = entry_key(pool_id, user, index);
    env.storage().persistent().set(&key, &entry);
    extend_persistent(env, &key);

    position.entry_count = index;
    Ok(index)
}

/// Entry `index` (1-based) of the deposit log.
pub fn get_entry(
    env: &Env,
    pool_id: u32,
    user: &Address,
    index: u32,
) -> Result<StakeEntry, ContractError> {
    env.storage()
        .persistent()
        .get(&entry_key(pool_id, user, index))
        .ok_or(ContractError::IndexOutOfRange)
}

/// Every pool `user` has ever staked in, in first-stake order.
pub fn user_pools(env: &Env, user: &Address) -> Vec<u32> {
    env.storage()
        .persistent()
        .get(&user_pools_key(user))
        .unwrap_or_else(|| Vec::new(env))
}

/// Remember that `user` has a position in `pool_id`.
pub fn track_pool(env: &Env, user: &Address, pool_id: u32) {
    let mut pools = user_pools(env, user);
    if pools.contains(pool_id) {
        return;
    }
    pools.push_back(pool_id);

    let key = user_pools_key(user);
    env.storage().persistent().set(&key, &pools);
    extend_persistent(env, &key);
}
