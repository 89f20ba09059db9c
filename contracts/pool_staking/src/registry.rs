//! Per-pool set of addresses with a positive stake.
//!
//! Stored as an array of slots plus a reverse index so that membership test,
//! insertion and removal are O(1) and a sweep touches only active stakers:
//!
//! ```text
//! (STKR_LEN, pool)        -> u32      number of occupied slots
//! (STKR_AT,  pool, slot)  -> Address  0-based slot
//! (STKR_IDX, pool, user)  -> u32      1-based position, absent = 0
//! ```
//!
//! Removal is swap-remove: the last slot moves into the hole, so only that
//! one element ever changes position.

use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::{extend_persistent, ContractError};

fn len_key(pool_id: u32) -> (Symbol, u32) {
    (symbol_short!("STKR_LEN"), pool_id)
}

fn slot_key(pool_id: u32, slot: u32) -> (Symbol, u32, u32) {
    (symbol_short!("STKR_AT"), pool_id, slot)
}

fn index_key(pool_id: u32, user: &Address) -> (Symbol, u32, Address) {
    (symbol_short!("STKR_IDX"), pool_id, user.clone())
}

pub fn len(env: &Env, pool_id: u32) -> u32 {
    env.storage()
        .persistent()
        .get(&len_key(pool_id))
        .unwrap_or(0u32)
}

fn set_len(env: &Env, pool_id: u32, len: u32) {
    let key = len_key(pool_id);
    env.storage().persistent().set(&key, &len);
    extend_persistent(env, &key);
}

fn set_slot(env: &Env, pool_id: u32, slot: u32, user: &Address) {
    let key = slot_key(pool_id, slot);
    env.storage().persistent().set(&key, user);
    extend_persistent(env, &key);
}

fn set_index(env: &Env, pool_id: u32, user: &Address, position: u32) {
    let key = index_key(pool_id, user);
    env.storage().persistent().set(&key, &position);
    extend_persistent(env, &key);
}

/// 1-based position of `user`, or 0 when absent.
pub fn index_of(env: &Env, pool_id: u32, user: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&index_key(pool_id, user))
        .unwrap_or(0u32)
}

pub fn contains(env: &Env, pool_id: u32, user: &Address) -> bool {
    index_of(env, pool_id, user) != 0
}

/// Address stored at 0-based `index`.
pub fn at(env: &Env, pool_id: u32, index: u32) -> Result<Address, ContractError> {
    if index >= len(env, pool_id) {
        return Err(ContractError::IndexOutOfRange);
    }
    env.storage()
        .persistent()
        .get(&slot_key(pool_id, index))
        .ok_or(ContractError::IndexOutOfRange)
}

/// Append `user` unless already present. Returns `true` if inserted.
pub fn add(env: &Env, pool_id: u32, user: &Address) -> bool {
    if contains(env, pool_id, user) {
        return false;
    }

    let slot = len(env, pool_id);
    set_slot(env, pool_id, slot, user);
    set_index(env, pool_id, user, slot.saturating_add(1));
    set_len(env, pool_id, slot.saturating_add(1));
    true
}

/// Swap-remove `user`. Returns `true` if it was present.
pub fn remove(env: &Env, pool_id: u32, user: &Address) -> bool {
    let position = index_of(env, pool_id, user);
    if position == 0 {
        return false;
    }

    let hole = position - 1;
    let last = len(env, pool_id).saturating_sub(1);

    if hole != last {
        if let Some(moved) = env
            .storage()
            .persistent()
            .get::<_, Address>(&slot_key(pool_id, last))
        {
            set_slot(env, pool_id, hole, &moved);
            set_index(env, pool_id, &moved, position);
        }
    }

    env.storage().persistent().remove(&slot_key(pool_id, last));
    env.storage().persistent().remove(&index_key(pool_id, user));
    set_len(env, pool_id, last);
    true
}

/// Copy of the current membership in slot order.
///
/// Sweeps iterate this copy, so membership changes made during the sweep
/// never skip or repeat an element.
pub fn snapshot(env: &Env, pool_id: u32) -> Vec<Address> {
    let mut out = Vec::new(env);
    for slot in 0..len(env, pool_id) {
        if let Some(user) = env.storage().persistent().get(&slot_key(pool_id, slot)) {
            out.push_back(user);
        }
    }
    out
}
