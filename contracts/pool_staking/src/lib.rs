#![no_std]

pub mod events;
pub mod ledger;
pub mod pools;
pub mod registry;
pub mod rewards;
pub mod token_adapter;

use soroban_sdk::{
    contract, contractimpl, symbol_short, Address, Env, IntoVal, Symbol, Val, Vec,
};

pub use ledger::{StakeEntry, UserPosition};
pub use pools::PoolInfo;
pub use rewards::{FEE_SCALE, REWARD_SCALE};
use token_adapter::TokenAdapter;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");
const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const AC_FEE: Symbol = symbol_short!("AC_FEE");
const FORFEITED: Symbol = symbol_short!("FORFEIT");

const DAY_IN_LEDGERS: u32 = 17_280;
const TTL_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;
const TTL_EXTEND_TO: u32 = 120 * DAY_IN_LEDGERS;

/// Keep a persistent entry alive after writing it.
pub(crate) fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidPool = 4,
    AmountTooSmall = 5,
    InvalidAmount = 6,
    IndexOutOfRange = 7,
    TransferFailed = 8,
    InvalidFeeRate = 9,
    InvalidInput = 10,
    RewardTokenMismatch = 11,
    ArithmeticOverflow = 12,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct PoolStakingContract;

#[contractimpl]
impl PoolStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `reward_token`         – token every reward, fee and forfeit is paid in.
    /// * `auto_compounding_fee` – share of harvested reward paid to whoever
    ///   calls `auto_compound`, in basis points of `FEE_SCALE`.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        auto_compounding_fee: u32,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if auto_compounding_fee > FEE_SCALE {
            return Err(ContractError::InvalidFeeRate);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&AC_FEE, &auto_compounding_fee);
        extend_instance(&env);

        events::publish_initialized(&env, admin, reward_token, auto_compounding_fee);

        Ok(())
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Create a pool and return its id. Ids are sequential from 0.
    ///
    /// `params` is kept on the pool as-is; it has no effect on accrual.
    pub fn add_new_staking_pool(
        env: Env,
        caller: Address,
        min_stake_amount: i128,
        reward_per_block: i128,
        token: Address,
        params: u32,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if min_stake_amount < 0 || reward_per_block < 0 {
            return Err(ContractError::InvalidInput);
        }

        let pool = pools::create(&env, min_stake_amount, reward_per_block, token, params)?;
        extend_instance(&env);

        events::publish_pool_created(&env, &pool);

        Ok(pool.id)
    }

    /// Reconfigure an existing pool in place.
    ///
    /// Positions are not resettled here: each one picks up the new rate for
    /// its unsettled interval at its next checkpoint.
    pub fn set_staking_pool(
        env: Env,
        caller: Address,
        pool_id: u32,
        min_stake_amount: i128,
        reward_per_block: i128,
        params: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if min_stake_amount < 0 || reward_per_block < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut pool = pools::load(&env, pool_id)?;
        pool.min_stake_amount = min_stake_amount;
        pool.reward_per_block = reward_per_block;
        pool.params = params;
        pools::store(&env, &pool);
        extend_instance(&env);

        events::publish_pool_updated(&env, &pool);

        Ok(())
    }

    /// Set the auto-compounding fee, in basis points.
    pub fn change_auto_compounding_fee(
        env: Env,
        caller: Address,
        fee: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if fee > FEE_SCALE {
            return Err(ContractError::InvalidFeeRate);
        }

        env.storage().instance().set(&AC_FEE, &fee);
        extend_instance(&env);

        events::publish_fee_changed(&env, fee);

        Ok(())
    }

    /// Switch the token rewards are paid in.
    pub fn set_new_reward_token(
        env: Env,
        caller: Address,
        token: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        env.storage().instance().set(&REWARD_TOKEN, &token);
        extend_instance(&env);

        events::publish_reward_token_set(&env, token);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` into `pool_id` and return the new stake-entry index.
    ///
    /// Pending reward is settled first so the new principal earns nothing
    /// retroactively.
    pub fn stake(
        env: Env,
        staker: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let mut pool = pools::load(&env, pool_id)?;
        if amount <= 0 || amount < pool.min_stake_amount {
            return Err(ContractError::AmountTooSmall);
        }

        let now = env.ledger().sequence();

        // 1. Checkpoint at the old balance.
        let mut position = ledger::load_position(&env, pool_id, &staker);
        position.settle(&pool, now)?;

        // 2. Grow the position and the pool total.
        position.current_staked = position
            .current_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        let entry_index = ledger::append_entry(&env, pool_id, &staker, &mut position)?;
        ledger::store_position(&env, pool_id, &staker, &position);
        ledger::track_pool(&env, &staker, pool_id);
        pools::store(&env, &pool);
        registry::add(&env, pool_id, &staker);

        // 3. Pull the principal.
        TokenAdapter::new(&env, &pool.token).transfer_in(&staker, amount)?;
        extend_instance(&env);

        events::publish_staked(
            &env,
            pool_id,
            staker,
            amount,
            entry_index,
            pool.total_staked,
        );

        Ok(entry_index)
    }

    /// Withdraw `amount` of principal together with all settled reward.
    /// Returns the reward paid.
    pub fn withdraw(
        env: Env,
        staker: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let mut pool = pools::load(&env, pool_id)?;
        let now = env.ledger().sequence();

        let mut position = ledger::load_position(&env, pool_id, &staker);
        if amount <= 0 || amount > position.current_staked {
            return Err(ContractError::InvalidAmount);
        }

        position.settle(&pool, now)?;
        let reward = position.take_accrued();

        position.current_staked -= amount;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;

        ledger::store_position(&env, pool_id, &staker, &position);
        pools::store(&env, &pool);
        if position.current_staked == 0 {
            registry::remove(&env, pool_id, &staker);
        }

        Self::pay_principal_and_reward(&env, &pool, &staker, amount, reward)?;
        extend_instance(&env);

        events::publish_withdrawn(&env, pool_id, staker, amount, reward, pool.total_staked);

        Ok(reward)
    }

    /// Return the whole principal immediately, forfeiting every unpaid
    /// reward. Returns the principal.
    ///
    /// The forfeited amount is parked in the escrow the admin can sweep with
    /// `claim_forfeited_rewards`.
    pub fn emergency_withdraw(
        env: Env,
        staker: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let mut pool = pools::load(&env, pool_id)?;
        let now = env.ledger().sequence();

        let mut position = ledger::load_position(&env, pool_id, &staker);
        let principal = position.current_staked;
        let forfeited = position.forfeitable(&pool, now);

        position.current_staked = 0;
        position.accrued_unclaimed = 0;
        position.last_settlement = now;
        pool.total_staked = pool.total_staked.saturating_sub(principal);

        ledger::store_position(&env, pool_id, &staker, &position);
        pools::store(&env, &pool);
        registry::remove(&env, pool_id, &staker);

        if forfeited > 0 {
            let escrow = Self::get_forfeited_rewards(env.clone()).saturating_add(forfeited);
            env.storage().instance().set(&FORFEITED, &escrow);
        }

        TokenAdapter::new(&env, &pool.token).transfer_out(&staker, principal)?;
        extend_instance(&env);

        events::publish_emergency_withdrawn(&env, pool_id, staker, principal, forfeited);

        Ok(principal)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything settled for `staker` in `pool_id`.
    ///
    /// Claiming with nothing owed is not an error; it returns 0.
    ///
    /// Reward is paid from the contract's reward-token balance, which is not
    /// kept apart from principal. When the reward token is also a pool token,
    /// the admin must fund reward liquidity separately or claims draw on
    /// other stakers' deposits.
    pub fn claim_reward(env: Env, staker: Address, pool_id: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let pool = pools::load(&env, pool_id)?;
        let now = env.ledger().sequence();

        let mut position = ledger::load_position(&env, pool_id, &staker);
        position.settle(&pool, now)?;
        let reward = position.take_accrued();
        ledger::store_position(&env, pool_id, &staker, &position);

        if reward > 0 {
            TokenAdapter::new(&env, &Self::reward_token(&env)?).transfer_out(&staker, reward)?;
            events::publish_reward_claimed(&env, pool_id, staker, reward);
        }
        extend_instance(&env);

        Ok(reward)
    }

    /// Claim from every pool `staker` has ever staked in, in one transfer.
    ///
    /// Pools with nothing owed are skipped. Returns the total paid.
    pub fn claim_all_reward(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let now = env.ledger().sequence();
        let mut total: i128 = 0;

        for pool_id in ledger::user_pools(&env, &staker).iter() {
            let pool = pools::load(&env, pool_id)?;

            let mut position = ledger::load_position(&env, pool_id, &staker);
            position.settle(&pool, now)?;
            let reward = position.take_accrued();
            ledger::store_position(&env, pool_id, &staker, &position);

            if reward == 0 {
                continue;
            }
            total = total
                .checked_add(reward)
                .ok_or(ContractError::ArithmeticOverflow)?;
            events::publish_reward_claimed(&env, pool_id, staker.clone(), reward);
        }

        TokenAdapter::new(&env, &Self::reward_token(&env)?).transfer_out(&staker, total)?;
        extend_instance(&env);

        Ok(total)
    }

    /// Harvest and reinvest reward for every active staker of `pool_id`.
    ///
    /// Anyone may call this. Each staker's harvest is split by the
    /// auto-compounding fee; the net part is added to their stake and the
    /// fees are paid to `caller` in a single transfer. Returns the fee total.
    pub fn auto_compound(env: Env, caller: Address, pool_id: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let mut pool = pools::load(&env, pool_id)?;
        let reward_token = Self::reward_token(&env)?;
        if reward_token != pool.token {
            return Err(ContractError::RewardTokenMismatch);
        }

        let fee_rate = Self::get_auto_compounding_fee(env.clone());
        let now = env.ledger().sequence();
        let mut total_fee: i128 = 0;
        let mut compounded: u32 = 0;

        for staker in registry::snapshot(&env, pool_id).iter() {
            let mut position = ledger::load_position(&env, pool_id, &staker);
            position.settle(&pool, now)?;
            let harvested = position.take_accrued();

            if harvested == 0 {
                ledger::store_position(&env, pool_id, &staker, &position);
                continue;
            }

            let (fee, net) =
                rewards::split_fee(harvested, fee_rate).ok_or(ContractError::ArithmeticOverflow)?;

            position.current_staked = position
                .current_staked
                .checked_add(net)
                .ok_or(ContractError::ArithmeticOverflow)?;
            pool.total_staked = pool
                .total_staked
                .checked_add(net)
                .ok_or(ContractError::ArithmeticOverflow)?;
            if net > 0 {
                ledger::append_entry(&env, pool_id, &staker, &mut position)?;
            }
            ledger::store_position(&env, pool_id, &staker, &position);

            total_fee = total_fee
                .checked_add(fee)
                .ok_or(ContractError::ArithmeticOverflow)?;
            compounded = compounded.saturating_add(1);

            events::publish_compounded(
                &env,
                pool_id,
                staker.clone(),
                harvested,
                fee,
                position.current_staked,
            );
        }

        pools::store(&env, &pool);
        TokenAdapter::new(&env, &reward_token).transfer_out(&caller, total_fee)?;
        extend_instance(&env);

        events::publish_auto_compounded(&env, pool_id, caller, compounded, total_fee);

        Ok(total_fee)
    }

    /// Sweep the forfeited-reward escrow to the admin. Returns the amount.
    ///
    /// The escrow is a counter, not a reserved balance: the payout needs the
    /// same separately funded reward liquidity as `claim_reward`.
    pub fn claim_forfeited_rewards(env: Env, caller: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let amount = Self::get_forfeited_rewards(env.clone());
        env.storage().instance().set(&FORFEITED, &0i128);

        TokenAdapter::new(&env, &Self::reward_token(&env)?).transfer_out(&caller, amount)?;
        extend_instance(&env);

        events::publish_forfeited_claimed(&env, caller, amount);

        Ok(amount)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn get_pool_info(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        pools::load(&env, pool_id)
    }

    pub fn get_pool_count(env: Env) -> u32 {
        pools::pool_count(&env)
    }

    /// Reward `user` could claim from `pool_id` right now, settled and
    /// unsettled together.
    pub fn get_amount_reward_in_pool(
        env: Env,
        pool_id: u32,
        user: Address,
    ) -> Result<i128, ContractError> {
        let pool = pools::load(&env, pool_id)?;
        ledger::load_position(&env, pool_id, &user).pending_reward(&pool, env.ledger().sequence())
    }

    pub fn get_staked_amount(env: Env, pool_id: u32, user: Address) -> Result<i128, ContractError> {
        Self::require_pool(&env, pool_id)?;
        Ok(ledger::load_position(&env, pool_id, &user).current_staked)
    }

    pub fn get_user_position(
        env: Env,
        pool_id: u32,
        user: Address,
    ) -> Result<UserPosition, ContractError> {
        Self::require_pool(&env, pool_id)?;
        Ok(ledger::load_position(&env, pool_id, &user))
    }

    /// Active staker at 0-based `index` of the pool's registry.
    pub fn list_user_in_pool(env: Env, pool_id: u32, index: u32) -> Result<Address, ContractError> {
        Self::require_pool(&env, pool_id)?;
        registry::at(&env, pool_id, index)
    }

    /// 1-based registry position of `user`, or 0 when not actively staked.
    pub fn has_user_in_pool(env: Env, user: Address, pool_id: u32) -> u32 {
        registry::index_of(&env, pool_id, &user)
    }

    pub fn get_active_staker_count(env: Env, pool_id: u32) -> Result<u32, ContractError> {
        Self::require_pool(&env, pool_id)?;
        Ok(registry::len(&env, pool_id))
    }

    /// Entry `entry_index` (1-based) of the deposit log.
    pub fn staked_entry(
        env: Env,
        pool_id: u32,
        user: Address,
        entry_index: u32,
    ) -> Result<StakeEntry, ContractError> {
        Self::require_pool(&env, pool_id)?;
        ledger::get_entry(&env, pool_id, &user, entry_index)
    }

    pub fn get_stake_entry_count(
        env: Env,
        pool_id: u32,
        user: Address,
    ) -> Result<u32, ContractError> {
        Self::require_pool(&env, pool_id)?;
        Ok(ledger::load_position(&env, pool_id, &user).entry_count)
    }

    pub fn get_user_pools(env: Env, user: Address) -> Vec<u32> {
        ledger::user_pools(&env, &user)
    }

    pub fn get_auto_compounding_fee(env: Env) -> u32 {
        env.storage().instance().get(&AC_FEE).unwrap_or(0)
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        Self::reward_token(&env)
    }

    pub fn get_forfeited_rewards(env: Env) -> i128 {
        env.storage().instance().get(&FORFEITED).unwrap_or(0)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Nominate `new_admin` as successor. Pool and fee privileges stay with
    /// `current_admin` until the nominee calls `accept_admin`. A second
    /// nomination replaces the first.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        env.storage().instance().set(&PENDING_ADMIN, &new_admin);
        extend_instance(&env);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Take over pool administration. Fails with `InvalidInput` when no
    /// nomination is open and `Unauthorized` for anyone but the nominee.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        if new_admin != Self::pending_admin(&env)? {
            return Err(ContractError::Unauthorized);
        }
        let old_admin = Self::get_admin(env.clone())?;

        env.storage().instance().set(&ADMIN, &new_admin);
        env.storage().instance().remove(&PENDING_ADMIN);
        extend_instance(&env);

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Withdraw an open nomination.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        let nominee = Self::pending_admin(&env)?;
        env.storage().instance().remove(&PENDING_ADMIN);
        extend_instance(&env);

        events::publish_admin_transfer_cancelled(&env, current_admin, nominee);

        Ok(())
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_ADMIN)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn pending_admin(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::InvalidInput)
    }

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` is not the stored admin.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn require_pool(env: &Env, pool_id: u32) -> Result<(), ContractError> {
        if !pools::exists(env, pool_id) {
            return Err(ContractError::InvalidPool);
        }
        Ok(())
    }

    fn reward_token(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    /// Principal leaves in the pool token, reward in the reward token; one
    /// transfer when they are the same token.
    fn pay_principal_and_reward(
        env: &Env,
        pool: &PoolInfo,
        to: &Address,
        principal: i128,
        reward: i128,
    ) -> Result<(), ContractError> {
        let reward_token = Self::reward_token(env)?;
        if reward_token == pool.token {
            let total = principal
                .checked_add(reward)
                .ok_or(ContractError::ArithmeticOverflow)?;
            return TokenAdapter::new(env, &pool.token).transfer_out(to, total);
        }

        TokenAdapter::new(env, &pool.token).transfer_out(to, principal)?;
        TokenAdapter::new(env, &reward_token).transfer_out(to, reward)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
