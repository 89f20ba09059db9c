//! Pure reward arithmetic. Nothing in this module touches storage.

/// Fixed-point scale applied to `reward_per_block`.
///
/// A pool rate of `10^10` means every staked unit earns `10^10 / 10^18`
/// reward units per ledger.
pub const REWARD_SCALE: i128 = 1_000_000_000_000_000_000;

/// Basis-point denominator for the auto-compounding fee (10 000 = 100 %).
pub const FEE_SCALE: u32 = 10_000;

// ── Core reward engine ──────────────────────────────────────────────────────

/// Ledgers elapsed since the last checkpoint. Every ledger counts.
pub fn elapsed_since(last: u32, now: u32) -> u32 {
    now.saturating_sub(last)
}

/// Reward owed for holding `staked` units for `elapsed` ledgers:
///
/// ```text
/// reward = reward_per_block × staked × elapsed / REWARD_SCALE
/// ```
///
/// Truncates toward zero. Returns `None` on overflow.
pub fn pending(staked: i128, reward_per_block: i128, elapsed: u32) -> Option<i128> {
    if staked <= 0 || reward_per_block <= 0 || elapsed == 0 {
        return Some(0);
    }

    let gross = reward_per_block
        .checked_mul(staked)?
        .checked_mul(i128::from(elapsed))?;

    Some(gross / REWARD_SCALE)
}

/// Same formula as [`pending`], but saturates instead of failing.
///
/// Only used to size forfeited reward on the emergency path, which must
/// never abort on arithmetic.
pub fn pending_saturating(staked: i128, reward_per_block: i128, elapsed: u32) -> i128 {
    if staked <= 0 || reward_per_block <= 0 || elapsed == 0 {
        return 0;
    }

    reward_per_block
        .saturating_mul(staked)
        .saturating_mul(i128::from(elapsed))
        / REWARD_SCALE
}

/// Split a harvested amount into `(fee, net)` for auto-compounding.
///
/// ```text
/// fee = harvested × fee_bps / FEE_SCALE
/// net = harvested − fee
/// ```
///
/// `fee + net == harvested` always holds, so compounding neither creates nor
/// destroys value.
pub fn split_fee(harvested: i128, fee_bps: u32) -> Option<(i128, i128)> {
    if harvested <= 0 {
        return Some((0, 0));
    }

    let fee = harvested.checked_mul(i128::from(fee_bps))? / i128::from(FEE_SCALE);
    let net = harvested.checked_sub(fee)?;

    Some((fee, net))
}

// ── Unit tests ──────────────────────────────────────────────────────────────
