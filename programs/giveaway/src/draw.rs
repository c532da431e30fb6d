use anchor_lang::prelude::*;
use crate::constants::{DRAW_SAMPLES, WINNER_SLOTS};
use crate::errors::ErrorCode;
use crate::state::{Round, RoundAggregates, WinnerBoard};
use crate::utils::{bit_find_prefix, bit_prefix_sum, bit_sub, checked_sub_u64};

/// Deterministic stream of draws expanded from one 32-byte oracle output.
pub struct DrawStream {
    seed: [u8; 32],
    counter: u64,
}

impl DrawStream {
    pub fn new(seed: &[u8; 32]) -> Self {
        Self { seed: *seed, counter: 0 }
    }

    fn next_u128(&mut self) -> u128 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed);
        hasher.update(&self.counter.to_le_bytes());
        self.counter += 1;

        let digest = hasher.finalize();
        let mut bytes16 = [0u8; 16];
        bytes16.copy_from_slice(&digest.as_bytes()[..16]);
        u128::from_le_bytes(bytes16)
    }

    /// Uniform ticket in `1..=total`.
    pub fn ticket(&mut self, total: u64) -> u64 {
        (self.next_u128() % total as u128) as u64 + 1
    }
}

/// One stake-weighted pick; returns the 0-based slot.
fn weighted_pick(bit: &[u64], total: u64, stream: &mut DrawStream) -> Result<usize> {
    let ticket = stream.ticket(total);
    Ok(bit_find_prefix(bit, ticket)? - 1)
}

/// Pick up to `WINNER_SLOTS` distinct slots, `[primary, backup_1, backup_2]`.
///
/// `DRAW_SAMPLES` weighted draws are taken with replacement and deduplicated in draw
/// order. If that leaves fewer distinct slots than are available, the already chosen
/// slots are removed from a scratch tree and single draws top the list up.
pub fn select_winners(bit: &[u64], stakes: &[u64], randomness: &[u8; 32]) -> Result<Vec<usize>> {
    let total = bit_prefix_sum(bit, bit.len() - 1)?;
    let eligible = stakes.iter().filter(|s| **s > 0).count();
    if total == 0 || eligible == 0 {
        return Ok(Vec::new());
    }

    let mut stream = DrawStream::new(randomness);
    let mut picked: Vec<usize> = Vec::with_capacity(WINNER_SLOTS);

    for _ in 0..DRAW_SAMPLES.min(eligible) {
        let slot = weighted_pick(bit, total, &mut stream)?;
        if picked.len() < WINNER_SLOTS && !picked.contains(&slot) {
            picked.push(slot);
        }
    }

    let wanted = WINNER_SLOTS.min(eligible);
    if picked.len() < wanted {
        let mut remaining = bit.to_vec();
        let mut remaining_total = total;
        for &slot in &picked {
            bit_sub(&mut remaining, slot + 1, stakes[slot])?;
            remaining_total = checked_sub_u64(remaining_total, stakes[slot])?;
        }
        while picked.len() < wanted {
            let slot = weighted_pick(&remaining, remaining_total, &mut stream)?;
            bit_sub(&mut remaining, slot + 1, stakes[slot])?;
            remaining_total = checked_sub_u64(remaining_total, stakes[slot])?;
            picked.push(slot);
        }
    }

    Ok(picked)
}

/// Mean stake across eligible bidders, in hundredths of a point.
pub fn average_bid_x100(stats: &RoundAggregates) -> u64 {
    if stats.bidders == 0 {
        return 0;
    }
    ((stats.total_entries as u128 * 100) / stats.bidders as u128) as u64
}

/// Everything the draw announcement needs, captured before stakes are reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub refunds: Vec<(u64, u64)>,
    pub winners: Vec<u64>,
    pub primary_wins: u8,
    pub stats: RoundAggregates,
    pub average_bid_x100: u64,
    pub winning_bid: u64,
    pub winning_chance_bps: u64,
}

/// Exclude capped bidders, draw, credit the primary winner's win counter and reset the round.
///
/// The caller owns crediting `refunds` back to the points ledger inside the same transaction.
pub fn settle(
    round: &mut Round,
    board: &mut WinnerBoard,
    randomness: &[u8; 32],
    now: i64,
) -> Result<Settlement> {
    round.verify_aggregates()?;

    let refunds = round.exclude_ineligible(board)?;
    let stats = round.derive_aggregates()?;
    let average = average_bid_x100(&stats);

    let slots = select_winners(&round.bit.data, &round.stakes.data, randomness)?;
    let winners: Vec<u64> = slots.iter().map(|slot| round.bidders.data[*slot]).collect();
    require!(
        winners.iter().all(|user| board.is_eligible(*user)),
        ErrorCode::LedgerInconsistent
    );

    let primary_wins = match winners.first() {
        Some(primary) => board.record_win(*primary)?,
        None => 0,
    };

    let winning_chance_bps = winners
        .first()
        .map(|primary| round.win_chance_bps(round.stake_of(*primary)))
        .unwrap_or(0);

    round.complete_draw(&winners, stats, average, randomness, now);

    Ok(Settlement {
        refunds,
        winners,
        primary_wins,
        stats,
        average_bid_x100: average,
        winning_bid: round.winning_bid,
        winning_chance_bps,
    })
}
