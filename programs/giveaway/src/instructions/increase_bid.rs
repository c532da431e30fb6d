use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::BidAccepted,
    ledger::place_bid,
    state::{Config, PointsAccount, Round, RoundStatus, WinnerBoard},
};

#[derive(Accounts)]
#[instruction(round_id: u64, user_id: u64)]
pub struct IncreaseBid<'info> {
    #[account(constraint = authority.key() == config.authority @ ErrorCode::Unauthorized)]
    pub authority: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    /// Writable in every bid, so the runtime runs bids on one round strictly one after another.
    #[account(
        mut,
        seeds = [SEED_ROUND, &round_id.to_le_bytes()],
        bump,
    )]
    pub round: AccountLoader<'info, Round>,

    #[account(seeds = [SEED_BOARD], bump)]
    pub winner_board: AccountLoader<'info, WinnerBoard>,

    #[account(
        mut,
        seeds = [SEED_POINTS, &user_id.to_le_bytes()],
        bump = points.bump,
        constraint = points.user_id == user_id @ ErrorCode::PointsAccountMismatch,
    )]
    pub points: Account<'info, PointsAccount>,
}

pub fn handler(
    ctx: Context<IncreaseBid>,
    round_id: u64,
    user_id: u64,
    requested_amount: u64,
) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, ErrorCode::Paused);
    cfg.require_current(round_id)?;

    let mut round = ctx.accounts.round.load_mut()?;
    require!(round.status == RoundStatus::Open as u8, ErrorCode::RoundNotOpen);

    let now = Clock::get()?.unix_timestamp;
    require!(now < round.end_ts, ErrorCode::RoundExpired);

    let board = ctx.accounts.winner_board.load()?;
    let receipt = place_bid(&mut ctx.accounts.points, &mut round, &board, requested_amount)?;

    emit!(BidAccepted {
        round_id,
        user_id,
        accepted_amount: receipt.accepted_amount,
        new_bid: receipt.new_bid,
        new_balance: receipt.new_balance,
        win_count: receipt.win_count,
        win_chance_bps: round.win_chance_bps(receipt.new_bid),
        total_entries_after: round.total_entries,
        top_bid_after: round.top_bid,
    });

    Ok(())
}
