use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::BidChecked,
    ledger::bid_standing,
    state::{Config, PointsAccount, Round, WinnerBoard},
};

#[derive(Accounts)]
#[instruction(round_id: u64, user_id: u64)]
pub struct CheckBid<'info> {
    #[account(constraint = authority.key() == config.authority @ ErrorCode::Unauthorized)]
    pub authority: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(seeds = [SEED_ROUND, &round_id.to_le_bytes()], bump)]
    pub round: AccountLoader<'info, Round>,

    #[account(seeds = [SEED_BOARD], bump)]
    pub winner_board: AccountLoader<'info, WinnerBoard>,

    #[account(
        seeds = [SEED_POINTS, &user_id.to_le_bytes()],
        bump = points.bump,
        constraint = points.user_id == user_id @ ErrorCode::PointsAccountMismatch,
    )]
    pub points: Account<'info, PointsAccount>,
}

/// Read-only: report the user's bid, win chance and wins for the current round.
pub fn handler(ctx: Context<CheckBid>, round_id: u64, user_id: u64) -> Result<()> {
    ctx.accounts.config.require_current(round_id)?;

    let round = ctx.accounts.round.load()?;
    let board = ctx.accounts.winner_board.load()?;
    let standing = bid_standing(&ctx.accounts.points, &round, &board);

    emit!(BidChecked {
        round_id,
        user_id,
        bid: standing.bid,
        win_chance_bps: standing.win_chance_bps,
        win_count: standing.win_count,
        balance: standing.balance,
    });

    Ok(())
}
