use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::RoundClosed,
    state::{Config, Round, RoundStatus},
};

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct CloseRound<'info> {
    #[account(constraint = authority.key() == config.authority @ ErrorCode::Unauthorized)]
    pub authority: Signer<'info>,

    #[account(mut, seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [SEED_ROUND, &round_id.to_le_bytes()],
        bump,
    )]
    pub round: AccountLoader<'info, Round>,
}

/// Open -> Closed. Stakes are frozen from here until the draw settles.
pub fn handler(ctx: Context<CloseRound>, round_id: u64) -> Result<()> {
    let mut round = ctx.accounts.round.load_mut()?;
    require!(round.status == RoundStatus::Open as u8, ErrorCode::RoundNotOpen);

    let now = Clock::get()?.unix_timestamp;
    require!(now >= round.end_ts, ErrorCode::RoundNotEnded);

    ctx.accounts.config.close_round(round_id)?;
    round.status = RoundStatus::Closed as u8;
    round.closed_at = now;

    emit!(RoundClosed {
        round_id,
        total_entries: round.total_entries,
        top_bid: round.top_bid,
        bidders_count: round.bidders_count,
        closed_at: now,
    });

    Ok(())
}
