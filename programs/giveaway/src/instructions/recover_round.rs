use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::RoundRecovered,
    state::{Config, Round, RoundStatus},
};

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct RecoverRound<'info> {
    #[account(constraint = admin.key() == config.admin @ ErrorCode::Unauthorized)]
    pub admin: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [SEED_ROUND, &round_id.to_le_bytes()],
        bump,
    )]
    pub round: AccountLoader<'info, Round>,
}

/// Re-derive the round's aggregates from its stake table, checked against the
/// total shown in the last published round summary.
pub fn handler(ctx: Context<RecoverRound>, round_id: u64, summary_total_entries: u64) -> Result<()> {
    ctx.accounts.config.require_current(round_id)?;

    let mut round = ctx.accounts.round.load_mut()?;
    require!(
        round.status == RoundStatus::Open as u8 || round.status == RoundStatus::Closed as u8,
        ErrorCode::RoundNotOpen
    );

    let previous_total_entries = round.total_entries;
    let rebuilt = round.rebuild_aggregates(summary_total_entries)?;

    emit!(RoundRecovered {
        round_id,
        previous_total_entries,
        total_entries: rebuilt.total_entries,
        top_bid: rebuilt.top_bid,
        bidders_count: rebuilt.bidders,
    });

    Ok(())
}
