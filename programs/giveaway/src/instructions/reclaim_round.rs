use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    state::{Config, Round, RoundStatus},
};

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct ReclaimRound<'info> {
    /// Receives the rent lamports.
    #[account(
        mut,
        constraint = admin.key() == config.admin @ ErrorCode::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [SEED_ROUND, &round_id.to_le_bytes()],
        bump,
        close = admin,
    )]
    pub round: AccountLoader<'info, Round>,
}

pub fn handler(ctx: Context<ReclaimRound>, round_id: u64) -> Result<()> {
    require!(
        round_id != ctx.accounts.config.current_round_id,
        ErrorCode::RoundStillActive
    );

    let round = ctx.accounts.round.load()?;
    require!(round.status == RoundStatus::Drawn as u8, ErrorCode::RoundNotDrawn);

    // Anchor's `close = admin` handles the actual account closing + rent transfer

    Ok(())
}
