use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    instructions::draw_settlement::finalize_draw,
    state::{Config, Round, WinnerBoard},
};

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct MockDraw<'info> {
    /// Admin-only: settle a draw without the VRF oracle.
    #[account(constraint = admin.key() == config.admin @ ErrorCode::Unauthorized)]
    pub admin: Signer<'info>,

    #[account(mut, seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [SEED_ROUND, &round_id.to_le_bytes()],
        bump,
    )]
    pub round: AccountLoader<'info, Round>,

    #[account(mut, seeds = [SEED_BOARD], bump)]
    pub winner_board: AccountLoader<'info, WinnerBoard>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, MockDraw<'info>>,
    _round_id: u64,
    randomness: [u8; 32],
) -> Result<()> {
    finalize_draw(
        &mut ctx.accounts.config,
        &ctx.accounts.round,
        &ctx.accounts.winner_board,
        ctx.remaining_accounts,
        randomness,
    )
}
