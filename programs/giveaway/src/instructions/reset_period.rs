use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::WinsReset,
    state::{Config, WinnerBoard},
};

#[derive(Accounts)]
pub struct ResetPeriod<'info> {
    #[account(constraint = admin.key() == config.admin @ ErrorCode::Unauthorized)]
    pub admin: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [SEED_BOARD], bump)]
    pub winner_board: AccountLoader<'info, WinnerBoard>,
}

/// Start a new accounting period outside `start_round`. Allowed in any round state,
/// so a draw blocked by a full board can be retried afterwards.
pub fn handler(ctx: Context<ResetPeriod>) -> Result<()> {
    let mut board = ctx.accounts.winner_board.load_mut()?;
    let period_id = board.start_period()?;
    msg!("winner board cleared by admin, period {}", period_id);

    emit!(WinsReset { period_id });

    Ok(())
}
