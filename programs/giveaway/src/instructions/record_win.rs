use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::WinRecorded,
    state::{Config, RoundStatus, WinnerBoard},
};

#[derive(Accounts)]
pub struct RecordWin<'info> {
    #[account(constraint = admin.key() == config.admin @ ErrorCode::Unauthorized)]
    pub admin: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [SEED_BOARD], bump)]
    pub winner_board: AccountLoader<'info, WinnerBoard>,
}

/// Credit a win by hand, e.g. when the prize went to a backup winner.
pub fn handler(ctx: Context<RecordWin>, user_id: u64) -> Result<()> {
    // eligibility of a closed round's bidders is settled by its draw
    require!(
        ctx.accounts.config.round_state != RoundStatus::Closed as u8,
        ErrorCode::DrawPending
    );

    let mut board = ctx.accounts.winner_board.load_mut()?;
    let wins = board.record_win(user_id)?;

    emit!(WinRecorded {
        user_id,
        period_id: board.period_id,
        wins,
    });

    Ok(())
}
