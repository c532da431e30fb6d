use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    state::{Config, RoundStatus, WinnerBoard},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitConfigArgs {
    /// Bot key allowed to bid on behalf of users and drive the daily schedule.
    pub authority: Pubkey,
    /// Seconds between round openings. 0 = `DEFAULT_CYCLE_SEC`.
    pub cycle_duration_sec: u32,
}

#[derive(Accounts)]
pub struct InitConfig<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = Config::SPACE,
        seeds = [SEED_CFG],
        bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = payer,
        space = WinnerBoard::SPACE,
        seeds = [SEED_BOARD],
        bump
    )]
    pub winner_board: AccountLoader<'info, WinnerBoard>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitConfig>, args: InitConfigArgs) -> Result<()> {
    let cycle = if args.cycle_duration_sec == 0 {
        DEFAULT_CYCLE_SEC
    } else {
        args.cycle_duration_sec
    };
    require!(cycle > SCHEDULE_SLACK_SEC, ErrorCode::InvalidCycleDuration);
    require!(args.authority != Pubkey::default(), ErrorCode::InvalidAuthority);

    let cfg = &mut ctx.accounts.config;
    cfg.admin = ctx.accounts.admin.key();
    cfg.authority = args.authority;
    cfg.cycle_duration_sec = cycle;
    cfg.paused = false;
    cfg.bump = ctx.bumps.config;
    cfg.current_round_id = 0;
    cfg.round_state = RoundStatus::Idle as u8;
    cfg.state_version = 0;
    cfg.reserved = [0u8; 32];

    let mut board = ctx.accounts.winner_board.load_init()?;
    board.bump = ctx.bumps.winner_board;
    // period_id=0, no entries: zeroed by init

    Ok(())
}
