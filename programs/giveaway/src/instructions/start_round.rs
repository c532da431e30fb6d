use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::{RoundOpened, WinsReset},
    state::{Config, Round, RoundStatus, WinnerBoard},
    utils::checked_add_i64,
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct StartRoundArgs {
    pub prize: String,
    /// First cycle of a new accounting period: clear every win counter before opening.
    pub begin_new_period: bool,
}

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct StartRound<'info> {
    #[account(
        mut,
        constraint = authority.key() == config.authority @ ErrorCode::Unauthorized
    )]
    pub authority: Signer<'info>,

    #[account(mut, seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = authority,
        space = Round::SPACE,
        seeds = [SEED_ROUND, &round_id.to_le_bytes()],
        bump
    )]
    pub round: AccountLoader<'info, Round>,

    #[account(mut, seeds = [SEED_BOARD], bump)]
    pub winner_board: AccountLoader<'info, WinnerBoard>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<StartRound>, round_id: u64, args: StartRoundArgs) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require!(!cfg.paused, ErrorCode::Paused);

    if args.begin_new_period {
        let mut board = ctx.accounts.winner_board.load_mut()?;
        let period_id = board.start_period()?;
        emit!(WinsReset { period_id });
    }

    cfg.open_round(round_id)?;

    let now = Clock::get()?.unix_timestamp;
    let end_ts = checked_add_i64(now, (cfg.cycle_duration_sec - SCHEDULE_SLACK_SEC) as i64)?;
    let round_key = ctx.accounts.round.key();

    let mut round = ctx.accounts.round.load_init()?;
    round.round_id = round_id;
    round.bump = ctx.bumps.round;
    round.status = RoundStatus::Open as u8;
    round.opened_at = now;
    round.end_ts = end_ts;
    round.set_prize(&args.prize)?;
    // stakes, aggregates and draw result are zeroed by init

    emit!(RoundOpened {
        round_id,
        round: round_key,
        prize: args.prize,
        opened_at: now,
        end_ts,
        total_entries: round.total_entries,
        top_bid: round.top_bid,
    });

    Ok(())
}
