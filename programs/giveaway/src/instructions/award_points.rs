use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    events::PointsAwarded,
    state::{Config, PointsAccount},
};

#[derive(Accounts)]
#[instruction(user_id: u64)]
pub struct AwardPoints<'info> {
    #[account(
        mut,
        constraint = authority.key() == config.authority @ ErrorCode::Unauthorized
    )]
    pub authority: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        init_if_needed,
        payer = authority,
        space = PointsAccount::SPACE,
        seeds = [SEED_POINTS, &user_id.to_le_bytes()],
        bump
    )]
    pub points: Account<'info, PointsAccount>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<AwardPoints>, user_id: u64, amount: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::ZeroAmount);

    let points = &mut ctx.accounts.points;
    // seeds pin both fields, so rewriting them on later awards is a no-op
    points.user_id = user_id;
    points.bump = ctx.bumps.points;
    let new_balance = points.credit(amount)?;

    emit!(PointsAwarded {
        user_id,
        amount,
        new_balance,
    });

    Ok(())
}
