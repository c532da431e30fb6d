use anchor_lang::prelude::*;
use crate::{constants::*, errors::ErrorCode, events::AdminTransferred, state::Config};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct UpdateConfigArgs {
    pub admin: Option<Pubkey>,
    pub authority: Option<Pubkey>,
    /// Applies from the next `start_round`; the open round keeps its deadline.
    pub cycle_duration_sec: Option<u32>,
    pub paused: Option<bool>,
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_CFG],
        bump = config.bump,
        constraint = config.admin == admin.key() @ ErrorCode::Unauthorized,
    )]
    pub config: Account<'info, Config>,
}

pub fn handler(ctx: Context<UpdateConfig>, args: UpdateConfigArgs) -> Result<()> {
    let cfg = &mut ctx.accounts.config;

    if let Some(v) = args.authority {
        require!(v != Pubkey::default(), ErrorCode::InvalidAuthority);
        cfg.authority = v;
    }
    if let Some(v) = args.cycle_duration_sec {
        require!(v > SCHEDULE_SLACK_SEC, ErrorCode::InvalidCycleDuration);
        cfg.cycle_duration_sec = v;
    }
    if let Some(v) = args.paused {
        cfg.paused = v;
    }
    if let Some(v) = args.admin {
        require!(v != Pubkey::default(), ErrorCode::InvalidAdmin);
        require!(v != cfg.admin, ErrorCode::InvalidAdmin);
        let old_admin = cfg.admin;
        cfg.admin = v;
        emit!(AdminTransferred {
            old_admin,
            new_admin: v,
        });
    }

    Ok(())
}
