use anchor_lang::prelude::*;
use crate::{
    constants::*,
    errors::ErrorCode,
    instructions::draw_settlement::finalize_draw,
    state::{Config, Round, WinnerBoard},
};

/// MagicBlock VRF program identity PDA. Only the VRF program can sign as this address.
const VRF_PROGRAM_IDENTITY_BYTES: [u8; 32] =
    ephemeral_vrf_sdk::consts::VRF_PROGRAM_IDENTITY.to_bytes();
pub static VRF_PROGRAM_IDENTITY: Pubkey = Pubkey::new_from_array(VRF_PROGRAM_IDENTITY_BYTES);

/// Remaining accounts: the points PDAs of capped bidders, as listed by `request_draw`.
#[derive(Accounts)]
pub struct DrawCallback<'info> {
    #[account(address = VRF_PROGRAM_IDENTITY)]
    pub vrf_program_identity: Signer<'info>,

    #[account(mut, seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    /// round_id is not part of the callback args; PDA verified in handler.
    #[account(mut)]
    pub round: AccountLoader<'info, Round>,

    #[account(mut, seeds = [SEED_BOARD], bump)]
    pub winner_board: AccountLoader<'info, WinnerBoard>,
}

pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, DrawCallback<'info>>,
    randomness: [u8; 32],
) -> Result<()> {
    {
        let round = ctx.accounts.round.load()?;
        let expected_key = Pubkey::create_program_address(
            &[SEED_ROUND, &round.round_id.to_le_bytes(), &[round.bump]],
            &crate::ID,
        )
        .map_err(|_| ErrorCode::Unauthorized)?;
        require!(ctx.accounts.round.key() == expected_key, ErrorCode::Unauthorized);
        require!(round.vrf_pending == 1, ErrorCode::DrawNotRequested);
    }

    finalize_draw(
        &mut ctx.accounts.config,
        &ctx.accounts.round,
        &ctx.accounts.winner_board,
        ctx.remaining_accounts,
        randomness,
    )
}
