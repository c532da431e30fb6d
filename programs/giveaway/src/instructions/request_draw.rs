use anchor_lang::prelude::*;
use anchor_lang::Discriminator;
use ephemeral_vrf_sdk::instructions::{create_request_randomness_ix, RequestRandomnessParams};
use ephemeral_vrf_sdk::types::SerializableAccountMeta;

use crate::{
    constants::*,
    errors::ErrorCode,
    events::DrawRequested,
    state::{Config, Round, RoundStatus, WinnerBoard},
};

/// Convert an anchor Pubkey to the SDK's Pubkey (same 32 bytes, different crate).
fn to_sdk_pubkey(p: &Pubkey) -> ephemeral_vrf_sdk::Pubkey {
    ephemeral_vrf_sdk::Pubkey::new_from_array(p.to_bytes())
}

fn writable_meta(p: &Pubkey) -> SerializableAccountMeta {
    SerializableAccountMeta {
        pubkey: to_sdk_pubkey(p),
        is_signer: false,
        is_writable: true,
    }
}

// MagicBlock VRF program constants
const VRF_PROGRAM_ID_BYTES: [u8; 32] = ephemeral_vrf_sdk::consts::VRF_PROGRAM_ID.to_bytes();
const DEFAULT_QUEUE_BYTES: [u8; 32] = ephemeral_vrf_sdk::consts::DEFAULT_QUEUE.to_bytes();

pub static VRF_PROGRAM_ID: Pubkey = Pubkey::new_from_array(VRF_PROGRAM_ID_BYTES);
pub static DEFAULT_QUEUE: Pubkey = Pubkey::new_from_array(DEFAULT_QUEUE_BYTES);

pub fn points_address(user_id: u64) -> Pubkey {
    Pubkey::find_program_address(&[SEED_POINTS, &user_id.to_le_bytes()], &crate::ID).0
}

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct RequestDraw<'info> {
    #[account(
        mut,
        constraint = authority.key() == config.authority @ ErrorCode::Unauthorized
    )]
    pub authority: Signer<'info>,

    #[account(seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [SEED_ROUND, &round_id.to_le_bytes()],
        bump,
    )]
    pub round: AccountLoader<'info, Round>,

    #[account(seeds = [SEED_BOARD], bump)]
    pub winner_board: AccountLoader<'info, WinnerBoard>,

    /// CHECK: Our program's identity PDA, used to sign the VRF CPI.
    #[account(seeds = [SEED_IDENTITY], bump)]
    pub program_identity: AccountInfo<'info>,

    /// CHECK: Oracle queue account
    #[account(mut, address = DEFAULT_QUEUE)]
    pub oracle_queue: AccountInfo<'info>,

    /// CHECK: MagicBlock VRF program
    #[account(address = VRF_PROGRAM_ID)]
    pub vrf_program: AccountInfo<'info>,

    /// CHECK: SlotHashes sysvar
    #[account(address = anchor_lang::solana_program::sysvar::slot_hashes::ID)]
    pub slot_hashes: AccountInfo<'info>,

    pub system_program: Program<'info, System>,
}

/// Ask the oracle for randomness. The callback receives, besides the round, the points
/// accounts of every bidder who is over the win cap so their stakes can be refunded
/// in the same transaction as the draw. Can be repeated while the round stays Closed.
pub fn handler(ctx: Context<RequestDraw>, round_id: u64) -> Result<()> {
    ctx.accounts.config.require_current(round_id)?;

    let round_key = ctx.accounts.round.key();
    let config_key = ctx.accounts.config.key();
    let board_key = ctx.accounts.winner_board.key();

    let refund_targets: Vec<Pubkey> = {
        let round = ctx.accounts.round.load()?;
        require!(round.status == RoundStatus::Closed as u8, ErrorCode::RoundNotClosed);

        let board = ctx.accounts.winner_board.load()?;
        (0..round.bidders_count as usize)
            .filter(|i| round.stakes.data[*i] > 0)
            .map(|i| round.bidders.data[i])
            .filter(|user_id| !board.is_eligible(*user_id))
            .map(points_address)
            .collect()
    };

    let mut accounts_metas = vec![
        writable_meta(&config_key),
        writable_meta(&round_key),
        writable_meta(&board_key),
    ];
    accounts_metas.extend(refund_targets.iter().map(writable_meta));

    // Build a 32-byte caller seed from the round_id for uniqueness
    let mut caller_seed = [0u8; 32];
    caller_seed[..8].copy_from_slice(&round_id.to_le_bytes());

    let sdk_ix = create_request_randomness_ix(RequestRandomnessParams {
        payer: to_sdk_pubkey(&ctx.accounts.authority.key()),
        oracle_queue: to_sdk_pubkey(&ctx.accounts.oracle_queue.key()),
        callback_program_id: to_sdk_pubkey(&crate::ID),
        callback_discriminator: crate::instruction::DrawCallback::DISCRIMINATOR.to_vec(),
        caller_seed,
        accounts_metas: Some(accounts_metas),
        ..Default::default()
    });

    // Manually convert the SDK instruction to anchor's solana_program types.
    let ix = {
        let program_id = Pubkey::new_from_array(sdk_ix.program_id.to_bytes());
        let accounts: Vec<anchor_lang::solana_program::instruction::AccountMeta> = sdk_ix
            .accounts
            .iter()
            .map(|a| {
                let pubkey = Pubkey::new_from_array(a.pubkey.to_bytes());
                if a.is_writable {
                    anchor_lang::solana_program::instruction::AccountMeta::new(pubkey, a.is_signer)
                } else {
                    anchor_lang::solana_program::instruction::AccountMeta::new_readonly(
                        pubkey, a.is_signer,
                    )
                }
            })
            .collect();
        anchor_lang::solana_program::instruction::Instruction {
            program_id,
            accounts,
            data: sdk_ix.data,
        }
    };

    let identity_bump = ctx.bumps.program_identity;

    anchor_lang::solana_program::program::invoke_signed(
        &ix,
        &[
            ctx.accounts.authority.to_account_info(),
            ctx.accounts.program_identity.to_account_info(),
            ctx.accounts.oracle_queue.to_account_info(),
            ctx.accounts.slot_hashes.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        ],
        &[&[SEED_IDENTITY, &[identity_bump]]],
    )?;

    let mut round = ctx.accounts.round.load_mut()?;
    round.vrf_pending = 1;

    emit!(DrawRequested {
        round_id,
        ineligible_bidders: refund_targets.len() as u16,
    });

    Ok(())
}
