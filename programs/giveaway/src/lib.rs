use anchor_lang::prelude::*;

pub mod constants;
pub mod draw;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod state;
pub mod utils;
pub mod instructions;

use instructions::*;

#[cfg(feature = "devnet")]
declare_id!("2BUKGvaroduFQ4oiXLTxMJfo4xMMDcfe7swbPZXLy8H7");

#[cfg(not(feature = "devnet"))]
declare_id!("FvscVZu6xP4TJ1a1HJ2eTHusG71vVjyoQ2sxHcicVDTN");

#[program]
pub mod giveaway {
    use super::*;

    pub fn init_config(ctx: Context<InitConfig>, args: InitConfigArgs) -> Result<()> {
        init_config::handler(ctx, args)
    }

    /// Admin handover, bot key rotation, cycle length and pause switch.
    pub fn update_config(ctx: Context<UpdateConfig>, args: UpdateConfigArgs) -> Result<()> {
        update_config::handler(ctx, args)
    }

    pub fn award_points(ctx: Context<AwardPoints>, user_id: u64, amount: u64) -> Result<()> {
        award_points::handler(ctx, user_id, amount)
    }

    pub fn start_round(ctx: Context<StartRound>, round_id: u64, args: StartRoundArgs) -> Result<()> {
        start_round::handler(ctx, round_id, args)
    }

    pub fn increase_bid(
        ctx: Context<IncreaseBid>,
        round_id: u64,
        user_id: u64,
        requested_amount: u64,
    ) -> Result<()> {
        increase_bid::handler(ctx, round_id, user_id, requested_amount)
    }

    /// Read-only standing of one user in the current round.
    pub fn check_bid(ctx: Context<CheckBid>, round_id: u64, user_id: u64) -> Result<()> {
        check_bid::handler(ctx, round_id, user_id)
    }

    pub fn close_round(ctx: Context<CloseRound>, round_id: u64) -> Result<()> {
        close_round::handler(ctx, round_id)
    }

    pub fn request_draw(ctx: Context<RequestDraw>, round_id: u64) -> Result<()> {
        request_draw::handler(ctx, round_id)
    }

    pub fn draw_callback<'info>(
        ctx: Context<'_, '_, 'info, 'info, DrawCallback<'info>>,
        randomness: [u8; 32],
    ) -> Result<()> {
        draw_callback::handler(ctx, randomness)
    }

    /// Admin-only test draw (bypasses VRF oracle). Only available with `devnet` feature.
    #[cfg(feature = "devnet")]
    pub fn mock_draw<'info>(
        ctx: Context<'_, '_, 'info, 'info, MockDraw<'info>>,
        round_id: u64,
        randomness: [u8; 32],
    ) -> Result<()> {
        mock_draw::handler(ctx, round_id, randomness)
    }

    pub fn record_win(ctx: Context<RecordWin>, user_id: u64) -> Result<()> {
        record_win::handler(ctx, user_id)
    }

    /// Clear every win counter now; unblocks a draw when the board is full.
    pub fn reset_period(ctx: Context<ResetPeriod>) -> Result<()> {
        reset_period::handler(ctx)
    }

    pub fn recover_round(
        ctx: Context<RecoverRound>,
        round_id: u64,
        summary_total_entries: u64,
    ) -> Result<()> {
        recover_round::handler(ctx, round_id, summary_total_entries)
    }

    /// Close a drawn round account that is no longer current. Returns rent to the admin.
    pub fn reclaim_round(ctx: Context<ReclaimRound>, round_id: u64) -> Result<()> {
        reclaim_round::handler(ctx, round_id)
    }
}
