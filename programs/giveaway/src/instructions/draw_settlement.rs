use anchor_lang::prelude::*;
use crate::{
    constants::*,
    draw::settle,
    errors::ErrorCode,
    events::{DrawAnnounced, IneligibleRefunded, WinRecorded},
    ledger::apply_refunds,
    state::{Config, PointsAccount, Round, RoundStatus, WinnerBoard},
};

/// Load the refund targets passed as remaining accounts. Each must be a writable points PDA;
/// `apply_refunds` rejects duplicates.
fn load_refund_accounts<'info>(
    infos: &'info [AccountInfo<'info>],
) -> Result<Vec<Account<'info, PointsAccount>>> {
    let mut accounts = Vec::with_capacity(infos.len());
    for info in infos {
        require!(info.is_writable, ErrorCode::InvalidRefundAccount);
        let points = Account::<PointsAccount>::try_from(info)
            .map_err(|_| error!(ErrorCode::InvalidRefundAccount))?;
        let expected = Pubkey::create_program_address(
            &[SEED_POINTS, &points.user_id.to_le_bytes(), &[points.bump]],
            &crate::ID,
        )
        .map_err(|_| ErrorCode::InvalidRefundAccount)?;
        require_keys_eq!(info.key(), expected, ErrorCode::InvalidRefundAccount);
        accounts.push(points);
    }
    Ok(accounts)
}

/// Closed -> Drawn for the current round, in one transaction: refund capped bidders,
/// draw the winners, credit the primary winner and reset the stake table.
pub fn finalize_draw<'info>(
    config: &mut Account<'info, Config>,
    round_loader: &AccountLoader<'info, Round>,
    board_loader: &AccountLoader<'info, WinnerBoard>,
    refund_infos: &'info [AccountInfo<'info>],
    randomness: [u8; 32],
) -> Result<()> {
    let mut round = round_loader.load_mut()?;
    let mut board = board_loader.load_mut()?;
    let round_id = round.round_id;

    config.require_current(round_id)?;
    require!(round.status == RoundStatus::Closed as u8, ErrorCode::RoundNotClosed);

    let mut refund_accounts = load_refund_accounts(refund_infos)?;

    let now = Clock::get()?.unix_timestamp;
    let settlement = settle(&mut round, &mut board, &randomness, now)?;

    for receipt in apply_refunds(&settlement.refunds, &mut refund_accounts)? {
        emit!(IneligibleRefunded {
            round_id,
            user_id: receipt.user_id,
            refunded: receipt.refunded,
            new_balance: receipt.new_balance,
        });
    }
    for points in &refund_accounts {
        points.exit(&crate::ID)?;
    }

    config.finish_draw(round_id)?;

    if let Some(primary) = settlement.winners.first() {
        emit!(WinRecorded {
            user_id: *primary,
            period_id: board.period_id,
            wins: settlement.primary_wins,
        });
    }

    msg!(
        "round {} drawn: {} winners, {} bidders, {} refunded",
        round_id,
        settlement.winners.len(),
        settlement.stats.bidders,
        settlement.refunds.len()
    );

    emit!(DrawAnnounced {
        round_id,
        prize: round.prize(),
        winners: settlement.winners,
        winning_bid: settlement.winning_bid,
        winning_chance_bps: settlement.winning_chance_bps,
        bidders_count: settlement.stats.bidders,
        average_bid_x100: settlement.average_bid_x100,
        top_bid: settlement.stats.top_bid,
        total_entries: settlement.stats.total_entries,
        refunded_count: round.refunded_count,
    });

    Ok(())
}
