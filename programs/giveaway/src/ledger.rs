//! Reputation points ledger. Balances only move through `debit` and `credit`,
//! and both are applied inside the instruction that needs them so the runtime
//! commits or reverts them together with the stake change.

use std::ops::DerefMut;

use anchor_lang::prelude::*;
use crate::constants::MAX_BID;
use crate::errors::ErrorCode;
use crate::state::{PointsAccount, Round, WinnerBoard};
use crate::utils::{checked_add_u64, checked_sub_u64, rectify_bid};

impl PointsAccount {
    pub fn debit(&mut self, amount: u64) -> Result<u64> {
        require!(amount <= self.balance, ErrorCode::InsufficientFunds);
        self.balance = checked_sub_u64(self.balance, amount)?;
        Ok(self.balance)
    }

    pub fn credit(&mut self, amount: u64) -> Result<u64> {
        self.balance = checked_add_u64(self.balance, amount)?;
        Ok(self.balance)
    }
}

/// Receipt of an accepted bid, as reported back to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BidReceipt {
    pub accepted_amount: u64,
    pub new_bid: u64,
    pub new_balance: u64,
    pub win_count: u8,
}

/// Check eligibility, rectify, debit and stake in one step.
/// Nothing is written unless every check passes.
pub fn place_bid(
    points: &mut PointsAccount,
    round: &mut Round,
    board: &WinnerBoard,
    requested_amount: u64,
) -> Result<BidReceipt> {
    require!(requested_amount > 0, ErrorCode::InvalidBidAmount);
    require!(board.is_eligible(points.user_id), ErrorCode::IneligibleUser);
    require!(points.balance > 0, ErrorCode::InsufficientFunds);

    let current_bid = round.stake_of(points.user_id);
    require!(current_bid < MAX_BID, ErrorCode::BidAtCap);

    let delta = rectify_bid(requested_amount, current_bid, points.balance);
    require!(delta > 0, ErrorCode::BidAtCap);

    let new_bid = round.commit_stake(points.user_id, delta)?;
    // delta <= balance, so the debit cannot fail after the stake is committed
    let new_balance = points.debit(delta)?;

    Ok(BidReceipt {
        accepted_amount: delta,
        new_bid,
        new_balance,
        win_count: board.wins_of(points.user_id),
    })
}

/// Where a user stands in a round right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BidStanding {
    pub bid: u64,
    pub win_chance_bps: u64,
    pub win_count: u8,
    pub balance: u64,
}

pub fn bid_standing(points: &PointsAccount, round: &Round, board: &WinnerBoard) -> BidStanding {
    let bid = round.stake_of(points.user_id);
    BidStanding {
        bid,
        win_chance_bps: round.win_chance_bps(bid),
        win_count: board.wins_of(points.user_id),
        balance: points.balance,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefundReceipt {
    pub user_id: u64,
    pub refunded: u64,
    pub new_balance: u64,
}

/// Credit each `(user_id, amount)` refund to the matching points account.
///
/// Every refund must have exactly one account and no account may appear twice;
/// both are checked before any balance moves.
pub fn apply_refunds<A: DerefMut<Target = PointsAccount>>(
    refunds: &[(u64, u64)],
    accounts: &mut [A],
) -> Result<Vec<RefundReceipt>> {
    for (i, account) in accounts.iter().enumerate() {
        require!(
            accounts[..i].iter().all(|other| other.user_id != account.user_id),
            ErrorCode::InvalidRefundAccount
        );
    }

    let mut targets = Vec::with_capacity(refunds.len());
    for (user_id, _) in refunds {
        let index = accounts
            .iter()
            .position(|a| a.user_id == *user_id)
            .ok_or(ErrorCode::MissingRefundAccount)?;
        targets.push(index);
    }

    let mut receipts = Vec::with_capacity(refunds.len());
    for ((user_id, amount), index) in refunds.iter().zip(targets) {
        let new_balance = accounts[index].credit(*amount)?;
        receipts.push(RefundReceipt {
            user_id: *user_id,
            refunded: *amount,
            new_balance,
        });
    }
    Ok(receipts)
}
