use anchor_lang::prelude::*;

#[event]
pub struct RoundOpened {
    pub round_id: u64,
    pub round: Pubkey,
    pub prize: String,
    pub opened_at: i64,
    pub end_ts: i64,
    pub total_entries: u64,
    pub top_bid: u64,
}

#[event]
pub struct BidAccepted {
    pub round_id: u64,
    pub user_id: u64,
    pub accepted_amount: u64,
    pub new_bid: u64,
    pub new_balance: u64,
    pub win_count: u8,
    pub win_chance_bps: u64,
    pub total_entries_after: u64,
    pub top_bid_after: u64,
}

#[event]
pub struct RoundClosed {
    pub round_id: u64,
    pub total_entries: u64,
    pub top_bid: u64,
    pub bidders_count: u16,
    pub closed_at: i64,
}

#[event]
pub struct DrawRequested {
    pub round_id: u64,
    pub ineligible_bidders: u16,
}

/// Reply to a user asking where they stand in the open round.
#[event]
pub struct BidChecked {
    pub round_id: u64,
    pub user_id: u64,
    pub bid: u64,
    pub win_chance_bps: u64,
    pub win_count: u8,
    pub balance: u64,
}

#[event]
pub struct IneligibleRefunded {
    pub round_id: u64,
    pub user_id: u64,
    pub refunded: u64,
    pub new_balance: u64,
}

#[event]
pub struct DrawAnnounced {
    pub round_id: u64,
    pub prize: String,
    /// `winners[0]` is the primary winner, the rest are backups in draw order.
    pub winners: Vec<u64>,
    /// Primary winner's stake and its share of the pool in basis points.
    pub winning_bid: u64,
    pub winning_chance_bps: u64,
    pub bidders_count: u16,
    /// Mean eligible stake in hundredths of a point, truncated (1234 = 12.34).
    pub average_bid_x100: u64,
    pub top_bid: u64,
    pub total_entries: u64,
    pub refunded_count: u16,
}

#[event]
pub struct WinsReset {
    pub period_id: u64,
}

#[event]
pub struct WinRecorded {
    pub user_id: u64,
    pub period_id: u64,
    pub wins: u8,
}

#[event]
pub struct PointsAwarded {
    pub user_id: u64,
    pub amount: u64,
    pub new_balance: u64,
}

#[event]
pub struct RoundRecovered {
    pub round_id: u64,
    pub previous_total_entries: u64,
    pub total_entries: u64,
    pub top_bid: u64,
    pub bidders_count: u16,
}

#[event]
pub struct AdminTransferred {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
}
